use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use dino_runner::config::{parse_args, CliArgs, Command, Config, CONFIG_FILE, HELP_TEXT};
use dino_runner::game::{World, FRAME_MS};
use dino_runner::input::{map_key, map_mouse, GameInput};
use dino_runner::leaderboard::types::rows_from_records;
use dino_runner::leaderboard::{HttpScoreService, LeaderboardTasks, ScoreService};
use dino_runner::utils::{logging, persistence, version_line};
use dino_runner::{ui, App};
use ratatui::layout::Rect;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn main() -> io::Result<()> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Run 'dino-runner --help' for usage.");
            std::process::exit(1);
        }
    };

    match args.command {
        Command::Version => {
            println!("{}", version_line());
            Ok(())
        }
        Command::Help => {
            println!("{}", HELP_TEXT);
            Ok(())
        }
        Command::Scores => {
            logging::init_stderr_logger();
            std::process::exit(print_scores(&load_config(&args)))
        }
        Command::Health => {
            logging::init_stderr_logger();
            std::process::exit(print_health(&load_config(&args)))
        }
        Command::InitConfig => init_config(),
        Command::Play => play(load_config(&args)),
    }
}

fn load_config(args: &CliArgs) -> Config {
    let mut config = Config::load();
    config.apply_args(args);
    config
}

fn service_for(config: &Config) -> HttpScoreService {
    HttpScoreService::new(config.endpoint.clone(), config.request_timeout())
}

fn print_scores(config: &Config) -> i32 {
    if config.offline {
        eprintln!("Leaderboard offline");
        return 1;
    }
    match service_for(config).fetch_top() {
        Ok(records) if records.is_empty() => {
            println!("No scores yet");
            0
        }
        Ok(records) => {
            for row in rows_from_records(&records) {
                println!("{:<24} {}", row.label(), row.date);
            }
            0
        }
        Err(e) => {
            eprintln!("Failed to load: {}", e);
            1
        }
    }
}

fn print_health(config: &Config) -> i32 {
    let service = service_for(config);
    match service.check_health() {
        Ok(body) if body == "OK" => {
            println!("{}: OK", service.health_url());
            0
        }
        Ok(body) => {
            eprintln!("{}: unexpected response {:?}", service.health_url(), body);
            1
        }
        Err(e) => {
            eprintln!("{}: {}", service.health_url(), e);
            1
        }
    }
}

fn init_config() -> io::Result<()> {
    let path = persistence::data_path(CONFIG_FILE)?;
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    let path = persistence::save_json(CONFIG_FILE, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn play(config: Config) -> io::Result<()> {
    match logging::init_file_logger() {
        Ok(path) => log::info!("Logging to {}", path.display()),
        Err(e) => eprintln!("Warning: file logging disabled: {}", e),
    }
    log::info!("Starting {}", version_line());

    let tasks = if config.offline {
        log::info!("Offline mode, leaderboard disabled");
        None
    } else {
        log::info!("Leaderboard endpoint {}", config.endpoint);
        let service: Arc<dyn ScoreService> = Arc::new(service_for(&config));
        Some(LeaderboardTasks::new(service))
    };
    let mut app = App::new(World::new(config.tuning.sanitized()), tasks);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    // Cleanup terminal, even if the loop failed
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableMouseCapture)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    log::info!(
        "Exiting (score {}, high score {})",
        app.world.score,
        app.leaderboard.high_score
    );
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    let frame_interval = Duration::from_millis(FRAME_MS);
    let mut last_tick = Instant::now();
    let mut field = Rect::default();

    while !app.should_quit {
        app.poll_tasks();

        terminal.draw(|frame| {
            field = ui::draw(frame, app);
        })?;

        let timeout = frame_interval.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let input = match event::read()? {
                Event::Key(key) => map_key(key),
                Event::Mouse(mouse) => map_mouse(mouse, Some(field)),
                _ => GameInput::Other,
            };
            app.handle_input(input);
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= frame_interval {
            app.update(elapsed.as_millis() as u64);
            last_tick = Instant::now();
        }
    }

    Ok(())
}
