//! Loop controller: owns the world and the leaderboard display, routes input,
//! and turns tick events into leaderboard requests.

use crate::game::{TickEvent, World};
use crate::input::GameInput;
use crate::leaderboard::board::{OFFLINE_TEXT, STATUS_NOT_SAVED_OFFLINE, STATUS_SAVING};
use crate::leaderboard::{Leaderboard, LeaderboardTasks, TaggedOutcome};

pub struct App {
    pub world: World,
    pub leaderboard: Leaderboard,
    /// `None` when playing offline.
    tasks: Option<LeaderboardTasks>,
    /// Generation whose score has already been sent, so one run submits once.
    submitted_generation: Option<u64>,
    pub should_quit: bool,
}

impl App {
    /// Build the controller. With a leaderboard attached, the initial load
    /// starts immediately in the background.
    pub fn new(world: World, tasks: Option<LeaderboardTasks>) -> Self {
        let leaderboard = match &tasks {
            Some(tasks) => {
                tasks.spawn_fetch(world.generation);
                Leaderboard::new()
            }
            None => Leaderboard::offline(),
        };
        Self {
            world,
            leaderboard,
            tasks,
            submitted_generation: None,
            should_quit: false,
        }
    }

    pub fn is_online(&self) -> bool {
        self.tasks.is_some()
    }

    pub fn handle_input(&mut self, input: GameInput) {
        match input {
            GameInput::Jump => {
                self.world.jump();
            }
            GameInput::Restart => {
                if self.world.is_game_over() {
                    self.restart();
                }
            }
            GameInput::Quit => self.should_quit = true,
            GameInput::Other => {}
        }
    }

    /// Advance the simulation by `dt_ms` and react to what happened.
    pub fn update(&mut self, dt_ms: u64) -> Vec<TickEvent> {
        let events = self.world.advance(dt_ms);
        for event in &events {
            if let TickEvent::GameOver { score, generation } = *event {
                self.on_game_over(score, generation);
            }
        }
        events
    }

    /// New run: fresh world state, cleared status. The high score and the
    /// displayed leaderboard carry over.
    pub fn restart(&mut self) {
        self.world.restart();
        if self.is_online() {
            self.leaderboard.clear_status();
        } else {
            self.leaderboard.set_status(OFFLINE_TEXT);
        }
    }

    /// Apply every background outcome that has arrived. Returns how many were applied.
    pub fn poll_tasks(&mut self) -> usize {
        let outcomes = match &self.tasks {
            Some(tasks) => tasks.drain(),
            None => return 0,
        };
        outcomes
            .into_iter()
            .filter(|o| self.apply_outcome(o))
            .count()
    }

    /// Apply one outcome. Save results from an earlier run are dropped so they
    /// cannot overwrite the current run's status; leaderboard loads always apply.
    /// Returns whether the outcome was applied.
    pub fn apply_outcome(&mut self, tagged: &TaggedOutcome) -> bool {
        if tagged.outcome.is_run_specific() && tagged.generation != self.world.generation {
            log::debug!(
                "Dropping stale save result from generation {} (now {})",
                tagged.generation,
                self.world.generation
            );
            return false;
        }
        self.leaderboard.apply(&tagged.outcome);
        true
    }

    fn on_game_over(&mut self, score: u32, generation: u64) {
        if score == 0 || self.submitted_generation == Some(generation) {
            return;
        }
        match &self.tasks {
            Some(tasks) => {
                self.submitted_generation = Some(generation);
                self.leaderboard.set_status(STATUS_SAVING);
                tasks.spawn_submit(score, generation);
            }
            None => self.leaderboard.set_status(STATUS_NOT_SAVED_OFFLINE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Obstacle, PLAYER_X};
    use crate::game::Tuning;
    use crate::leaderboard::board::STATUS_SAVED;
    use crate::leaderboard::{
        LeaderboardError, PanelState, ScoreRecord, ScoreService, TaskOutcome,
    };
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct RecordingService {
        submitted: Mutex<Vec<u32>>,
        top: Vec<ScoreRecord>,
    }

    impl ScoreService for RecordingService {
        fn submit(&self, score: u32) -> Result<(), LeaderboardError> {
            self.submitted.lock().unwrap().push(score);
            Ok(())
        }

        fn fetch_top(&self) -> Result<Vec<ScoreRecord>, LeaderboardError> {
            Ok(self.top.clone())
        }
    }

    fn online_app(service: Arc<RecordingService>) -> App {
        let world = World::with_seed(Tuning::default(), 9);
        App::new(world, Some(LeaderboardTasks::new(service)))
    }

    /// Poll until `done` holds or a few seconds pass.
    fn poll_until(app: &mut App, done: impl Fn(&App) -> bool) {
        let start = Instant::now();
        while !done(app) && start.elapsed() < Duration::from_secs(5) {
            app.poll_tasks();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    /// Put an obstacle on top of the grounded runner and step once.
    fn crash(app: &mut App) -> Vec<TickEvent> {
        app.world.tick();
        let mut obs = Obstacle::with_height(50.0);
        obs.x = PLAYER_X + 5.0;
        app.world.obstacles.push(obs);
        app.update(crate::game::FRAME_MS)
    }

    #[test]
    fn test_initial_fetch_sets_high_score() {
        let service = Arc::new(RecordingService {
            top: vec![ScoreRecord {
                score: 88,
                timestamp: None,
            }],
            ..Default::default()
        });
        let mut app = online_app(service);
        assert_eq!(app.leaderboard.panel, PanelState::Loading);

        poll_until(&mut app, |a| a.leaderboard.high_score == 88);
        assert_eq!(app.leaderboard.high_score, 88);
    }

    #[test]
    fn test_zero_score_never_submits() {
        let service = Arc::new(RecordingService::default());
        let mut app = online_app(service.clone());

        let events = crash(&mut app);
        assert!(events
            .iter()
            .any(|e| matches!(e, TickEvent::GameOver { score: 0, .. })));
        assert!(app.world.is_game_over());

        std::thread::sleep(Duration::from_millis(50));
        assert!(service.submitted.lock().unwrap().is_empty());
        assert_ne!(app.leaderboard.status, STATUS_SAVING);
    }

    #[test]
    fn test_game_over_submits_once() {
        let service = Arc::new(RecordingService::default());
        let mut app = online_app(service.clone());
        app.world.score = 14;

        crash(&mut app);
        assert_eq!(app.leaderboard.status, STATUS_SAVING);

        // A duplicate event for the same run must not resubmit
        app.on_game_over(14, app.world.generation);

        poll_until(&mut app, |a| a.leaderboard.status == STATUS_SAVED);
        assert_eq!(app.leaderboard.status, STATUS_SAVED);
        assert_eq!(*service.submitted.lock().unwrap(), vec![14]);
    }

    #[test]
    fn test_stale_outcome_discarded_after_restart() {
        let service = Arc::new(RecordingService::default());
        let mut app = online_app(service);
        app.world.state = crate::game::RunState::GameOver;
        app.handle_input(GameInput::Restart);
        assert_eq!(app.world.generation, 1);

        let stale = TaggedOutcome {
            generation: 0,
            outcome: TaskOutcome::ScoreRejected(LeaderboardError::Status(500)),
        };
        assert!(!app.apply_outcome(&stale));
        assert!(app.leaderboard.status.is_empty());

        let fresh = TaggedOutcome {
            generation: 1,
            outcome: TaskOutcome::Loaded(Vec::new()),
        };
        assert!(app.apply_outcome(&fresh));
        assert_eq!(app.leaderboard.panel, PanelState::Empty);
    }

    #[test]
    fn test_load_from_previous_run_still_applies() {
        let service = Arc::new(RecordingService::default());
        let mut app = online_app(service);
        app.world.state = crate::game::RunState::GameOver;
        app.handle_input(GameInput::Restart);

        let late_refresh = TaggedOutcome {
            generation: 0,
            outcome: TaskOutcome::Loaded(vec![ScoreRecord {
                score: 6,
                timestamp: None,
            }]),
        };
        assert!(app.apply_outcome(&late_refresh));
        assert_eq!(app.leaderboard.high_score, 6);
        assert!(matches!(app.leaderboard.panel, PanelState::Rows(_)));

        let late_failure = TaggedOutcome {
            generation: 0,
            outcome: TaskOutcome::LoadFailed(LeaderboardError::Status(502)),
        };
        assert!(app.apply_outcome(&late_failure));
        assert_eq!(app.leaderboard.panel, PanelState::Unavailable);
        assert!(app.leaderboard.status.is_empty());
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut app = App::new(World::with_seed(Tuning::default(), 1), None);
        app.world.score = 5;
        app.handle_input(GameInput::Restart);
        assert_eq!(app.world.score, 5, "restart is ignored mid-run");

        app.world.state = crate::game::RunState::GameOver;
        app.handle_input(GameInput::Restart);
        assert_eq!(app.world.score, 0);
        assert!(!app.world.is_game_over());
    }

    #[test]
    fn test_offline_game_over_reports_unsaved() {
        let mut app = App::new(World::with_seed(Tuning::default(), 2), None);
        assert!(!app.is_online());
        app.world.score = 3;

        crash(&mut app);

        assert_eq!(app.leaderboard.status, STATUS_NOT_SAVED_OFFLINE);
        assert_eq!(app.poll_tasks(), 0);

        app.handle_input(GameInput::Restart);
        assert_eq!(app.leaderboard.status, OFFLINE_TEXT);
    }

    #[test]
    fn test_quit_and_jump_inputs() {
        let mut app = App::new(World::with_seed(Tuning::default(), 3), None);
        app.world.tick();
        app.handle_input(GameInput::Jump);
        assert!(app.world.player.velocity < 0.0);

        app.handle_input(GameInput::Other);
        assert!(!app.should_quit);
        app.handle_input(GameInput::Quit);
        assert!(app.should_quit);
    }
}
