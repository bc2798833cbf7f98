//! Runtime configuration and command-line parsing.
//!
//! Precedence, lowest to highest: built-in defaults, `~/.dino-runner/config.json`,
//! the `DINO_RUNNER_ENDPOINT` environment variable, command-line flags.

use crate::game::Tuning;
use crate::utils::persistence::load_json_or_default;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.json";
pub const ENDPOINT_ENV: &str = "DINO_RUNNER_ENDPOINT";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/api/scores";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scores URL. GET lists the leaderboard, POST saves a score.
    pub endpoint: String,
    /// Play without any network calls.
    pub offline: bool,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub tuning: Tuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            offline: false,
            request_timeout_secs: None,
            tuning: Tuning::default(),
        }
    }
}

impl Config {
    /// Config file (or defaults) with the environment override applied.
    pub fn load() -> Self {
        let mut config: Config = load_json_or_default(CONFIG_FILE);
        config.apply_env(std::env::var(ENDPOINT_ENV).ok());
        config
    }

    pub fn apply_env(&mut self, endpoint: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
    }

    pub fn apply_args(&mut self, args: &CliArgs) {
        if let Some(endpoint) = &args.endpoint {
            self.endpoint = endpoint.clone();
        }
        if args.offline {
            self.offline = true;
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
    }
}

/// What the binary was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    /// Print the leaderboard and exit.
    Scores,
    /// Ping the backend's health route and exit.
    Health,
    /// Write the default config file if none exists.
    InitConfig,
    Version,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub endpoint: Option<String>,
    pub offline: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            command: Command::Play,
            endpoint: None,
            offline: false,
        }
    }
}

pub const HELP_TEXT: &str = "\
Dino Runner - jump the obstacles, chase the high score

Usage: dino-runner [command] [options]

Commands:
  (none)        Play
  scores        Print the leaderboard
  health        Check that the leaderboard server is reachable
  init-config   Write a default ~/.dino-runner/config.json

Options:
  --endpoint=URL  Scores endpoint (default http://localhost:8080/api/scores)
  --offline       Play without the leaderboard
  --version, -v   Show version information
  --help, -h      Show this help message

Controls: Space/Up or click = jump, R/Enter = restart, Q/Esc = quit";

/// Parse arguments (without the program name).
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    let mut command: Option<Command> = None;

    for arg in args {
        let next = match arg.as_str() {
            "--version" | "-v" => Some(Command::Version),
            "--help" | "-h" => Some(Command::Help),
            "--offline" => {
                parsed.offline = true;
                None
            }
            "scores" => Some(Command::Scores),
            "health" => Some(Command::Health),
            "init-config" => Some(Command::InitConfig),
            other => {
                if let Some(url) = other.strip_prefix("--endpoint=") {
                    if url.is_empty() {
                        return Err("--endpoint needs a URL".to_string());
                    }
                    parsed.endpoint = Some(url.to_string());
                    None
                } else {
                    return Err(format!("Unknown argument: {}", other));
                }
            }
        };

        if let Some(next) = next {
            // --help / --version win over anything else on the line
            command = match (command, next) {
                (Some(Command::Help), _) | (Some(Command::Version), _) => command,
                (_, Command::Help) | (_, Command::Version) => Some(next),
                (Some(existing), _) if existing != next => {
                    return Err("Only one command may be given".to_string())
                }
                _ => Some(next),
            };
        }
    }

    parsed.command = command.unwrap_or(Command::Play);
    Ok(parsed)
}
