//! Logger setup.
//!
//! While the game owns the terminal, log output goes to a file in the data
//! directory; one-shot commands log to stderr.

use super::persistence::data_path;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;

pub const LOG_FILE: &str = "dino-runner.log";

/// Route `log` output to ~/.dino-runner/dino-runner.log. `RUST_LOG` overrides
/// the default `info` level.
pub fn init_file_logger() -> io::Result<PathBuf> {
    let path = data_path(LOG_FILE)?;
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    Ok(path)
}

/// Log warnings and errors to stderr for non-interactive commands.
pub fn init_stderr_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .try_init();
}
