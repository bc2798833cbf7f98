//! Fire-and-forget leaderboard requests.
//!
//! Each request runs on its own worker thread and reports back through a
//! channel that the frame loop drains without blocking. Every outcome is
//! tagged with the run generation it was issued for, so the loop can drop
//! answers that arrive after a restart.

use super::client::{LeaderboardError, ScoreService};
use super::types::ScoreRecord;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Result of one background request.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    ScoreSaved,
    ScoreRejected(LeaderboardError),
    Loaded(Vec<ScoreRecord>),
    LoadFailed(LeaderboardError),
}

impl TaskOutcome {
    /// Save results describe one run; leaderboard loads are shared by all runs.
    pub fn is_run_specific(&self) -> bool {
        matches!(self, Self::ScoreSaved | Self::ScoreRejected(_))
    }
}

/// An outcome plus the generation of the run that asked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedOutcome {
    pub generation: u64,
    pub outcome: TaskOutcome,
}

/// Spawns leaderboard workers and collects their outcomes.
pub struct LeaderboardTasks {
    service: Arc<dyn ScoreService>,
    tx: Sender<TaggedOutcome>,
    rx: Receiver<TaggedOutcome>,
}

impl LeaderboardTasks {
    pub fn new(service: Arc<dyn ScoreService>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { service, tx, rx }
    }

    /// Load the leaderboard in the background.
    pub fn spawn_fetch(&self, generation: u64) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        spawn_worker("leaderboard-fetch", move || {
            send(&tx, generation, fetch(service.as_ref()));
        });
    }

    /// Save a score in the background; on success the leaderboard is reloaded.
    pub fn spawn_submit(&self, score: u32, generation: u64) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        spawn_worker("leaderboard-submit", move || match service.submit(score) {
            Ok(()) => {
                log::info!("Score {} saved", score);
                send(&tx, generation, TaskOutcome::ScoreSaved);
                send(&tx, generation, fetch(service.as_ref()));
            }
            Err(e) => {
                log::warn!("Saving score {} failed: {}", score, e);
                send(&tx, generation, TaskOutcome::ScoreRejected(e));
            }
        });
    }

    /// Everything that has arrived so far. Never blocks.
    pub fn drain(&self) -> Vec<TaggedOutcome> {
        self.rx.try_iter().collect()
    }

    /// Wait up to `timeout` for the next outcome.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TaggedOutcome> {
        self.rx.recv_timeout(timeout).ok()
    }
}

fn fetch(service: &dyn ScoreService) -> TaskOutcome {
    match service.fetch_top() {
        Ok(records) => {
            log::info!("Leaderboard loaded ({} entries)", records.len());
            TaskOutcome::Loaded(records)
        }
        Err(e) => {
            log::warn!("Loading leaderboard failed: {}", e);
            TaskOutcome::LoadFailed(e)
        }
    }
}

fn send(tx: &Sender<TaggedOutcome>, generation: u64, outcome: TaskOutcome) {
    // Receiver is gone only when the game is shutting down
    let _ = tx.send(TaggedOutcome {
        generation,
        outcome,
    });
}

fn spawn_worker<F: FnOnce() + Send + 'static>(name: &str, work: F) {
    if let Err(e) = thread::Builder::new().name(name.to_string()).spawn(work) {
        log::error!("Could not start {} worker: {}", name, e);
    }
}
