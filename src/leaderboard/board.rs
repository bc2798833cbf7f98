//! What the leaderboard panel and status line currently show.

use super::client::LeaderboardError;
use super::tasks::TaskOutcome;
use super::types::{rows_from_records, LeaderboardRow, ScoreRecord};

pub const NO_SCORES_TEXT: &str = "No scores yet";
pub const LOAD_FAILED_TEXT: &str = "Failed to load";
pub const LOADING_TEXT: &str = "Loading...";
pub const OFFLINE_TEXT: &str = "Leaderboard offline";

pub const STATUS_SAVING: &str = "Saving score...";
pub const STATUS_SAVED: &str = "Score saved!";
pub const STATUS_SAVE_FAILED: &str = "Failed to save score";
pub const STATUS_SAVE_ERROR: &str = "Error saving score";
pub const STATUS_NOT_SAVED_OFFLINE: &str = "Score not saved (offline)";

/// Contents of the leaderboard panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Loading,
    Offline,
    /// The server has no scores (or sent something we could not read).
    Empty,
    Rows(Vec<LeaderboardRow>),
    Unavailable,
}

/// Displayed leaderboard, status line, and best known score.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard {
    pub panel: PanelState,
    pub status: String,
    /// Top score from the last successful load.
    pub high_score: i64,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            panel: PanelState::Loading,
            status: String::new(),
            high_score: 0,
        }
    }

    pub fn offline() -> Self {
        Self {
            panel: PanelState::Offline,
            status: OFFLINE_TEXT.to_string(),
            high_score: 0,
        }
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    /// Replace the panel with freshly loaded records. The first record is the
    /// best score and becomes the high score.
    pub fn show_records(&mut self, records: &[ScoreRecord]) {
        match records.first() {
            Some(top) => {
                self.high_score = top.score;
                self.panel = PanelState::Rows(rows_from_records(records));
            }
            None => self.panel = PanelState::Empty,
        }
    }

    /// Fold a background outcome into what is displayed.
    pub fn apply(&mut self, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::ScoreSaved => self.set_status(STATUS_SAVED),
            TaskOutcome::ScoreRejected(LeaderboardError::Status(_)) => {
                self.set_status(STATUS_SAVE_FAILED)
            }
            TaskOutcome::ScoreRejected(_) => self.set_status(STATUS_SAVE_ERROR),
            TaskOutcome::Loaded(records) => self.show_records(records),
            TaskOutcome::LoadFailed(_) => self.panel = PanelState::Unavailable,
        }
    }
}
