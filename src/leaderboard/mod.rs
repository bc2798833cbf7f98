//! Remote leaderboard: wire types, HTTP client, background tasks, panel state.

pub mod board;
pub mod client;
pub mod tasks;
pub mod types;

pub use board::{Leaderboard, PanelState};
pub use client::{HttpScoreService, LeaderboardError, ScoreService};
pub use tasks::{LeaderboardTasks, TaggedOutcome, TaskOutcome};
pub use types::{LeaderboardRow, RawTimestamp, ScoreRecord};
