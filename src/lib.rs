//! Dino Runner - endless runner in the terminal with a remote leaderboard.
//!
//! The simulation (`game`) has no terminal or network dependencies; `app`
//! wires it to the leaderboard client and `ui` draws it with ratatui.

pub mod app;
pub mod config;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod ui;
pub mod utils;

pub use app::App;
pub use config::Config;
pub use game::{TickEvent, World};
