//! The runner simulation: entities, world state, and the per-frame step.

pub mod events;
pub mod logic;
pub mod types;

pub use events::TickEvent;
pub use logic::{overlaps, RunState, World, FRAME_MS, MAX_FRAME_DT_MS};
pub use types::{Cloud, Entity, Obstacle, Player, Rect, Tuning};
