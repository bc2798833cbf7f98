//! Events produced by a single simulation tick.
//!
//! The world never touches the network or the screen; the loop controller
//! turns these into status messages and leaderboard requests.

/// Something noteworthy that happened during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// A new obstacle entered at the right edge.
    ObstacleSpawned { height: f64 },
    /// An obstacle left the field and was scored.
    ObstaclePassed { score: u32 },
    /// The score hit a step boundary and the run got harder.
    DifficultyIncreased { speed: f64, spawn_cadence: u32 },
    /// The player hit an obstacle. Emitted once per run.
    GameOver { score: u32, generation: u64 },
}
