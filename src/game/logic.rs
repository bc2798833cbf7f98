//! Runner game logic: the world state machine, per-tick update, collision.

use super::events::TickEvent;
use super::types::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Fixed simulation step (~60 FPS, one display refresh).
pub const FRAME_MS: u64 = 16;

/// Elapsed time handed to `advance` is clamped to this, so a stall
/// (suspended terminal, slow draw) cannot fast-forward the run.
pub const MAX_FRAME_DT_MS: u64 = 100;

/// Run lifecycle. `GameOver` is terminal until `World::restart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    GameOver,
}

/// Strict AABB intersection. Rectangles that only share an edge do not overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Everything that changes during a run, plus the decorative clouds.
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: Tuning,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub clouds: Vec<Cloud>,

    // -- Run state --
    pub score: u32,
    /// Obstacle drift in units/tick. Only ever increases within a run.
    pub speed: f64,
    /// Ticks between spawns. Only ever decreases, never below `tuning.min_spawn_cadence`.
    pub spawn_cadence: u32,
    pub frame_count: u64,
    pub state: RunState,
    /// Bumped on every restart. Async results are tagged with it.
    pub generation: u64,

    /// Sub-frame time accumulator for `advance`.
    pub accumulated_time_ms: u64,
    rng: StdRng,
}

impl World {
    pub fn new(tuning: Tuning) -> Self {
        Self::from_rng(tuning, StdRng::from_entropy())
    }

    /// Deterministic world for tests and replays of a single session.
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self::from_rng(tuning, StdRng::seed_from_u64(seed))
    }

    fn from_rng(tuning: Tuning, mut rng: StdRng) -> Self {
        let tuning = tuning.sanitized();
        let clouds = (0..CLOUD_COUNT).map(|_| Cloud::new(&mut rng)).collect();
        Self {
            tuning,
            player: Player::new(),
            obstacles: Vec::new(),
            clouds,
            score: 0,
            speed: tuning.initial_speed,
            spawn_cadence: tuning.initial_spawn_cadence,
            frame_count: 0,
            state: RunState::Running,
            generation: 0,
            accumulated_time_ms: 0,
            rng,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.state == RunState::GameOver
    }

    /// Request a jump. Ignored while airborne or after the run has ended.
    pub fn jump(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.player.jump(self.tuning.jump_impulse)
    }

    /// Reset the run. Clouds are decoration and keep drifting where they are.
    pub fn restart(&mut self) {
        self.player = Player::new();
        self.obstacles.clear();
        self.score = 0;
        self.speed = self.tuning.initial_speed;
        self.spawn_cadence = self.tuning.initial_spawn_cadence;
        self.frame_count = 0;
        self.state = RunState::Running;
        self.accumulated_time_ms = 0;
        self.generation += 1;
        log::info!("Run restarted (generation {})", self.generation);
    }

    /// Advance by `dt_ms` of wall time, stepping whole frames.
    pub fn advance(&mut self, dt_ms: u64) -> Vec<TickEvent> {
        let mut events = Vec::new();
        if self.is_game_over() {
            return events;
        }

        self.accumulated_time_ms += dt_ms.min(MAX_FRAME_DT_MS);
        while self.accumulated_time_ms >= FRAME_MS {
            self.accumulated_time_ms -= FRAME_MS;
            events.extend(self.tick());
            if self.is_game_over() {
                self.accumulated_time_ms = 0;
                break;
            }
        }
        events
    }

    /// One simulation step. Does nothing once the run is over.
    pub fn tick(&mut self) -> Vec<TickEvent> {
        let mut events = Vec::new();
        if self.is_game_over() {
            return events;
        }

        // 1. Background
        for cloud in &mut self.clouds {
            cloud.update(&mut self.rng);
        }

        // 2. Runner
        self.player.update(self.tuning.gravity);

        // 3. Spawning
        self.frame_count += 1;
        if self.frame_count % u64::from(self.spawn_cadence) == 0 {
            let obstacle = Obstacle::spawn(&mut self.rng);
            log::debug!(
                "Spawned obstacle h={:.1} at frame {}",
                obstacle.height,
                self.frame_count
            );
            events.push(TickEvent::ObstacleSpawned {
                height: obstacle.height,
            });
            self.obstacles.push(obstacle);
        }

        // 4. Obstacles: drift, collide, score
        let runner = self.player.bounds();
        let mut i = 0;
        while i < self.obstacles.len() {
            let obstacle = &mut self.obstacles[i];
            obstacle.update(self.speed);

            if overlaps(&runner, &obstacle.bounds()) {
                self.state = RunState::GameOver;
                log::info!("Game over at score {}", self.score);
                events.push(TickEvent::GameOver {
                    score: self.score,
                    generation: self.generation,
                });
                return events;
            }

            if obstacle.has_exited_left() {
                self.obstacles.remove(i);
                self.score += 1;
                events.push(TickEvent::ObstaclePassed { score: self.score });
                if self.score % self.tuning.points_per_step == 0 {
                    self.step_difficulty();
                    events.push(TickEvent::DifficultyIncreased {
                        speed: self.speed,
                        spawn_cadence: self.spawn_cadence,
                    });
                }
                continue;
            }

            i += 1;
        }

        events
    }

    fn step_difficulty(&mut self) {
        self.speed += self.tuning.speed_step;
        self.spawn_cadence = self
            .spawn_cadence
            .saturating_sub(self.tuning.cadence_step)
            .max(self.tuning.min_spawn_cadence);
        log::debug!(
            "Difficulty up: speed {:.1}, cadence {}",
            self.speed,
            self.spawn_cadence
        );
    }
}
