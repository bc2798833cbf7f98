//! Runner data structures: field geometry, tuning, and the three entity kinds.
//!
//! Coordinates are in field units with the origin at the top-left corner;
//! y grows downward, so "up" is a negative velocity.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Play field dimensions.
pub const FIELD_WIDTH: f64 = 800.0;
pub const FIELD_HEIGHT: f64 = 200.0;

/// Distance from the bottom of the field to the ground line.
pub const GROUND_OFFSET: f64 = 10.0;

/// Y coordinate of the ground line. Entities rest with their bottom edge here.
pub const GROUND_Y: f64 = FIELD_HEIGHT - GROUND_OFFSET;

/// Player geometry.
pub const PLAYER_X: f64 = 50.0;
pub const PLAYER_START_Y: f64 = 150.0;
pub const PLAYER_WIDTH: f64 = 40.0;
pub const PLAYER_HEIGHT: f64 = 50.0;

/// Obstacle geometry. Height is drawn from `[OBSTACLE_MIN_HEIGHT, OBSTACLE_MAX_HEIGHT)`.
pub const OBSTACLE_WIDTH: f64 = 20.0;
pub const OBSTACLE_MIN_HEIGHT: f64 = 40.0;
pub const OBSTACLE_MAX_HEIGHT: f64 = 60.0;

/// Decorative cloud population and ranges.
pub const CLOUD_COUNT: usize = 3;
pub const CLOUD_HEIGHT: f64 = 20.0;
/// Clouds re-enter somewhere in `[FIELD_WIDTH, FIELD_WIDTH + CLOUD_RESPAWN_SPREAD)`.
pub const CLOUD_RESPAWN_SPREAD: f64 = 200.0;

/// Ground dash pattern: one dash every `GROUND_DASH_SPACING` units, scrolled by frame count.
pub const GROUND_DASH_SPACING: u64 = 20;
pub const GROUND_DASH_LENGTH: f64 = 10.0;

/// Gameplay numbers. `Default` reproduces the classic feel; every field can be
/// overridden from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Velocity change per tick (positive = downward).
    pub gravity: f64,
    /// Velocity set by a jump (negative = upward).
    pub jump_impulse: f64,
    /// Obstacle drift in units/tick at the start of a run.
    pub initial_speed: f64,
    /// Ticks between obstacle spawns at the start of a run.
    pub initial_spawn_cadence: u32,
    /// Speed added at every difficulty step.
    pub speed_step: f64,
    /// Ticks removed from the spawn cadence at every difficulty step.
    pub cadence_step: u32,
    /// Spawn cadence never drops below this.
    pub min_spawn_cadence: u32,
    /// A difficulty step happens whenever the score reaches a multiple of this.
    pub points_per_step: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_impulse: -12.0,
            initial_speed: 3.0,
            initial_spawn_cadence: 120,
            speed_step: 0.5,
            cadence_step: 5,
            min_spawn_cadence: 60,
            points_per_step: 10,
        }
    }
}

impl Tuning {
    /// Replace values that would break the loop: zero cadence or step size,
    /// speed that never moves or falls, gravity that never lands the runner,
    /// a jump that does not go up.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.min_spawn_cadence = self.min_spawn_cadence.max(1);
        self.initial_spawn_cadence = self.initial_spawn_cadence.max(self.min_spawn_cadence);
        self.points_per_step = self.points_per_step.max(1);
        if !(self.initial_speed.is_finite() && self.initial_speed > 0.0) {
            self.initial_speed = defaults.initial_speed;
        }
        if !(self.speed_step.is_finite() && self.speed_step >= 0.0) {
            self.speed_step = 0.0;
        }
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            self.gravity = defaults.gravity;
        }
        if !(self.jump_impulse.is_finite() && self.jump_impulse < 0.0) {
            self.jump_impulse = defaults.jump_impulse;
        }
        self
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

/// Anything that occupies space on the field. Rendering and collision both
/// work from the bounding box alone.
pub trait Entity {
    fn bounds(&self) -> Rect;

    /// True once the entity's right edge has passed the left edge of the field.
    fn has_exited_left(&self) -> bool {
        self.bounds().right() < 0.0
    }
}

/// The runner.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Vertical velocity in units/tick (negative = upward).
    pub velocity: f64,
    pub grounded: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            x: PLAYER_X,
            y: PLAYER_START_Y,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            velocity: 0.0,
            grounded: false,
        }
    }

    /// Integrate gravity for one tick and clamp to the ground line.
    pub fn update(&mut self, gravity: f64) {
        self.velocity += gravity;
        self.y += self.velocity;

        if self.y + self.height >= GROUND_Y {
            self.y = GROUND_Y - self.height;
            self.velocity = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    /// Start a jump. Returns false (and changes nothing) when airborne.
    pub fn jump(&mut self, impulse: f64) -> bool {
        if !self.grounded {
            return false;
        }
        self.velocity = impulse;
        self.grounded = false;
        true
    }
}

impl Entity for Player {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A ground obstacle drifting toward the player.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    /// Build an obstacle of the given height at the right edge, resting on the ground.
    pub fn with_height(height: f64) -> Self {
        Self {
            x: FIELD_WIDTH,
            y: GROUND_Y - height,
            width: OBSTACLE_WIDTH,
            height,
        }
    }

    /// Spawn at the right edge with a random height.
    pub fn spawn<R: Rng>(rng: &mut R) -> Self {
        Self::with_height(rng.gen_range(OBSTACLE_MIN_HEIGHT..OBSTACLE_MAX_HEIGHT))
    }

    pub fn update(&mut self, speed: f64) {
        self.x -= speed;
    }
}

impl Entity for Obstacle {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Background decoration. Never collides; recycled instead of removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

impl Cloud {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self {
            x: FIELD_WIDTH + rng.gen_range(0.0..CLOUD_RESPAWN_SPREAD),
            y: rng.gen_range(20.0..70.0),
            width: rng.gen_range(40.0..70.0),
            height: CLOUD_HEIGHT,
            speed: rng.gen_range(0.5..1.0),
        }
    }

    /// Drift left; wrap back past the right edge once fully off-screen.
    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        self.x -= self.speed;
        if self.has_exited_left() {
            self.x = FIELD_WIDTH + rng.gen_range(0.0..CLOUD_RESPAWN_SPREAD);
        }
    }
}

impl Entity for Cloud {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_tuning_values() {
        let t = Tuning::default();
        assert!((t.gravity - 0.6).abs() < f64::EPSILON);
        assert!((t.jump_impulse - (-12.0)).abs() < f64::EPSILON);
        assert!((t.initial_speed - 3.0).abs() < f64::EPSILON);
        assert_eq!(t.initial_spawn_cadence, 120);
        assert_eq!(t.min_spawn_cadence, 60);
        assert_eq!(t.points_per_step, 10);
    }

    #[test]
    fn test_sanitized_rejects_zero_cadence() {
        let t = Tuning {
            initial_spawn_cadence: 0,
            min_spawn_cadence: 0,
            points_per_step: 0,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(t.min_spawn_cadence, 1);
        assert!(t.initial_spawn_cadence >= 1);
        assert_eq!(t.points_per_step, 1);
    }

    #[test]
    fn test_sanitized_rejects_broken_physics() {
        let t = Tuning {
            speed_step: -0.5,
            gravity: f64::NAN,
            jump_impulse: 4.0,
            initial_speed: f64::INFINITY,
            ..Tuning::default()
        }
        .sanitized();
        let defaults = Tuning::default();
        assert_eq!(t.speed_step, 0.0);
        assert_eq!(t.gravity, defaults.gravity);
        assert_eq!(t.jump_impulse, defaults.jump_impulse);
        assert_eq!(t.initial_speed, defaults.initial_speed);

        let t = Tuning {
            gravity: -0.6,
            jump_impulse: 0.0,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(t.gravity, defaults.gravity);
        assert_eq!(t.jump_impulse, defaults.jump_impulse);
    }

    #[test]
    fn test_sanitized_keeps_valid_custom_values() {
        let custom = Tuning {
            gravity: 0.8,
            jump_impulse: -14.0,
            speed_step: 0.0,
            ..Tuning::default()
        };
        assert_eq!(custom.sanitized(), custom);
    }

    #[test]
    fn test_player_lands_on_ground() {
        let mut player = Player::new();
        assert!(!player.grounded);

        player.update(0.6);

        assert!(player.grounded);
        assert!((player.y + player.height - GROUND_Y).abs() < f64::EPSILON);
        assert!(player.velocity.abs() < f64::EPSILON);
    }

    #[test]
    fn test_player_jump_requires_ground() {
        let mut player = Player::new();
        assert!(!player.jump(-12.0), "not grounded before first update");

        player.update(0.6);
        assert!(player.jump(-12.0));
        assert!((player.velocity - (-12.0)).abs() < f64::EPSILON);

        // Already left the ground: second request does nothing
        player.velocity = -5.0;
        assert!(!player.jump(-12.0));
        assert!((player.velocity - (-5.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_obstacle_spawn_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let obs = Obstacle::spawn(&mut rng);
            assert!(obs.height >= OBSTACLE_MIN_HEIGHT && obs.height < OBSTACLE_MAX_HEIGHT);
            assert!((obs.x - FIELD_WIDTH).abs() < f64::EPSILON);
            assert!((obs.bounds().bottom() - GROUND_Y).abs() < 1e-9);
            assert!((obs.width - OBSTACLE_WIDTH).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_obstacle_drifts_by_speed() {
        let mut obs = Obstacle::with_height(50.0);
        obs.update(3.0);
        obs.update(3.0);
        assert!((obs.x - (FIELD_WIDTH - 6.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cloud_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let c = Cloud::new(&mut rng);
            assert!(c.x >= FIELD_WIDTH && c.x < FIELD_WIDTH + CLOUD_RESPAWN_SPREAD);
            assert!(c.y >= 20.0 && c.y < 70.0);
            assert!(c.width >= 40.0 && c.width < 70.0);
            assert!(c.speed >= 0.5 && c.speed < 1.0);
        }
    }

    #[test]
    fn test_cloud_wraps_instead_of_disappearing() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut cloud = Cloud::new(&mut rng);
        cloud.x = -cloud.width + 0.1;

        cloud.update(&mut rng);

        assert!(cloud.x >= FIELD_WIDTH);
        assert!(cloud.x < FIELD_WIDTH + CLOUD_RESPAWN_SPREAD);
    }

    #[test]
    fn test_cloud_partially_visible_keeps_drifting() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut cloud = Cloud::new(&mut rng);
        cloud.x = -10.0;
        let before = cloud.x;

        cloud.update(&mut rng);

        assert!((cloud.x - (before - cloud.speed)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_has_exited_left_is_strict() {
        let mut obs = Obstacle::with_height(50.0);
        obs.x = -OBSTACLE_WIDTH;
        assert!(!obs.has_exited_left(), "right edge exactly at 0 is still on the field");
        obs.x -= 0.5;
        assert!(obs.has_exited_left());
    }
}
