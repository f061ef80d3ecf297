//! Neon Breaker - simulation core for a brick-breaker arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collisions, brick field, game state)
//! - `config`: Data-driven game tuning with fail-fast validation
//! - `driver`: Fixed-timestep tick driver with buffered input
//!
//! The crate owns no rendering or input devices. A host feeds normalized
//! input signals in, runs the driver once per frame, and reads the
//! [`sim::RoundState`] snapshot plus the emitted [`sim::GameEvent`]s back out.

pub mod config;
pub mod driver;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use driver::FixedStepDriver;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default field dimensions
    pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;

    /// Ball defaults (velocities are px per tick)
    pub const BALL_RADIUS: f32 = 12.0;
    pub const BASE_SPEED: f32 = 7.0;
    /// Maximum effective ball speed after the multiplier is applied
    pub const BALL_MAX_SPEED: f32 = 25.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const PADDLE_SPEED: f32 = 12.0;
    /// Paddle top edge sits this far above the field bottom
    pub const PADDLE_BOTTOM_MARGIN: f32 = 50.0;
    /// Widened paddle width while the WidenPaddle effect is active
    pub const PADDLE_WIDE_WIDTH: f32 = 180.0;
    /// WidenPaddle duration (5 seconds at 60 Hz)
    pub const PADDLE_WIDEN_TICKS: u32 = 300;

    /// Brick field defaults
    pub const BRICK_ROWS: u32 = 5;
    /// Column count = floor(field_width / pitch)
    pub const BRICK_TARGET_PITCH: f32 = 100.0;
    /// Outer margin split evenly between the left and right edges
    pub const BRICK_FIELD_MARGIN: f32 = 40.0;
    pub const BRICK_SPACING: f32 = 10.0;
    pub const BRICK_HEIGHT: f32 = 25.0;
    pub const BRICK_ROW_PITCH: f32 = 35.0;
    pub const BRICK_TOP_OFFSET: f32 = 60.0;
    /// Probability a brick rolls the multi-hit durable class
    pub const SPECIAL_BRICK_PROB: f32 = 0.15;
    pub const SPECIAL_BRICK_DURABILITY: u32 = 3;
    pub const SPECIAL_BRICK_SCORE: u32 = 50;
    pub const BRICK_SCORE: u32 = 20;

    /// Power-up defaults
    pub const POWERUP_SPAWN_PROB: f32 = 0.2;
    pub const POWERUP_SIZE: f32 = 20.0;
    /// Downward drift speed (px per tick)
    pub const POWERUP_FALL_SPEED: f32 = 2.0;
    pub const SPEED_BOOST_FACTOR: f32 = 1.3;
    /// speed_multiplier cap so boosted speed stays below BALL_MAX_SPEED
    pub const MAX_SPEED_MULTIPLIER: f32 = 2.5;

    /// Particle defaults
    pub const IMPACT_PARTICLE_COUNT: usize = 20;
    pub const PARTICLE_LIFE_DECAY: f32 = 0.03;
    pub const MAX_PARTICLES: usize = 256;

    /// Lives at round start
    pub const INITIAL_LIVES: u32 = 3;
}
