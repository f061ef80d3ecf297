//! Data-driven game tuning
//!
//! Every gameplay tunable lives in [`GameConfig`] so hosts can rebalance the
//! game without touching simulation code. Validation is fail-fast: a config
//! that would produce a degenerate brick field is rejected up front.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Precondition violations detected when a config or field size is applied.
///
/// These are programmer/host errors, not steady-state conditions; there is
/// no retry model.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Field dimensions must be positive and finite
    InvalidFieldSize { width: f32, height: f32 },
    /// Brick rows must be at least 1
    NoBrickRows,
    /// Field too narrow for even a single brick column at the target pitch
    FieldTooNarrow { width: f32, pitch: f32 },
    /// A generated brick would have zero or negative extent
    DegenerateBrick { width: f32, height: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFieldSize { width, height } => {
                write!(f, "invalid field size {width}x{height}")
            }
            ConfigError::NoBrickRows => write!(f, "brick row count must be at least 1"),
            ConfigError::FieldTooNarrow { width, pitch } => {
                write!(f, "field width {width} below target brick pitch {pitch}")
            }
            ConfigError::DegenerateBrick { width, height } => {
                write!(f, "degenerate brick size {width}x{height}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Game tuning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Ball radius
    pub ball_radius: f32,
    /// Ball speed on reset, px per tick along each axis
    pub base_speed: f32,
    /// Maximum effective ball speed (after speed_multiplier)
    pub ball_max_speed: f32,

    /// Paddle width at normal size
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Paddle movement per tick under keyed input
    pub paddle_speed: f32,
    /// Paddle width while WidenPaddle is active
    pub paddle_wide_width: f32,
    /// WidenPaddle effect duration in ticks
    pub paddle_widen_ticks: u32,

    /// Brick rows per field
    pub brick_rows: u32,
    /// Target horizontal pitch; columns = floor(field_width / pitch)
    pub brick_target_pitch: f32,
    /// Total left+right field margin around the grid
    pub brick_field_margin: f32,
    /// Horizontal gap carved out of each brick slot
    pub brick_spacing: f32,
    pub brick_height: f32,
    pub brick_row_pitch: f32,
    pub brick_top_offset: f32,
    /// Probability a brick is the multi-hit durable class
    pub special_brick_prob: f32,
    pub special_brick_durability: u32,
    pub special_brick_score: u32,
    pub brick_score: u32,

    /// Probability a destroyed brick drops a power-up
    pub powerup_spawn_prob: f32,
    pub powerup_size: f32,
    pub powerup_fall_speed: f32,
    /// SpeedBoost multiplies speed_multiplier by this factor
    pub speed_boost_factor: f32,
    pub max_speed_multiplier: f32,

    /// Lives at round start
    pub initial_lives: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ball_radius: BALL_RADIUS,
            base_speed: BASE_SPEED,
            ball_max_speed: BALL_MAX_SPEED,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_wide_width: PADDLE_WIDE_WIDTH,
            paddle_widen_ticks: PADDLE_WIDEN_TICKS,
            brick_rows: BRICK_ROWS,
            brick_target_pitch: BRICK_TARGET_PITCH,
            brick_field_margin: BRICK_FIELD_MARGIN,
            brick_spacing: BRICK_SPACING,
            brick_height: BRICK_HEIGHT,
            brick_row_pitch: BRICK_ROW_PITCH,
            brick_top_offset: BRICK_TOP_OFFSET,
            special_brick_prob: SPECIAL_BRICK_PROB,
            special_brick_durability: SPECIAL_BRICK_DURABILITY,
            special_brick_score: SPECIAL_BRICK_SCORE,
            brick_score: BRICK_SCORE,
            powerup_spawn_prob: POWERUP_SPAWN_PROB,
            powerup_size: POWERUP_SIZE,
            powerup_fall_speed: POWERUP_FALL_SPEED,
            speed_boost_factor: SPEED_BOOST_FACTOR,
            max_speed_multiplier: MAX_SPEED_MULTIPLIER,
            initial_lives: INITIAL_LIVES,
        }
    }
}

impl GameConfig {
    /// Validate field dimensions against this config.
    ///
    /// Called before brick generation and on every resize; rejects anything
    /// that would produce a degenerate field or zero-size bricks.
    pub fn validate_field(&self, width: f32, height: f32) -> Result<(), ConfigError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::InvalidFieldSize { width, height });
        }
        if self.brick_rows == 0 {
            return Err(ConfigError::NoBrickRows);
        }
        let cols = (width / self.brick_target_pitch).floor();
        if cols < 1.0 {
            return Err(ConfigError::FieldTooNarrow {
                width,
                pitch: self.brick_target_pitch,
            });
        }
        let brick_width = (width - self.brick_field_margin) / cols - self.brick_spacing;
        if brick_width <= 0.0 || self.brick_height <= 0.0 {
            return Err(ConfigError::DegenerateBrick {
                width: brick_width,
                height: self.brick_height,
            });
        }
        Ok(())
    }
}
