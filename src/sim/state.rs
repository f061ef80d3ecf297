//! Game state and core simulation types
//!
//! All entities live inside [`RoundState`], which owns them for the lifetime
//! of one round. Only the brick field generator and the round controller
//! touch the active-brick set's membership; the ball and paddle persist
//! across rounds and are reset in place.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::field;
use super::geom::Rect;
use crate::config::{ConfigError, GameConfig};
use crate::consts::{IMPACT_PARTICLE_COUNT, MAX_PARTICLES};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Paused by the host
    Paused,
    /// Ball lost with no lives left; awaiting acknowledgment via `restart()`
    GameOver,
    /// All bricks cleared; awaiting acknowledgment via `restart()`
    Victory,
}

/// Discrete events emitted by a tick for UI/audio/animation collaborators.
///
/// The core never blocks on their handling; the host drains the returned
/// list after each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Ball crossed the bottom boundary with lives remaining
    LifeLost { lives_remaining: u32 },
    /// Ball lost with no lives left
    GameOver,
    /// Last brick destroyed
    Victory,
    /// A brick reached zero durability; carries its score value
    BrickDestroyed { score: u32 },
    /// Ball bounced off the paddle (color-flash hook)
    PaddleHit,
    /// Paddle picked up a falling power-up
    PowerUpCollected { kind: PowerUpKind },
}

/// The energy ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Velocity in px per tick, before the round speed multiplier
    pub vel: Vec2,
    pub radius: f32,
    /// Cosmetic skin index, ignored by the simulation
    pub color: u32,
}

impl Ball {
    /// Re-center the ball and relaunch it up and rightward
    pub fn reset(&mut self, field_width: f32, field_height: f32, base_speed: f32, multiplier: f32) {
        self.pos = Vec2::new(field_width / 2.0, field_height / 2.0);
        self.vel = Vec2::new(base_speed, -base_speed) * multiplier;
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Keep the paddle inside `[0, field_width - width]`, never wrapping
    pub fn clamp_x(&mut self, field_width: f32) {
        self.x = self.x.clamp(0.0, (field_width - self.width).max(0.0));
    }
}

/// A destructible brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    /// Remaining hits before destruction; removed from the set at 0
    pub durability: u32,
    /// Score awarded once, on removal
    pub score: u32,
    /// Palette index for the render adapter
    pub color: u32,
}

/// Power-up effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    ExtraLife,
    SpeedBoost,
    WidenPaddle,
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    /// Drift velocity in px per tick (straight down)
    pub vel: Vec2,
    pub size: f32,
}

/// A cosmetic impact particle (no gameplay effect)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life, 1.0 at spawn, decays each tick
    pub life: f32,
    pub size: f32,
    /// Hue in degrees for the render adapter
    pub color: u32,
}

/// Scheduled state reversions for timed power-up effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    /// Ticks until the widened paddle reverts to its base width
    pub widen_ticks: u32,
}

/// Complete round state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    /// Round seed for reproducibility
    pub seed: u64,
    pub field_width: f32,
    pub field_height: f32,
    pub config: GameConfig,
    pub lives: u32,
    pub score: u32,
    /// Uniform velocity scale; persists across ball resets within a round
    pub speed_multiplier: f32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ball: Ball,
    pub paddle: Paddle,
    /// Active bricks; membership changes only here and in the generator
    pub bricks: Vec<Brick>,
    pub powerups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    pub effects: ActiveEffects,
    rng: Pcg32,
}

impl RoundState {
    /// Create a new round for the given field size and seed.
    ///
    /// Fails fast on a config/field combination that would produce a
    /// degenerate brick grid.
    pub fn new(
        field_width: f32,
        field_height: f32,
        seed: u64,
        config: GameConfig,
    ) -> Result<Self, ConfigError> {
        config.validate_field(field_width, field_height)?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let bricks = field::generate(field_width, field_height, &config, &mut rng)?;

        let paddle = Paddle {
            x: field_width / 2.0 - config.paddle_width / 2.0,
            y: field_height - crate::consts::PADDLE_BOTTOM_MARGIN,
            width: config.paddle_width,
            height: config.paddle_height,
        };
        let mut ball = Ball {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: config.ball_radius,
            color: 0,
        };
        ball.reset(field_width, field_height, config.base_speed, 1.0);

        Ok(Self {
            seed,
            field_width,
            field_height,
            lives: config.initial_lives,
            score: 0,
            speed_multiplier: 1.0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            ball,
            paddle,
            bricks,
            powerups: Vec::new(),
            particles: Vec::new(),
            effects: ActiveEffects::default(),
            config,
            rng,
        })
    }

    /// Whether the tick driver should skip stepping this frame
    pub fn is_paused(&self) -> bool {
        self.phase != GamePhase::Playing
    }

    /// Reset the ball to field center, keeping the round speed multiplier
    pub fn reset_ball(&mut self) {
        self.ball.reset(
            self.field_width,
            self.field_height,
            self.config.base_speed,
            self.speed_multiplier,
        );
    }

    /// Full restart: fresh brick field, lives and multiplier back to initial,
    /// ball recentered, Playing resumed.
    ///
    /// Called by the host to acknowledge a GameOver/Victory notification.
    pub fn restart(&mut self) {
        log::info!(
            "round restart: score={} field={}x{}",
            self.score,
            self.field_width,
            self.field_height
        );
        self.regenerate_bricks();
        self.lives = self.config.initial_lives;
        self.speed_multiplier = 1.0;
        self.effects = ActiveEffects::default();
        self.paddle.width = self.config.paddle_width;
        self.paddle.clamp_x(self.field_width);
        self.powerups.clear();
        self.particles.clear();
        self.reset_ball();
        self.phase = GamePhase::Playing;
    }

    /// Apply a new field size: regenerate the brick field and reset the ball.
    ///
    /// In-progress brick layout is deliberately discarded. Fails fast on
    /// degenerate dimensions, leaving the previous state untouched.
    pub fn on_field_resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        self.config.validate_field(width, height)?;
        log::info!(
            "field resize {}x{} -> {}x{}",
            self.field_width,
            self.field_height,
            width,
            height
        );
        self.field_width = width;
        self.field_height = height;
        self.paddle.y = height - crate::consts::PADDLE_BOTTOM_MARGIN;
        self.paddle.clamp_x(width);
        self.regenerate_bricks();
        self.reset_ball();
        Ok(())
    }

    /// Regenerate the brick field for the current dimensions.
    ///
    /// Dimensions were validated when they were set, so generation cannot
    /// fail here; if it somehow does, keep the old field rather than play on
    /// with an empty one.
    fn regenerate_bricks(&mut self) {
        match field::generate(
            self.field_width,
            self.field_height,
            &self.config,
            &mut self.rng,
        ) {
            Ok(bricks) => self.bricks = bricks,
            Err(err) => log::error!("brick regeneration failed: {err}"),
        }
    }

    /// Spawn a burst of impact particles at a contact point
    pub fn spawn_impact_particles(&mut self, at: Vec2) {
        for _ in 0..IMPACT_PARTICLE_COUNT {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 10.0,
                (self.rng.random::<f32>() - 0.5) * 10.0,
            );
            self.particles.push(Particle {
                pos: at,
                vel,
                life: 1.0,
                size: self.rng.random::<f32>() * 4.0 + 2.0,
                color: self.rng.random_range(0..360),
            });
        }
    }

    /// Roll the power-up drop for a destroyed brick centered at `at`
    pub fn roll_powerup(&mut self, at: Vec2) {
        if self.rng.random::<f32>() >= self.config.powerup_spawn_prob {
            return;
        }
        let kind = match self.rng.random_range(0..3u32) {
            0 => PowerUpKind::ExtraLife,
            1 => PowerUpKind::SpeedBoost,
            _ => PowerUpKind::WidenPaddle,
        };
        self.powerups.push(PowerUp {
            kind,
            pos: at,
            vel: Vec2::new(0.0, self.config.powerup_fall_speed),
            size: self.config.powerup_size,
        });
    }
}
