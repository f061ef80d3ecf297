//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Single writer: all mutation happens inside one `tick` call
//! - No rendering or platform dependencies

pub mod field;
pub mod geom;
pub mod state;
pub mod tick;

pub use field::generate;
pub use geom::{Hit, HitAxis, Rect, intersects, resolve_circle_rect};
pub use state::{
    ActiveEffects, Ball, Brick, GameEvent, GamePhase, Paddle, Particle, PowerUp, PowerUpKind,
    RoundState,
};
pub use tick::{TickInput, tick};
