//! Brick field generation
//!
//! Builds the whole grid for a round in one shot. The layout is responsive:
//! column count follows the field width at a fixed target pitch, so a resize
//! regenerates the field wholesale rather than mutating it incrementally.

use rand::Rng;
use rand_pcg::Pcg32;

use super::geom::Rect;
use super::state::Brick;
use crate::config::{ConfigError, GameConfig};

/// Palette rows cycle through these indices; specials get the rainbow slot
const ROW_PALETTE_LEN: u32 = 5;
const RAINBOW_COLOR: u32 = ROW_PALETTE_LEN;

/// Generate the brick set for a field of the given size.
///
/// Deterministic given the RNG state: each brick independently rolls the
/// multi-hit durable class. Fails fast instead of producing zero-size bricks.
pub fn generate(
    field_width: f32,
    field_height: f32,
    config: &GameConfig,
    rng: &mut Pcg32,
) -> Result<Vec<Brick>, ConfigError> {
    config.validate_field(field_width, field_height)?;

    let cols = (field_width / config.brick_target_pitch).floor() as u32;
    let slot_width = (field_width - config.brick_field_margin) / cols as f32;
    let brick_width = slot_width - config.brick_spacing;
    let left_edge = config.brick_field_margin / 2.0;

    let mut bricks = Vec::with_capacity((config.brick_rows * cols) as usize);
    for row in 0..config.brick_rows {
        for col in 0..cols {
            let special = rng.random::<f32>() < config.special_brick_prob;
            let (durability, score, color) = if special {
                (
                    config.special_brick_durability,
                    config.special_brick_score,
                    RAINBOW_COLOR,
                )
            } else {
                (1, config.brick_score, row % ROW_PALETTE_LEN)
            };
            bricks.push(Brick {
                rect: Rect::new(
                    left_edge + col as f32 * slot_width,
                    config.brick_top_offset + row as f32 * config.brick_row_pitch,
                    brick_width,
                    config.brick_height,
                ),
                durability,
                score,
                color,
            });
        }
    }

    log::debug!(
        "generated {} bricks ({} rows x {} cols, {}px wide) for field {}x{}",
        bricks.len(),
        config.brick_rows,
        cols,
        brick_width,
        field_width,
        field_height
    );
    Ok(bricks)
}
