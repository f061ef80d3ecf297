//! Per-tick simulation step and round/life controller
//!
//! One call advances the world by exactly one tick. Order matters and is
//! fixed: paddle input, ball advance, walls, paddle, bricks, particles,
//! power-ups, ball-lost, victory. Input is a buffered snapshot consumed
//! atomically at the start of the tick; all entity mutation happens inside
//! this call.

use glam::Vec2;

use super::geom::{self, HitAxis};
use super::state::{GameEvent, GamePhase, PowerUpKind, RoundState};
use crate::consts::PARTICLE_LIFE_DECAY;

/// Normalized input snapshot for a single tick.
///
/// Keyboard reduces to the move flags; drag/touch reduces to `target_x`
/// (desired paddle center), which takes precedence when present.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Absolute target for the paddle's horizontal center
    pub target_x: Option<f32>,
    /// Pause toggle (one-shot; the driver clears it after the first substep)
    pub pause: bool,
}

/// Advance the round by one tick, returning the events it produced.
///
/// A no-op outside the Playing phase: GameOver/Victory park the simulation
/// until the host acknowledges via [`RoundState::restart`].
pub fn tick(state: &mut RoundState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return events;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }
    if state.phase != GamePhase::Playing {
        return events;
    }

    state.time_ticks += 1;

    // 1. Paddle input, clamped to the field
    apply_paddle_input(state, input);

    // 2. Advance the ball
    advance_ball(state);

    // 3. Wall reflections (bottom stays open: that's the life-loss boundary)
    wall_collisions(state);

    // 4. Paddle deflection
    paddle_collision(state, &mut events);

    // 5. Brick hits, mark-then-compact
    let bricks_before = state.bricks.len();
    brick_collisions(state, &mut events);

    // 6. Particle lifecycle
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life -= PARTICLE_LIFE_DECAY;
    }
    state.particles.retain(|p| p.life > 0.0);

    // 7. Power-up drift, pickup, and scheduled effect expiry
    update_powerups(state, &mut events);

    // 8. Ball-lost check
    if state.ball.pos.y - state.ball.radius > state.field_height {
        handle_ball_lost(state, &mut events);
    }

    // 9. Victory fires only on the >0 -> 0 transition within this tick
    if bricks_before > 0 && state.bricks.is_empty() && state.phase == GamePhase::Playing {
        state.phase = GamePhase::Victory;
        events.push(GameEvent::Victory);
    }

    events
}

fn apply_paddle_input(state: &mut RoundState, input: &TickInput) {
    if let Some(target) = input.target_x {
        state.paddle.x = target - state.paddle.width / 2.0;
    } else {
        if input.move_left {
            state.paddle.x -= state.config.paddle_speed;
        }
        if input.move_right {
            state.paddle.x += state.config.paddle_speed;
        }
    }
    state.paddle.clamp_x(state.field_width);
}

fn advance_ball(state: &mut RoundState) {
    let mut step = state.ball.vel * state.speed_multiplier;
    let max = state.config.ball_max_speed;
    if step.length() > max {
        step = step.normalize() * max;
    }
    state.ball.pos += step;

    // Non-finite state is a precondition violation; recover rather than
    // propagate NaN into rendering
    if !state.ball.pos.is_finite() || !state.ball.vel.is_finite() {
        log::warn!(
            "non-finite ball state at tick {}, recentering",
            state.time_ticks
        );
        state.reset_ball();
    }
}

fn wall_collisions(state: &mut RoundState) {
    let ball = &mut state.ball;
    let r = ball.radius;
    // Sign is forced, not negated, so one crossing reflects exactly once
    if ball.pos.x < r {
        ball.pos.x = r;
        ball.vel.x = ball.vel.x.abs();
    } else if ball.pos.x > state.field_width - r {
        ball.pos.x = state.field_width - r;
        ball.vel.x = -ball.vel.x.abs();
    }
    if ball.pos.y < r {
        ball.pos.y = r;
        ball.vel.y = ball.vel.y.abs();
    }
}

fn paddle_collision(state: &mut RoundState, events: &mut Vec<GameEvent>) {
    let paddle = state.paddle.rect();
    let ball = &state.ball;

    let in_band =
        ball.pos.y + ball.radius >= paddle.y && ball.pos.y <= paddle.y + paddle.height;
    let in_span = ball.pos.x >= paddle.x && ball.pos.x <= paddle.x + paddle.width;
    if !(in_band && in_span) {
        return;
    }

    // Deflection angle varies continuously across the paddle face:
    // center sends the ball straight up, edges send it sideways
    let hit_fraction = (ball.pos.x - paddle.x) / paddle.width;
    let contact = Vec2::new(ball.pos.x, paddle.y);
    state.ball.vel.y = -state.ball.vel.y.abs();
    state.ball.vel.x = 10.0 * (hit_fraction - 0.5);

    state.spawn_impact_particles(contact);
    events.push(GameEvent::PaddleHit);
}

fn brick_collisions(state: &mut RoundState, events: &mut Vec<GameEvent>) {
    let ball_pos = state.ball.pos;
    let ball_radius = state.ball.radius;

    // Scan first, mutate after: removing bricks mid-iteration shifts indices
    let hits: Vec<(usize, HitAxis)> = state
        .bricks
        .iter()
        .enumerate()
        .filter_map(|(idx, brick)| {
            geom::resolve_circle_rect(ball_pos, ball_radius, &brick.rect)
                .map(|hit| (idx, hit.axis))
        })
        .collect();

    let mut destroyed: Vec<(Vec2, u32)> = Vec::new();
    for &(idx, axis) in &hits {
        match axis {
            HitAxis::X => state.ball.vel.x = -state.ball.vel.x,
            HitAxis::Y => state.ball.vel.y = -state.ball.vel.y,
            HitAxis::Corner => state.ball.vel = -state.ball.vel,
        }

        let brick = &mut state.bricks[idx];
        brick.durability = brick.durability.saturating_sub(1);
        let center = brick.rect.center();
        if brick.durability == 0 {
            destroyed.push((center, brick.score));
        }
        state.spawn_impact_particles(center);
    }

    // Score and the power-up roll happen exactly once, at removal
    state.bricks.retain(|b| b.durability > 0);
    for (center, score) in destroyed {
        state.score += score;
        events.push(GameEvent::BrickDestroyed { score });
        state.roll_powerup(center);
    }
}

fn update_powerups(state: &mut RoundState, events: &mut Vec<GameEvent>) {
    // Scheduled reversion for the widened paddle, checked once per tick
    if state.effects.widen_ticks > 0 {
        state.effects.widen_ticks -= 1;
        if state.effects.widen_ticks == 0 {
            let center = state.paddle.x + state.paddle.width / 2.0;
            state.paddle.width = state.config.paddle_width;
            state.paddle.x = center - state.paddle.width / 2.0;
            state.paddle.clamp_x(state.field_width);
        }
    }

    let paddle = state.paddle.rect();
    let field_height = state.field_height;
    let mut collected: Vec<PowerUpKind> = Vec::new();

    state.powerups.retain_mut(|pu| {
        pu.pos += pu.vel;

        let caught = pu.pos.y + pu.size >= paddle.y
            && pu.pos.x >= paddle.x
            && pu.pos.x <= paddle.x + paddle.width;
        if caught {
            collected.push(pu.kind);
            return false;
        }
        pu.pos.y <= field_height + pu.size
    });

    for kind in collected {
        match kind {
            PowerUpKind::ExtraLife => state.lives += 1,
            PowerUpKind::SpeedBoost => {
                state.speed_multiplier = (state.speed_multiplier
                    * state.config.speed_boost_factor)
                    .min(state.config.max_speed_multiplier);
            }
            PowerUpKind::WidenPaddle => {
                let center = state.paddle.x + state.paddle.width / 2.0;
                state.paddle.width = state.config.paddle_wide_width;
                state.paddle.x = center - state.paddle.width / 2.0;
                state.paddle.clamp_x(state.field_width);
                state.effects.widen_ticks = state.config.paddle_widen_ticks;
            }
        }
        events.push(GameEvent::PowerUpCollected { kind });
    }
}

fn handle_ball_lost(state: &mut RoundState, events: &mut Vec<GameEvent>) {
    state.lives = state.lives.saturating_sub(1);
    if state.lives == 0 {
        log::info!("game over at tick {} with score {}", state.time_ticks, state.score);
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver);
    } else {
        events.push(GameEvent::LifeLost {
            lives_remaining: state.lives,
        });
        state.reset_ball();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::geom::Rect;
    use crate::sim::state::{Brick, PowerUp};

    fn new_state() -> RoundState {
        let _ = env_logger::builder().is_test(true).try_init();
        RoundState::new(800.0, 600.0, 7, GameConfig::default()).unwrap()
    }

    /// Single glass brick, ball parked out of the way
    fn state_with_one_brick(durability: u32) -> RoundState {
        let mut state = new_state();
        state.bricks = vec![Brick {
            rect: Rect::new(100.0, 100.0, 80.0, 25.0),
            durability,
            score: 20,
            color: 0,
        }];
        state.ball.pos = Vec2::new(400.0, 300.0);
        state.ball.vel = Vec2::ZERO;
        state
    }

    fn aim_at_brick(state: &mut RoundState) {
        state.ball.pos = Vec2::new(140.0, 140.0);
        state.ball.vel = Vec2::new(0.0, -7.0);
    }

    #[test]
    fn test_paddle_center_hit_straightens_ball() {
        let mut state = new_state();
        state.bricks.clear(); // keep the flight path clear
        // Paddle at (340, 580) w=120; ball arrives descending at its center
        state.paddle.x = 340.0;
        state.paddle.y = 580.0;
        state.ball.pos = Vec2::new(393.0, 574.0);
        state.ball.vel = Vec2::new(7.0, 7.0);

        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::PaddleHit));
        assert_eq!(state.ball.vel.y, -7.0);
        assert_eq!(state.ball.vel.x, 0.0);
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_paddle_edge_hit_deflects_sideways() {
        let mut state = new_state();
        state.bricks.clear();
        state.paddle.x = 340.0;
        state.paddle.y = 580.0;
        // Contact near the right edge: hit_fraction ~ 0.9
        state.ball.pos = Vec2::new(448.0, 574.0);
        state.ball.vel = Vec2::new(0.0, 7.0);

        tick(&mut state, &TickInput::default());
        assert!(state.ball.vel.x > 3.5);
        assert_eq!(state.ball.vel.y, -7.0);
    }

    #[test]
    fn test_wall_reflection_once_per_crossing() {
        let mut state = new_state();
        state.bricks.clear();
        state.ball.pos = Vec2::new(15.0, 300.0);
        state.ball.vel = Vec2::new(-7.0, 0.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.vel.x, 7.0);
        assert_eq!(state.ball.pos.x, 12.0); // clamped to the radius

        // Still near the wall but moving away: no second reflection
        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.vel.x, 7.0);

        // A second left-wall hit restores the same rightward direction
        state.ball.pos = Vec2::new(15.0, 300.0);
        state.ball.vel = Vec2::new(-7.0, 0.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.vel.x, 7.0);
    }

    #[test]
    fn test_top_wall_reflects_down() {
        let mut state = new_state();
        state.bricks.clear();
        state.ball.pos = Vec2::new(400.0, 14.0);
        state.ball.vel = Vec2::new(0.0, -7.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.ball.vel.y, 7.0);
        assert_eq!(state.ball.pos.y, 12.0);
    }

    #[test]
    fn test_brick_takes_exactly_three_hits() {
        let mut state = state_with_one_brick(3);

        for expected_remaining in [2u32, 1] {
            aim_at_brick(&mut state);
            let events = tick(&mut state, &TickInput::default());
            assert_eq!(state.bricks.len(), 1);
            assert_eq!(state.bricks[0].durability, expected_remaining);
            assert_eq!(state.score, 0, "score must not accrue before removal");
            assert!(!events.iter().any(|e| matches!(e, GameEvent::BrickDestroyed { .. })));
            // Reflected off the brick's bottom face
            assert_eq!(state.ball.vel.y, 7.0);
        }

        aim_at_brick(&mut state);
        let events = tick(&mut state, &TickInput::default());
        assert!(state.bricks.is_empty());
        assert_eq!(state.score, 20);
        assert!(events.contains(&GameEvent::BrickDestroyed { score: 20 }));
        assert!(events.contains(&GameEvent::Victory));
        assert_eq!(state.phase, GamePhase::Victory);
    }

    #[test]
    fn test_victory_requires_transition() {
        let mut state = new_state();
        state.bricks.clear();
        state.ball.vel = Vec2::ZERO;
        // Set was already empty at tick start: no Victory
        let events = tick(&mut state, &TickInput::default());
        assert!(!events.contains(&GameEvent::Victory));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_life_lost_exactly_once_per_crossing() {
        let mut state = new_state();
        state.bricks.clear();
        state.ball.pos = Vec2::new(400.0, 620.0);
        state.ball.vel = Vec2::new(0.0, 7.0);

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(events, vec![GameEvent::LifeLost { lives_remaining: 2 }]);
        assert_eq!(state.lives, 2);
        // Ball was reset to center with the base velocity, up and rightward
        assert_eq!(state.ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.ball.vel, Vec2::new(7.0, -7.0));

        let events = tick(&mut state, &TickInput::default());
        assert!(events.is_empty());
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_game_over_then_restart() {
        let mut state = new_state();
        state.lives = 1;
        state.score = 140;
        state.speed_multiplier = 1.3;
        state.bricks.clear();
        state.ball.pos = Vec2::new(400.0, 620.0);
        state.ball.vel = Vec2::new(0.0, 7.0);

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(events, vec![GameEvent::GameOver]);
        assert_eq!(state.phase, GamePhase::GameOver);

        // Parked: ticks are no-ops until the host acknowledges
        let ticks_before = state.time_ticks;
        assert!(tick(&mut state, &TickInput::default()).is_empty());
        assert_eq!(state.time_ticks, ticks_before);

        state.restart();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 3);
        assert_eq!(state.speed_multiplier, 1.0);
        assert!(!state.bricks.is_empty());
        assert_eq!(state.ball.pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_powerup_falls_and_gets_collected() {
        let mut state = new_state();
        state.bricks.clear();
        state.ball.vel = Vec2::ZERO;
        state.ball.pos = Vec2::new(400.0, 300.0);
        state.powerups.push(PowerUp {
            kind: PowerUpKind::ExtraLife,
            pos: Vec2::new(state.paddle.x + 30.0, state.paddle.y - 25.0),
            vel: Vec2::new(0.0, 2.0),
            size: 20.0,
        });

        let mut collected = Vec::new();
        for _ in 0..10 {
            collected.extend(tick(&mut state, &TickInput::default()));
            if state.powerups.is_empty() {
                break;
            }
        }
        assert!(collected.contains(&GameEvent::PowerUpCollected {
            kind: PowerUpKind::ExtraLife
        }));
        assert_eq!(state.lives, 4);
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_powerup_dropped_off_bottom() {
        let mut state = new_state();
        state.bricks.clear();
        state.ball.vel = Vec2::ZERO;
        state.powerups.push(PowerUp {
            kind: PowerUpKind::SpeedBoost,
            pos: Vec2::new(5.0, 595.0), // outside the paddle span
            vel: Vec2::new(0.0, 2.0),
            size: 20.0,
        });
        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.powerups.is_empty());
        assert_eq!(state.speed_multiplier, 1.0);
    }

    #[test]
    fn test_speed_boost_stacks_and_caps() {
        let mut state = new_state();
        state.bricks.clear();
        state.ball.vel = Vec2::ZERO;
        for _ in 0..8 {
            state.powerups.push(PowerUp {
                kind: PowerUpKind::SpeedBoost,
                pos: Vec2::new(state.paddle.x + 30.0, state.paddle.y),
                vel: Vec2::new(0.0, 2.0),
                size: 20.0,
            });
            tick(&mut state, &TickInput::default());
        }
        assert!(state.speed_multiplier <= state.config.max_speed_multiplier);
        assert!(state.speed_multiplier > 1.0);
    }

    #[test]
    fn test_widen_paddle_reverts_on_schedule() {
        let mut state = new_state();
        state.bricks.clear();
        state.ball.vel = Vec2::ZERO;
        state.powerups.push(PowerUp {
            kind: PowerUpKind::WidenPaddle,
            pos: Vec2::new(state.paddle.x + 30.0, state.paddle.y),
            vel: Vec2::new(0.0, 2.0),
            size: 20.0,
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.paddle.width, 180.0);
        assert_eq!(state.effects.widen_ticks, 300);

        for _ in 0..299 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.paddle.width, 180.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.paddle.width, 120.0);
        assert_eq!(state.effects.widen_ticks, 0);
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = new_state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.is_paused());

        let ticks_before = state.time_ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, ticks_before);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_keyed_and_drag_input_clamped() {
        let mut state = new_state();
        state.bricks.clear();
        state.ball.vel = Vec2::ZERO;

        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &left);
        }
        assert_eq!(state.paddle.x, 0.0);

        let drag = TickInput {
            target_x: Some(10_000.0),
            ..Default::default()
        };
        tick(&mut state, &drag);
        assert_eq!(state.paddle.x, 800.0 - state.paddle.width);
    }

    #[test]
    fn test_non_finite_ball_recovers() {
        let mut state = new_state();
        state.bricks.clear();
        state.ball.pos = Vec2::new(f32::NAN, 300.0);
        state.ball.vel = Vec2::new(7.0, -7.0);
        tick(&mut state, &TickInput::default());
        assert!(state.ball.pos.is_finite());
        assert!(state.ball.vel.is_finite());
        assert_eq!(state.ball.pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_determinism() {
        let mut a = RoundState::new(800.0, 600.0, 99, GameConfig::default()).unwrap();
        let mut b = RoundState::new(800.0, 600.0, 99, GameConfig::default()).unwrap();
        let inputs = [
            TickInput {
                move_right: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                move_left: true,
                ..Default::default()
            },
        ];
        for _ in 0..600 {
            for input in &inputs {
                let ea = tick(&mut a, input);
                let eb = tick(&mut b, input);
                assert_eq!(ea, eb);
            }
        }
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.score, b.score);
        assert_eq!(a.bricks.len(), b.bricks.len());
        assert_eq!(a.lives, b.lives);
    }
}

#[cfg(test)]
mod props {
    use super::*;
    use crate::config::GameConfig;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_paddle_always_inside_field(moves in proptest::collection::vec(any::<bool>(), 1..256)) {
            let mut state = RoundState::new(800.0, 600.0, 3, GameConfig::default()).unwrap();
            for right in moves {
                let input = TickInput {
                    move_left: !right,
                    move_right: right,
                    ..Default::default()
                };
                tick(&mut state, &input);
                prop_assert!(state.paddle.x >= 0.0);
                prop_assert!(state.paddle.x <= state.field_width - state.paddle.width);
            }
        }

        #[test]
        fn prop_drag_target_always_clamped(target in -1e6f32..1e6f32) {
            let mut state = RoundState::new(800.0, 600.0, 3, GameConfig::default()).unwrap();
            let input = TickInput {
                target_x: Some(target),
                ..Default::default()
            };
            tick(&mut state, &input);
            prop_assert!(state.paddle.x >= 0.0);
            prop_assert!(state.paddle.x <= state.field_width - state.paddle.width);
        }

        #[test]
        fn prop_active_bricks_never_at_zero_durability(seed in any::<u64>()) {
            let mut state = RoundState::new(800.0, 600.0, seed, GameConfig::default()).unwrap();
            for _ in 0..600 {
                tick(&mut state, &TickInput::default());
                prop_assert!(state.bricks.iter().all(|b| b.durability >= 1));
            }
        }
    }
}
