//! Fixed-timestep tick driver
//!
//! The host calls [`FixedStepDriver::step_frame`] once per display frame with
//! the elapsed wall time; the driver converts that into zero or more fixed
//! simulation ticks. Input writes are buffered with last-known-value
//! semantics and consumed at tick start, never mid-tick. Stopping the game is
//! the host's job: simply stop calling `step_frame`.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{GameEvent, RoundState, TickInput, tick};

/// Accumulator-based fixed-step driver with buffered input
#[derive(Debug, Clone, Default)]
pub struct FixedStepDriver {
    accumulator: f32,
    input: TickInput,
}

impl FixedStepDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffered input snapshot (last write before a frame wins)
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Advance the simulation by one frame's worth of wall time.
    ///
    /// Runs up to [`MAX_SUBSTEPS`] fixed ticks to catch up after a long
    /// frame, and returns every event those ticks emitted, in order.
    pub fn step_frame(&mut self, state: &mut RoundState, frame_dt: f32) -> Vec<GameEvent> {
        // Clamp pathological frame gaps (tab hidden) to avoid a catch-up burst
        self.accumulator += frame_dt.min(0.1);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(tick(state, &self.input));
            self.accumulator -= SIM_DT;
            substeps += 1;
            // One-shot inputs fire on the first substep only
            self.input.pause = false;
        }
        events
    }
}
