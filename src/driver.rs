//! Fixed-step driving and paddle input
//!
//! The watch fires a timer roughly every 10 ms; frames can arrive late or in
//! bursts, so elapsed time goes through an accumulator and is turned into
//! whole simulation ticks. Paddle input may be written from anywhere and only
//! the latest value matters.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::clamp_unit;
use crate::settings::Settings;
use crate::sim::Simulation;

/// Longest frame we account for; anything beyond is dropped
const MAX_FRAME_SECONDS: f32 = 0.1;

/// Map a digital crown reading to a paddle target.
///
/// The crown runs opposite to screen y, so turning it "up" moves the paddle up.
#[inline]
pub fn crown_to_target(crown: f32) -> f32 {
    1.0 - clamp_unit(crown)
}

/// Latest paddle target, shared between the input source and the tick loop.
///
/// Writes overwrite any value not yet consumed.
#[derive(Debug)]
pub struct InputSlot {
    bits: AtomicU32,
}

impl InputSlot {
    /// Bit pattern meaning "nothing pending" (a NaN, never a valid target)
    const EMPTY: u32 = u32::MAX;

    pub fn new() -> Self {
        Self {
            bits: AtomicU32::new(Self::EMPTY),
        }
    }

    /// Publish a new target; NaN is ignored
    pub fn set(&self, target: f32) {
        if target.is_nan() {
            return;
        }
        self.bits.store(target.to_bits(), Ordering::Release);
    }

    /// Take the pending target, if any
    pub fn take(&self) -> Option<f32> {
        match self.bits.swap(Self::EMPTY, Ordering::AcqRel) {
            Self::EMPTY => None,
            bits => Some(f32::from_bits(bits)),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.bits.load(Ordering::Acquire) != Self::EMPTY
    }
}

impl Default for InputSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns elapsed wall time into a number of fixed ticks
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    tick_seconds: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedStepClock {
    pub fn new(tick_seconds: f32, max_substeps: u32) -> Self {
        Self {
            tick_seconds,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    pub fn tick_seconds(&self) -> f32 {
        self.tick_seconds
    }

    /// Unspent time carried into the next frame
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Account for `frame_dt` seconds and return how many ticks to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_SECONDS);

        let mut substeps = 0;
        while self.accumulator >= self.tick_seconds && substeps < self.max_substeps {
            self.accumulator -= self.tick_seconds;
            substeps += 1;
        }

        if substeps == self.max_substeps && self.accumulator >= self.tick_seconds {
            log::debug!(
                "Dropping {:.3}s of simulation time after {} substeps",
                self.accumulator,
                substeps
            );
            self.accumulator = 0.0;
        }

        substeps
    }
}

/// Owns one simulation and feeds it ticks and input, strictly in sequence
pub struct Driver<S: Simulation> {
    sim: S,
    clock: FixedStepClock,
    input: Arc<InputSlot>,
}

impl<S: Simulation> Driver<S> {
    pub fn new(sim: S, settings: &Settings) -> Self {
        Self {
            sim,
            clock: FixedStepClock::new(settings.tick_seconds, settings.max_substeps),
            input: Arc::new(InputSlot::new()),
        }
    }

    /// Handle for whatever produces paddle input
    pub fn input(&self) -> Arc<InputSlot> {
        Arc::clone(&self.input)
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    pub fn into_sim(self) -> S {
        self.sim
    }

    /// Run exactly one tick, applying any pending input first
    pub fn step(&mut self) -> Vec<S::Event> {
        if let Some(target) = self.input.take() {
            self.sim.set_target(target);
        }
        self.sim.tick()
    }

    /// Run as many ticks as `frame_dt` seconds pay for
    pub fn advance(&mut self, frame_dt: f32) -> Vec<S::Event> {
        let steps = self.clock.advance(frame_dt);
        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend(self.step());
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BreakoutConfig, BreakoutSimulation, PongConfig, PongSimulation};

    #[test]
    fn test_crown_mapping_is_inverted() {
        assert_eq!(crown_to_target(0.0), 1.0);
        assert_eq!(crown_to_target(1.0), 0.0);
        assert!((crown_to_target(0.25) - 0.75).abs() < 1e-6);
        assert_eq!(crown_to_target(3.0), 0.0);
    }

    #[test]
    fn test_input_slot_last_write_wins() {
        let slot = InputSlot::new();
        assert_eq!(slot.take(), None);

        slot.set(0.2);
        slot.set(0.8);
        assert!(slot.is_pending());
        assert_eq!(slot.take(), Some(0.8));
        assert_eq!(slot.take(), None);

        slot.set(f32::NAN);
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_input_slot_across_threads() {
        let slot = Arc::new(InputSlot::new());
        let writer = {
            let slot = Arc::clone(&slot);
            std::thread::spawn(move || {
                for i in 0..=100 {
                    slot.set(i as f32 / 100.0);
                }
            })
        };
        writer.join().unwrap();
        assert_eq!(slot.take(), Some(1.0));
    }

    #[test]
    fn test_clock_accumulates_partial_frames() {
        let mut clock = FixedStepClock::new(0.01, 8);
        assert_eq!(clock.advance(0.025), 2);
        assert!((clock.pending() - 0.005).abs() < 1e-4);
        assert_eq!(clock.advance(0.012), 1);
        assert!((clock.pending() - 0.007).abs() < 1e-4);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_clock_caps_substeps_and_drops_backlog() {
        let mut clock = FixedStepClock::new(0.01, 8);
        assert_eq!(clock.advance(5.0), 8);
        assert_eq!(clock.pending(), 0.0);
        assert_eq!(clock.advance(-1.0), 0);
    }

    #[test]
    fn test_driver_applies_input_before_tick() {
        let sim = BreakoutSimulation::new(BreakoutConfig::default(), 9).unwrap();
        let mut driver = Driver::new(sim, &Settings::default());
        driver.input().set(0.3);
        driver.step();
        assert_eq!(driver.sim().paddle_x(), 0.3);
        assert_eq!(driver.sim().time_ticks(), 1);
    }

    #[test]
    fn test_crown_reading_moves_paddle() {
        let sim = BreakoutSimulation::new(BreakoutConfig::default(), 9).unwrap();
        let mut driver = Driver::new(sim, &Settings::default());
        driver.input().set(crown_to_target(0.75));
        driver.step();
        assert_eq!(driver.sim().paddle_x(), 0.25);
    }

    #[test]
    fn test_driver_advance_runs_ticks() {
        let sim = PongSimulation::new(PongConfig::default(), 9).unwrap();
        let mut driver = Driver::new(sim, &Settings::default());
        driver.advance(0.035);
        assert_eq!(driver.sim().time_ticks(), 3);
        let sim = driver.into_sim();
        assert_eq!(sim.state().time_ticks, 3);
    }
}
