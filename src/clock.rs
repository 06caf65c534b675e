//! Clock division and the playback cursor.
//!
//! This module handles:
//! - Counting incoming clock pulses and deciding which ones start a step
//! - Tracking the current and previous step of the playback cursor
//! - Remembering whether any step has been played since startup
//!
//! # Real-time use
//! [`Transport`] is plain data owned by the engine and only touched from the
//! period loop, so nothing here is atomic or locked.

use crate::grid::STEPS;
use crate::midi::CLOCKS_PER_BEAT;

/// Clock pulses per sequencer step: sixteenth notes against 24 ppqn.
pub const PULSES_PER_STEP: u64 = CLOCKS_PER_BEAT / 4;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transport {
    pulse_count: u64,
    current: usize,
    previous: usize,
    played: bool,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one clock pulse. Returns true when this pulse starts a step.
    ///
    /// Only the residue of the counter matters, so it wraps instead of
    /// overflowing.
    pub fn tick(&mut self) -> bool {
        let due = self.pulse_count % PULSES_PER_STEP == 0;
        self.pulse_count = self.pulse_count.wrapping_add(1);
        due
    }

    /// Move the cursor back to step 0 for start/continue. The pulse counter
    /// keeps its residue.
    pub fn restart(&mut self) {
        self.current = 0;
    }

    /// Record the current step as previous and move to the next one.
    pub fn advance(&mut self) {
        self.previous = self.current;
        self.current = (self.current + 1) % STEPS;
        self.played = true;
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn previous_step(&self) -> usize {
        self.previous
    }

    /// True until the first step has been played since startup.
    pub fn is_first_play(&self) -> bool {
        !self.played
    }

    pub fn pulse_count(&self) -> u64 {
        self.pulse_count
    }
}
