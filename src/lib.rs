//! Grid step sequencer driven by external MIDI clock.
//!
//! A grid controller edits six 64-step trigger patterns; an incoming MIDI
//! beat clock plays them out to a six-channel drum module while the
//! controller's LEDs track the playhead.

pub mod clock;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod grid;
pub mod midi;
pub mod mode;
pub mod output;
pub mod ports;
pub mod router;
pub mod runtime;
