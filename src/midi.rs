//! MIDI protocol constants and the fixed-size message records exchanged
//! between the input callbacks, the engine and the output ports.
//!
//! Real-time clock bytes follow the MIDI 1.0 specification. Everything else
//! here describes the controller surface and the drum module.

/// MIDI Clock tick - sent 24 times per quarter note (24 ppqn)
pub const MIDI_CLOCK: u8 = 0xF8;

/// MIDI Start - resets the step cursor and plays immediately
pub const MIDI_START: u8 = 0xFA;

/// MIDI Continue - handled exactly like Start
pub const MIDI_CONTINUE: u8 = 0xFB;

/// MIDI Stop - playback position is preserved, nothing is emitted
pub const MIDI_STOP: u8 = 0xFC;

/// Number of MIDI clock pulses per quarter note (beat)
pub const CLOCKS_PER_BEAT: u64 = 24;

/// Note on, channel 1. Grid LED writes and drum triggers use this status.
pub const NOTE_ON: u8 = 0x90;

/// Note off, channel 1. Used for the first-play grid clear burst.
pub const NOTE_OFF: u8 = 0x80;

/// Control change, channel 1. Scene buttons, track LEDs and the mode LED.
pub const CONTROL_CHANGE: u8 = 0xB0;

/// Every outbound message is three bytes: status, address/note, value.
pub type OutMessage = [u8; 3];

/// Longest inbound message the engine ever looks at.
pub const RAW_MESSAGE_BYTES: usize = 3;

/// Inbound message copied out of a MIDI input callback.
///
/// Fixed size so it can travel through a bounded channel without touching
/// the heap. Only the first three bytes are kept; `len` remembers how many
/// bytes the inbound message carried (saturating at 255).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawMessage {
    bytes: [u8; RAW_MESSAGE_BYTES],
    len: u8,
}

impl RawMessage {
    pub fn from_slice(message: &[u8]) -> Self {
        let mut bytes = [0; RAW_MESSAGE_BYTES];
        let kept = message.len().min(RAW_MESSAGE_BYTES);
        bytes[..kept].copy_from_slice(&message[..kept]);
        Self {
            bytes,
            len: message.len().min(u8::MAX as usize) as u8,
        }
    }

    /// Number of bytes in the inbound message.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The retained bytes (at most three).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len().min(RAW_MESSAGE_BYTES)]
    }
}

/// Render a message as space-separated hex, e.g. `90 03 30`.
pub fn hex(message: &[u8]) -> String {
    message
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
