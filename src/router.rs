//! Classification of inbound controller and clock messages.
//!
//! Each raw message is decoded into exactly one event category; the engine
//! then matches on the category. Nothing in here touches engine state.

use midly::live::{LiveEvent, SystemRealtime};
use midly::MidiMessage;

use crate::codec::{is_letter_address, SCENE_MODE_TOGGLE, SCENE_RESERVED};
use crate::error::{EngineError, Input};
use crate::grid::TRACKS;
use crate::midi::NOTE_ON;

/// Bytes a controller message must carry: status plus two data bytes.
pub const CONTROLLER_MESSAGE_LEN: usize = 3;

/// A grid button going down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPress {
    /// Raw status byte, forwarded as-is in live-trigger mode.
    pub status: u8,
    pub address: u8,
    pub intensity: u8,
}

impl GridPress {
    /// Note-off, or note-on with zero intensity, is a release.
    pub fn is_down(&self) -> bool {
        self.status & 0xF0 == NOTE_ON && self.intensity != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Scene button that flips the mode.
    ModeToggle { pressed: bool },
    /// Scene button with no function assigned.
    SceneReserved,
    /// Scene button selecting a track.
    TrackSelect { track: usize },
    /// Right-hand letter column. No function assigned.
    Letter { address: u8 },
    Grid(GridPress),
    /// Any other message type from the controller.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    Tick,
    Start,
    Continue,
    Stop,
    /// Anything else on the clock input; inert.
    Other(u8),
}

/// Classify one controller message.
///
/// Scene controls win over the letter bit, and the letter bit wins over the
/// grid.
pub fn classify_controller(raw: &[u8]) -> Result<ControllerEvent, EngineError> {
    if raw.len() < CONTROLLER_MESSAGE_LEN {
        return Err(EngineError::Malformed {
            input: Input::Controller,
            len: raw.len(),
            required: CONTROLLER_MESSAGE_LEN,
        });
    }
    let raw = &raw[..CONTROLLER_MESSAGE_LEN];
    let status = raw[0];

    let event = match LiveEvent::parse(raw) {
        Ok(LiveEvent::Midi { message, .. }) => match message {
            MidiMessage::Controller { controller, value } => {
                scene_event(controller.as_int(), value.as_int())
            }
            MidiMessage::NoteOn { key, vel } | MidiMessage::NoteOff { key, vel } => {
                let address = key.as_int();
                if is_letter_address(address) {
                    ControllerEvent::Letter { address }
                } else {
                    ControllerEvent::Grid(GridPress {
                        status,
                        address,
                        intensity: vel.as_int(),
                    })
                }
            }
            _ => ControllerEvent::Ignored,
        },
        _ => ControllerEvent::Ignored,
    };
    Ok(event)
}

fn scene_event(control: u8, value: u8) -> ControllerEvent {
    match control % 8 {
        SCENE_MODE_TOGGLE => ControllerEvent::ModeToggle { pressed: value != 0 },
        SCENE_RESERVED => ControllerEvent::SceneReserved,
        track => {
            debug_assert!((track as usize) < TRACKS);
            ControllerEvent::TrackSelect {
                track: track as usize,
            }
        }
    }
}

/// Classify one clock message. Only an empty message is an error.
pub fn classify_clock(raw: &[u8]) -> Result<ClockEvent, EngineError> {
    let Some(&first) = raw.first() else {
        return Err(EngineError::Malformed {
            input: Input::Clock,
            len: 0,
            required: 1,
        });
    };
    let event = match LiveEvent::parse(raw) {
        Ok(LiveEvent::Realtime(SystemRealtime::TimingClock)) => ClockEvent::Tick,
        Ok(LiveEvent::Realtime(SystemRealtime::Start)) => ClockEvent::Start,
        Ok(LiveEvent::Realtime(SystemRealtime::Continue)) => ClockEvent::Continue,
        Ok(LiveEvent::Realtime(SystemRealtime::Stop)) => ClockEvent::Stop,
        _ => ClockEvent::Other(first),
    };
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::{MIDI_CLOCK, MIDI_CONTINUE, MIDI_START, MIDI_STOP};

    #[test]
    fn test_short_controller_message_is_malformed() {
        assert_eq!(
            classify_controller(&[0x90, 0x03]),
            Err(EngineError::Malformed {
                input: Input::Controller,
                len: 2,
                required: 3
            })
        );
        assert!(classify_controller(&[]).is_err());
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(
            classify_controller(&[0xB0, 110, 127]),
            Ok(ControllerEvent::ModeToggle { pressed: true })
        );
        assert_eq!(
            classify_controller(&[0xB0, 110, 0]),
            Ok(ControllerEvent::ModeToggle { pressed: false })
        );
    }

    #[test]
    fn test_scene_reserved() {
        assert_eq!(
            classify_controller(&[0xB0, 111, 127]),
            Ok(ControllerEvent::SceneReserved)
        );
    }

    #[test]
    fn test_track_select() {
        for track in 0..TRACKS {
            assert_eq!(
                classify_controller(&[0xB0, 104 + track as u8, 127]),
                Ok(ControllerEvent::TrackSelect { track })
            );
        }
    }

    #[test]
    fn test_scene_wins_over_letter_bit() {
        // 104 has bit 3 set, but control changes are always scene buttons
        assert_eq!(104 & 0x08, 0x08);
        assert_eq!(
            classify_controller(&[0xB0, 104, 0]),
            Ok(ControllerEvent::TrackSelect { track: 0 })
        );
    }

    #[test]
    fn test_letter_button() {
        assert_eq!(
            classify_controller(&[0x90, 0x08, 127]),
            Ok(ControllerEvent::Letter { address: 0x08 })
        );
        assert_eq!(
            classify_controller(&[0x80, 0x78, 0]),
            Ok(ControllerEvent::Letter { address: 0x78 })
        );
    }

    #[test]
    fn test_grid_button() {
        let event = classify_controller(&[0x90, 0x25, 127]).unwrap();
        let ControllerEvent::Grid(press) = event else {
            panic!("expected grid press, got {:?}", event);
        };
        assert_eq!(press.status, 0x90);
        assert_eq!(press.address, 0x25);
        assert_eq!(press.intensity, 127);
        assert!(press.is_down());
    }

    #[test]
    fn test_grid_release_forms() {
        for raw in [[0x80u8, 0x25, 0], [0x80, 0x25, 64], [0x90, 0x25, 0]] {
            match classify_controller(&raw) {
                Ok(ControllerEvent::Grid(press)) => assert!(!press.is_down(), "{:?}", raw),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_extra_bytes_are_ignored() {
        assert_eq!(
            classify_controller(&[0xB0, 110, 127, 0x00]),
            Ok(ControllerEvent::ModeToggle { pressed: true })
        );
    }

    #[test]
    fn test_other_controller_messages_ignored() {
        assert_eq!(
            classify_controller(&[0xA0, 0x25, 10]),
            Ok(ControllerEvent::Ignored)
        );
        assert_eq!(
            classify_controller(&[0xE0, 0x00, 0x40]),
            Ok(ControllerEvent::Ignored)
        );
    }

    #[test]
    fn test_clock_bytes() {
        assert_eq!(classify_clock(&[MIDI_CLOCK]), Ok(ClockEvent::Tick));
        assert_eq!(classify_clock(&[MIDI_START]), Ok(ClockEvent::Start));
        assert_eq!(classify_clock(&[MIDI_CONTINUE]), Ok(ClockEvent::Continue));
        assert_eq!(classify_clock(&[MIDI_STOP]), Ok(ClockEvent::Stop));
    }

    #[test]
    fn test_unknown_clock_bytes_are_inert() {
        assert_eq!(classify_clock(&[0xFE]), Ok(ClockEvent::Other(0xFE)));
        assert_eq!(classify_clock(&[0x90, 60, 100]), Ok(ClockEvent::Other(0x90)));
    }

    #[test]
    fn test_empty_clock_message_is_malformed() {
        assert!(matches!(
            classify_clock(&[]),
            Err(EngineError::Malformed {
                input: Input::Clock,
                ..
            })
        ));
    }
}
