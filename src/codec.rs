//! Grid/LED codec for the controller surface.
//!
//! The controller addresses its 8x8 grid row-major, with every row occupying
//! a 16-wide band of note numbers: row 0 is 0x00-0x07, row 1 is 0x10-0x17
//! and so on. Column 8 of each band (bit 3 set) holds the "letter" buttons on
//! the right edge. LED colors are a single byte, `16 * green + red`, with
//! each level conventionally 0-3.
//!
//! All functions here are total and stateless.

use crate::grid::STEPS;

/// Width of one grid row in steps.
pub const ROW_WIDTH: usize = 8;

/// Address span reserved for one grid row.
pub const ROW_BAND: usize = 16;

/// Bits of an address that select the row band.
pub const ROW_MASK: u8 = 0xF0;

/// Address bit that marks a letter button rather than a grid button.
pub const LETTER_BUTTON_MASK: u8 = 0x08;

/// Control number of the first track LED; tracks use six consecutive controls.
pub const TRACK_LED_BASE: u8 = 104;

/// Control number of the mode indicator LED (also the mode toggle button).
pub const MODE_LED: u8 = 110;

/// Scene button (`control % 8`) that toggles the mode.
pub const SCENE_MODE_TOGGLE: u8 = 6;

/// Scene button (`control % 8`) with no function assigned.
pub const SCENE_RESERVED: u8 = 7;

/// Control number that resets the controller when sent with value 0.
pub const CONTROLLER_RESET: u8 = 0;

/// Note number every drum-module trigger is sent on.
pub const DRUM_NOTE: u8 = 60;

/// Velocity of triggers fired by sequenced playback.
pub const SEQUENCED_VELOCITY: u8 = 127;

/// Live-trigger velocity bias: the top grid row plays at `bias + floor`.
pub const LIVE_VELOCITY_BIAS: u8 = 0x70;

/// Velocity of the bottom grid row in live-trigger mode.
pub const LIVE_VELOCITY_FLOOR: u8 = 15;

/// Encode a linear step (0-63) as a controller grid address.
pub const fn step_to_address(step: usize) -> u8 {
    (ROW_BAND * (step / ROW_WIDTH) + step % ROW_WIDTH) as u8
}

/// Decode a controller grid address into a linear step.
pub const fn address_to_step(address: u8) -> usize {
    (address as usize % ROW_WIDTH) + (address & ROW_MASK) as usize / 2
}

/// Encode green/red levels into the controller's color byte.
///
/// Levels outside 0-3 are passed through unchecked; the device decides what
/// they look like.
pub const fn encode_color(green: u8, red: u8) -> u8 {
    green.wrapping_mul(16).wrapping_add(red)
}

/// Whether an address belongs to the letter column rather than the grid.
pub const fn is_letter_address(address: u8) -> bool {
    address & LETTER_BUTTON_MASK != 0
}

/// Velocity for a live trigger, derived from the row bits of the address.
pub const fn live_velocity(address: u8) -> u8 {
    LIVE_VELOCITY_BIAS
        .wrapping_sub(address & ROW_MASK)
        .wrapping_add(LIVE_VELOCITY_FLOOR)
}

/// What an LED should show, independent of the byte the device wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Off,
    /// A step that is toggled on in the selected track.
    Pattern,
    /// The step currently playing.
    Playhead,
    /// A grid button held in live-trigger mode.
    Live,
    /// The track LED of the selected track.
    TrackSelected,
    /// Mode indicator while in live-trigger mode.
    ModeLive,
    /// Mode indicator while in sequenced-playback mode.
    ModeSequenced,
}

impl Color {
    pub const fn byte(self) -> u8 {
        match self {
            Color::Off => encode_color(0, 0),
            Color::Pattern | Color::Live | Color::TrackSelected | Color::ModeLive => {
                encode_color(3, 0)
            }
            Color::Playhead => encode_color(1, 1),
            Color::ModeSequenced => encode_color(3, 3),
        }
    }

    /// Color of a grid cell that is not under the playhead.
    pub const fn for_cell(on: bool) -> Self {
        if on {
            Color::Pattern
        } else {
            Color::Off
        }
    }
}

/// Every step's grid address, in step order.
pub fn grid_addresses() -> impl Iterator<Item = u8> {
    (0..STEPS).map(step_to_address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_to_address_layout() {
        assert_eq!(step_to_address(0), 0x00);
        assert_eq!(step_to_address(7), 0x07);
        assert_eq!(step_to_address(8), 0x10);
        assert_eq!(step_to_address(21), 0x25);
        assert_eq!(step_to_address(63), 0x77);
    }

    #[test]
    fn test_address_round_trip_all_steps() {
        for step in 0..STEPS {
            assert_eq!(address_to_step(step_to_address(step)), step, "step {}", step);
        }
    }

    #[test]
    fn test_grid_addresses_never_hit_letter_column() {
        assert_eq!(grid_addresses().count(), STEPS);
        assert!(grid_addresses().all(|a| !is_letter_address(a)));
        assert!(is_letter_address(0x08));
        assert!(is_letter_address(0x78));
    }

    #[test]
    fn test_encode_color() {
        assert_eq!(encode_color(0, 0), 0x00);
        assert_eq!(encode_color(3, 0), 0x30);
        assert_eq!(encode_color(1, 1), 0x11);
        assert_eq!(encode_color(3, 3), 0x33);
        // Out-of-range levels are not clamped
        assert_eq!(encode_color(4, 5), 0x45);
    }

    #[test]
    fn test_color_intents() {
        assert_eq!(Color::Off.byte(), 0);
        assert_eq!(Color::Pattern.byte(), 0x30);
        assert_eq!(Color::Playhead.byte(), 0x11);
        assert_eq!(Color::ModeSequenced.byte(), 0x33);
        assert_eq!(Color::for_cell(true), Color::Pattern);
        assert_eq!(Color::for_cell(false), Color::Off);
    }

    #[test]
    fn test_live_velocity_by_row() {
        assert_eq!(live_velocity(0x00), 127);
        assert_eq!(live_velocity(0x13), 111);
        assert_eq!(live_velocity(0x77), 15);
    }

    #[test]
    fn test_scene_controls() {
        assert_eq!(MODE_LED % 8, SCENE_MODE_TOGGLE);
        assert_eq!(TRACK_LED_BASE % 8, 0);
    }
}
