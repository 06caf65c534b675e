//! Controller mode: what grid buttons and the clock do to the display.

use crate::codec::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Grid buttons fire the drum module directly; nothing is recorded.
    LiveTrigger,
    /// Grid buttons edit the selected track; the clock drives playback.
    #[default]
    SequencedPlayback,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::LiveTrigger => Mode::SequencedPlayback,
            Mode::SequencedPlayback => Mode::LiveTrigger,
        }
    }

    /// Color of the mode indicator LED.
    pub fn indicator(self) -> Color {
        match self {
            Mode::LiveTrigger => Color::ModeLive,
            Mode::SequencedPlayback => Color::ModeSequenced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_mode() {
        assert_eq!(Mode::default(), Mode::SequencedPlayback);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Mode::SequencedPlayback.toggled(), Mode::LiveTrigger);
        assert_eq!(Mode::LiveTrigger.toggled(), Mode::SequencedPlayback);
    }

    #[test]
    fn test_indicator_differs_per_mode() {
        assert_ne!(
            Mode::LiveTrigger.indicator().byte(),
            Mode::SequencedPlayback.indicator().byte()
        );
    }
}
