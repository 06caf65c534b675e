//! Errors raised while handling one period.

use std::fmt;

/// Inbound stream a message arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Controller,
    Clock,
    Drum,
}

/// Outbound port a message is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    Controller,
    Drum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Message shorter than its handler needs. Only that message is dropped.
    Malformed {
        input: Input,
        len: usize,
        required: usize,
    },
    /// Output buffer for this period is full. The period fails.
    PortFull { port: Port, capacity: usize },
}

impl EngineError {
    /// Whether the rest of the period can still be processed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::Malformed { .. })
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Controller => write!(f, "controller"),
            Input::Clock => write!(f, "clock"),
            Input::Drum => write!(f, "drum module"),
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Controller => write!(f, "controller"),
            Port::Drum => write!(f, "drum module"),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Malformed {
                input,
                len,
                required,
            } => write!(
                f,
                "{} message too short: expected at least {} bytes, got {}",
                input, required, len
            ),
            EngineError::PortFull { port, capacity } => {
                write!(f, "{} output full ({} messages)", port, capacity)
            }
        }
    }
}

impl std::error::Error for EngineError {}
