//! Per-period outbound message buffers.
//!
//! Each buffer is allocated once with a fixed capacity and cleared at the
//! start of every period, so writing never touches the heap. A write past
//! capacity fails instead of growing.

use crate::error::{EngineError, Port};
use crate::midi::OutMessage;

#[derive(Debug, Clone)]
pub struct PortBuffer {
    port: Port,
    messages: Vec<OutMessage>,
    capacity: usize,
}

impl PortBuffer {
    pub fn new(port: Port, capacity: usize) -> Self {
        Self {
            port,
            messages: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn write(&mut self, message: OutMessage) -> Result<(), EngineError> {
        if self.messages.len() >= self.capacity {
            return Err(EngineError::PortFull {
                port: self.port,
                capacity: self.capacity,
            });
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[OutMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn port(&self) -> Port {
        self.port
    }
}

/// The two destinations the engine writes to during a period.
#[derive(Debug, Clone)]
pub struct Outputs {
    pub controller: PortBuffer,
    pub drum: PortBuffer,
}

impl Outputs {
    pub fn new(capacity: usize) -> Self {
        Self {
            controller: PortBuffer::new(Port::Controller, capacity),
            drum: PortBuffer::new(Port::Drum, capacity),
        }
    }

    pub fn clear(&mut self) {
        self.controller.clear();
        self.drum.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_until_full() {
        let mut buffer = PortBuffer::new(Port::Drum, 2);
        buffer.write([0x90, 60, 127]).unwrap();
        buffer.write([0x91, 60, 127]).unwrap();
        assert_eq!(
            buffer.write([0x92, 60, 127]),
            Err(EngineError::PortFull {
                port: Port::Drum,
                capacity: 2
            })
        );
        assert_eq!(buffer.messages(), &[[0x90, 60, 127], [0x91, 60, 127]]);
    }

    #[test]
    fn test_clear_resets_length() {
        let mut outputs = Outputs::new(4);
        outputs.controller.write([0xB0, 0, 0]).unwrap();
        outputs.drum.write([0x90, 60, 127]).unwrap();
        outputs.clear();
        assert!(outputs.controller.is_empty());
        assert!(outputs.drum.is_empty());
        assert_eq!(outputs.controller.port(), Port::Controller);
    }
}
