//! Host-side command stream assembly

use heapless::Vec;

use crate::command::{Command, EncodeError};

/// Builds a command stream into a fixed-capacity buffer
///
/// ```
/// use uartseq_protocol::SequenceBuilder;
///
/// let mut seq = SequenceBuilder::<64>::new();
/// seq.clear()
///     .and_then(|s| s.send(b"ping"))
///     .and_then(|s| s.receive(4, 500, 50))
///     .unwrap();
/// assert_eq!(seq.as_bytes().len(), 1 + 7 + 7);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SequenceBuilder<const N: usize> {
    buffer: Vec<u8, N>,
}

impl<const N: usize> SequenceBuilder<N> {
    /// Create an empty stream
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Append any command
    pub fn push(&mut self, command: &Command<'_>) -> Result<&mut Self, EncodeError> {
        let start = self.buffer.len();
        let len = command.encoded_len();
        self.buffer
            .resize(start + len, 0)
            .map_err(|_| EncodeError::BufferTooSmall)?;

        if let Err(e) = command.encode(&mut self.buffer[start..]) {
            self.buffer.truncate(start);
            return Err(e);
        }
        Ok(self)
    }

    /// Append a Clear command
    pub fn clear(&mut self) -> Result<&mut Self, EncodeError> {
        self.push(&Command::Clear)
    }

    /// Append a Send command carrying `data`
    pub fn send(&mut self, data: &[u8]) -> Result<&mut Self, EncodeError> {
        self.push(&Command::Send { data })
    }

    /// Append a Receive command
    pub fn receive(
        &mut self,
        size: u16,
        total_timeout_ms: u16,
        char_timeout_ms: u16,
    ) -> Result<&mut Self, EncodeError> {
        self.push(&Command::Receive {
            size,
            total_timeout_ms,
            char_timeout_ms,
        })
    }

    /// Append a SetBaudRate command
    pub fn baud_rate(&mut self, baud_rate: u32) -> Result<&mut Self, EncodeError> {
        self.push(&Command::SetBaudRate { baud_rate })
    }

    /// Append a Delay command
    pub fn delay(&mut self, delay_ms: u32) -> Result<&mut Self, EncodeError> {
        self.push(&Command::Delay { delay_ms })
    }

    /// The encoded stream
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Discard everything appended so far
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}
