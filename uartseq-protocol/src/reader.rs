//! Bounds-checked cursor over a command stream

use crate::command::{Command, DecodeError, Opcode};

/// Read cursor over a borrowed command stream
///
/// The cursor never moves past the end of the stream; every read checks
/// `position + n <= len` first.
#[derive(Debug, Clone)]
pub struct CommandReader<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> CommandReader<'a> {
    /// Create a reader positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            failed: false,
        }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// All bytes consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Look at the next `n` bytes without consuming them
    pub fn peek(&self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        self.data.get(self.pos..end)
    }

    /// Consume the next `n` bytes
    pub fn read_bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        let bytes = self.peek(n)?;
        self.pos += n;
        Some(bytes)
    }

    /// Skip `n` bytes that a previous [`peek`](Self::peek) proved present
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.remaining());
        self.pos = (self.pos + n).min(self.data.len());
    }

    /// Decode the next command, `None` at the end of the stream
    ///
    /// On success the cursor moves past opcode, header and payload. On
    /// failure only the opcode byte is consumed.
    pub fn next_command(&mut self) -> Option<Result<Command<'a>, DecodeError>> {
        let opcode_byte = self.read_bytes(1)?[0];
        Some(Opcode::try_from(opcode_byte).and_then(|opcode| Command::decode_body(opcode, self)))
    }
}

/// Decoded commands in stream order
///
/// Yields at most one error, after which iteration stops.
impl<'a> Iterator for CommandReader<'a> {
    type Item = Result<Command<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.next_command()?;
        self.failed = result.is_err();
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bytes_checks_bounds() {
        let data = [1, 2, 3];
        let mut reader = CommandReader::new(&data);

        assert_eq!(reader.read_bytes(2), Some(&[1u8, 2][..]));
        assert_eq!(reader.read_bytes(2), None);
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.read_bytes(1), Some(&[3u8][..]));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_peek_overflowing_length() {
        let data = [0u8; 4];
        let mut reader = CommandReader::new(&data);
        reader.read_bytes(1);
        assert_eq!(reader.peek(usize::MAX), None);
    }

    #[test]
    fn test_iterate_mixed_stream() {
        let stream = [
            0x00, // Clear
            0x04, 0x0a, 0x00, 0x00, 0x00, // Delay 10
            0x02, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, // Receive 1
        ];
        let mut commands = CommandReader::new(&stream);

        assert_eq!(commands.next(), Some(Ok(Command::Clear)));
        assert_eq!(commands.next(), Some(Ok(Command::Delay { delay_ms: 10 })));
        assert_eq!(
            commands.next(),
            Some(Ok(Command::Receive {
                size: 1,
                total_timeout_ms: 0,
                char_timeout_ms: 0,
            }))
        );
        assert_eq!(commands.next(), None);
    }

    #[test]
    fn test_iteration_stops_after_error() {
        let stream = [0x00, 0x7f, 0x00];
        let mut commands = CommandReader::new(&stream);

        assert_eq!(commands.next(), Some(Ok(Command::Clear)));
        assert_eq!(commands.next(), Some(Err(DecodeError::InvalidOpcode(0x7f))));
        assert_eq!(commands.next(), None);
        // The opcode byte was consumed, the trailing Clear was not decoded
        assert_eq!(commands.position(), 2);
    }

    #[test]
    fn test_truncated_baud_rate() {
        let stream = [0x03, 0x00, 0xc2];
        let mut reader = CommandReader::new(&stream);

        assert_eq!(
            reader.next_command(),
            Some(Err(DecodeError::Truncated {
                opcode: Opcode::SetBaudRate,
                needed: 4,
                remaining: 2,
            }))
        );
        assert_eq!(reader.position(), 1);
    }
}
