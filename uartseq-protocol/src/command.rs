//! Command encoding and decoding
//!
//! Command layout:
//! - OPCODE (1 byte): command identifier
//! - HEADER (0-6 bytes): fixed little-endian fields per opcode
//! - PAYLOAD (Send only): `data_size` raw bytes

use core::fmt;

use crate::reader::CommandReader;

/// Header size of a Send command (`data_size`)
pub const SEND_HEADER_SIZE: usize = 2;

/// Header size of a Receive command (`data_size`, `total_timeout_ms`, `char_timeout_ms`)
pub const RECEIVE_HEADER_SIZE: usize = 6;

/// Header size of a SetBaudRate command (`baud_rate`)
pub const BAUD_RATE_HEADER_SIZE: usize = 4;

/// Header size of a Delay command (`delay_ms`)
pub const DELAY_HEADER_SIZE: usize = 4;

/// Command identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// Discard everything in the receive FIFO
    Clear = 0,
    /// Transmit the payload
    Send = 1,
    /// Receive into the output buffer with timeouts
    Receive = 2,
    /// Reprogram the baud rate
    SetBaudRate = 3,
    /// Wait a fixed time
    Delay = 4,
}

impl Opcode {
    /// Parse an opcode from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Opcode::Clear),
            1 => Some(Opcode::Send),
            2 => Some(Opcode::Receive),
            3 => Some(Opcode::SetBaudRate),
            4 => Some(Opcode::Delay),
            _ => None,
        }
    }

    /// Wire byte for this opcode
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Size of the fixed header that follows the opcode byte
    pub fn header_size(self) -> usize {
        match self {
            Opcode::Clear => 0,
            Opcode::Send => SEND_HEADER_SIZE,
            Opcode::Receive => RECEIVE_HEADER_SIZE,
            Opcode::SetBaudRate => BAUD_RATE_HEADER_SIZE,
            Opcode::Delay => DELAY_HEADER_SIZE,
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Opcode::from_byte(byte).ok_or(DecodeError::InvalidOpcode(byte))
    }
}

/// Errors while decoding a command stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Opcode byte outside the known set
    InvalidOpcode(u8),
    /// Not enough bytes left for the header or declared payload
    Truncated {
        opcode: Opcode,
        needed: usize,
        remaining: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DecodeError::InvalidOpcode(byte) => write!(f, "invalid command: {:#04x}", byte),
            DecodeError::Truncated {
                opcode,
                needed,
                remaining,
            } => write!(
                f,
                "not enough data for the {:?} command left ({} needed, {} remaining)",
                opcode, needed, remaining
            ),
        }
    }
}

/// Errors while encoding a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Send payload longer than a u16 length field can describe
    PayloadTooLarge,
    /// Buffer too small for the encoded command
    BufferTooSmall,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::PayloadTooLarge => write!(f, "send payload exceeds 65535 bytes"),
            EncodeError::BufferTooSmall => write!(f, "buffer too small for command"),
        }
    }
}

/// A decoded command, borrowing its Send payload from the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    Clear,
    Send {
        data: &'a [u8],
    },
    Receive {
        size: u16,
        /// 0 disables the total timeout
        total_timeout_ms: u16,
        /// 0 disables the per-character timeout
        char_timeout_ms: u16,
    },
    SetBaudRate {
        baud_rate: u32,
    },
    Delay {
        delay_ms: u32,
    },
}

impl<'a> Command<'a> {
    /// Opcode of this command
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::Clear => Opcode::Clear,
            Command::Send { .. } => Opcode::Send,
            Command::Receive { .. } => Opcode::Receive,
            Command::SetBaudRate { .. } => Opcode::SetBaudRate,
            Command::Delay { .. } => Opcode::Delay,
        }
    }

    /// Bytes the command occupies on the wire, opcode included
    pub fn encoded_len(&self) -> usize {
        let payload = match self {
            Command::Send { data } => data.len(),
            _ => 0,
        };
        1 + self.opcode().header_size() + payload
    }

    /// Decode the header (and payload) following an already consumed opcode
    ///
    /// The reader only advances when the whole command fits.
    pub fn decode_body(opcode: Opcode, reader: &mut CommandReader<'a>) -> Result<Self, DecodeError> {
        let remaining = reader.remaining();
        let truncated = |needed: usize| DecodeError::Truncated {
            opcode,
            needed,
            remaining,
        };

        let header = reader
            .peek(opcode.header_size())
            .ok_or_else(|| truncated(opcode.header_size()))?;

        let command = match opcode {
            Opcode::Clear => Command::Clear,
            Opcode::Send => {
                let size = usize::from(u16::from_le_bytes([header[0], header[1]]));
                let needed = SEND_HEADER_SIZE + size;
                let body = reader.peek(needed).ok_or_else(|| truncated(needed))?;
                Command::Send {
                    data: &body[SEND_HEADER_SIZE..],
                }
            }
            Opcode::Receive => Command::Receive {
                size: u16::from_le_bytes([header[0], header[1]]),
                total_timeout_ms: u16::from_le_bytes([header[2], header[3]]),
                char_timeout_ms: u16::from_le_bytes([header[4], header[5]]),
            },
            Opcode::SetBaudRate => Command::SetBaudRate {
                baud_rate: u32::from_le_bytes([header[0], header[1], header[2], header[3]]),
            },
            Opcode::Delay => Command::Delay {
                delay_ms: u32::from_le_bytes([header[0], header[1], header[2], header[3]]),
            },
        };

        reader.advance(command.encoded_len() - 1);
        Ok(command)
    }

    /// Encode this command into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        if let Command::Send { data } = self {
            if data.len() > usize::from(u16::MAX) {
                return Err(EncodeError::PayloadTooLarge);
            }
        }

        let len = self.encoded_len();
        if buffer.len() < len {
            return Err(EncodeError::BufferTooSmall);
        }

        buffer[0] = self.opcode().to_byte();
        let header = &mut buffer[1..len];
        match *self {
            Command::Clear => {}
            Command::Send { data } => {
                header[..2].copy_from_slice(&(data.len() as u16).to_le_bytes());
                header[2..].copy_from_slice(data);
            }
            Command::Receive {
                size,
                total_timeout_ms,
                char_timeout_ms,
            } => {
                header[0..2].copy_from_slice(&size.to_le_bytes());
                header[2..4].copy_from_slice(&total_timeout_ms.to_le_bytes());
                header[4..6].copy_from_slice(&char_timeout_ms.to_le_bytes());
            }
            Command::SetBaudRate { baud_rate } => header.copy_from_slice(&baud_rate.to_le_bytes()),
            Command::Delay { delay_ms } => header.copy_from_slice(&delay_ms.to_le_bytes()),
        }

        Ok(len)
    }
}
