//! Error types
//!
//! Every error is local to one operation. A failing command aborts the rest
//! of its sequence; nothing here is fatal to the sequencer.

use core::fmt;

use uartseq_protocol::{DecodeError, Opcode};

use crate::baud::BaudRateOutOfRange;

/// Why a sequence stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError {
    /// Not enough bytes left for a header or the declared Send payload
    TruncatedCommand {
        opcode: Opcode,
        needed: usize,
        remaining: usize,
    },
    /// Receive would write past the end of the output buffer
    OutputBufferExhausted { requested: usize, available: usize },
    /// Unknown opcode byte
    InvalidOpcode(u8),
    /// SetBaudRate with a rate the divider cannot express
    BaudRateOutOfRange { baud_rate: u32 },
    /// Receive total timeout elapsed after `received` bytes
    ReceiveTimeoutTotal { timeout_ms: u16, received: usize },
    /// Receive per-character timeout elapsed after `received` bytes
    ReceiveTimeoutChar { timeout_ms: u16, received: usize },
    /// Output cursor ended beyond the buffer (internal consistency)
    OutputOverflow { produced: usize, capacity: usize },
    /// Handle does not refer to an open core
    InvalidHandle,
}

impl From<DecodeError> for SequenceError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::InvalidOpcode(byte) => SequenceError::InvalidOpcode(byte),
            DecodeError::Truncated {
                opcode,
                needed,
                remaining,
            } => SequenceError::TruncatedCommand {
                opcode,
                needed,
                remaining,
            },
        }
    }
}

impl From<BaudRateOutOfRange> for SequenceError {
    fn from(e: BaudRateOutOfRange) -> Self {
        SequenceError::BaudRateOutOfRange {
            baud_rate: e.baud_rate,
        }
    }
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SequenceError::TruncatedCommand {
                opcode,
                needed,
                remaining,
            } => fmt::Display::fmt(
                &DecodeError::Truncated {
                    opcode,
                    needed,
                    remaining,
                },
                f,
            ),
            SequenceError::OutputBufferExhausted {
                requested,
                available,
            } => write!(
                f,
                "not enough space for the receive data left ({} requested, {} available)",
                requested, available
            ),
            SequenceError::InvalidOpcode(byte) => fmt::Display::fmt(&DecodeError::InvalidOpcode(byte), f),
            SequenceError::BaudRateOutOfRange { baud_rate } => write!(f, "failed to set the baud rate to {}", baud_rate),
            SequenceError::ReceiveTimeoutTotal {
                timeout_ms,
                received,
            } => write!(
                f,
                "the total timeout of {}ms elapsed after {} bytes",
                timeout_ms, received
            ),
            SequenceError::ReceiveTimeoutChar {
                timeout_ms,
                received,
            } => write!(
                f,
                "the char timeout of {}ms elapsed after {} bytes",
                timeout_ms, received
            ),
            SequenceError::OutputOverflow { produced, capacity } => write!(
                f,
                "produced {} bytes into a buffer of {}",
                produced, capacity
            ),
            SequenceError::InvalidHandle => write!(f, "invalid handle"),
        }
    }
}

/// Why a core could not be opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpenError<E> {
    /// No core registered under this id
    InvalidCore(u32),
    /// Core already has an open handle
    CoreBusy(u32),
    /// Initial baud rate cannot be expressed with a 16-bit divider
    BaudRateOutOfRange(BaudRateOutOfRange),
    /// Bring-up failed in the UART implementation
    Device(E),
}

impl<E: fmt::Debug> fmt::Display for OpenError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenError::InvalidCore(core) => write!(f, "the UART core number {} is invalid", core),
            OpenError::CoreBusy(core) => write!(f, "the UART core {} is already open", core),
            OpenError::BaudRateOutOfRange(e) => write!(f, "{}", e),
            OpenError::Device(e) => write!(f, "device setup failed: {:?}", e),
        }
    }
}

/// Why a handle could not be closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CloseError {
    /// Handle does not refer to an open core
    InvalidHandle,
}

impl fmt::Display for CloseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseError::InvalidHandle => write!(f, "invalid handle"),
        }
    }
}

/// Failure of any request routed through [`Sequencer::process`](crate::Sequencer::process)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError<E> {
    Open(OpenError<E>),
    Sequence(SequenceError),
    Close(CloseError),
}

impl<E> From<OpenError<E>> for DispatchError<E> {
    fn from(e: OpenError<E>) -> Self {
        DispatchError::Open(e)
    }
}

impl<E> From<SequenceError> for DispatchError<E> {
    fn from(e: SequenceError) -> Self {
        DispatchError::Sequence(e)
    }
}

impl<E> From<CloseError> for DispatchError<E> {
    fn from(e: CloseError) -> Self {
        DispatchError::Close(e)
    }
}

impl<E: fmt::Debug> fmt::Display for DispatchError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Open(e) => fmt::Display::fmt(e, f),
            DispatchError::Sequence(e) => fmt::Display::fmt(e, f),
            DispatchError::Close(e) => fmt::Display::fmt(e, f),
        }
    }
}
