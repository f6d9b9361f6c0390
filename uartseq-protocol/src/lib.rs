//! UART sequence command stream
//!
//! This crate defines the binary command stream the host test tool sends
//! with a `RunSequence` request, and the small parameter vocabulary around
//! it (request codes and test results).
//!
//! # Wire format
//!
//! A stream is a flat run of commands, each an opcode byte followed by a
//! packed little-endian header. There is no framing, padding or checksum:
//! ```text
//! ┌────────┬──────────────────────────────────────────────┐
//! │ OPCODE │ HEADER                                       │
//! ├────────┼──────────────────────────────────────────────┤
//! │ 0x00   │ (none)                                Clear  │
//! │ 0x01   │ size:u16, data[size]                  Send   │
//! │ 0x02   │ size:u16, total_ms:u16, char_ms:u16   Receive│
//! │ 0x03   │ baud_rate:u32                         Baud   │
//! │ 0x04   │ delay_ms:u32                          Delay  │
//! └────────┴──────────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod builder;
pub mod command;
pub mod params;
pub mod reader;

pub use builder::SequenceBuilder;
pub use command::{Command, DecodeError, EncodeError, Opcode};
pub use params::{TestCommand, TestResult};
pub use reader::CommandReader;
