//! Board-agnostic core of the UART test sequencer
//!
//! This crate contains everything that does not depend on a particular
//! UART implementation:
//!
//! - Baud rate to divider conversion
//! - The sequence interpreter (clear, send, receive, baud rate, delay)
//! - Device lifecycle (open, run sequence, close) over registered cores
//! - Pass/fail result reporting
//! - Configuration types

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod baud;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod interpreter;
pub mod report;

pub use baud::{compute_divider, BaudRateOutOfRange, DEFAULT_DEVICE_FREQUENCY_HZ};
pub use config::{OpenParams, SequencerConfig};
pub use device::{Handle, Sequencer};
pub use dispatch::{parse_command, Request, Response};
pub use error::{CloseError, DispatchError, OpenError, SequenceError};
pub use interpreter::{Interpreter, LineSettings, Outcome};
pub use report::report;
