//! uartseq Hardware Abstraction Layer
//!
//! This crate defines the capabilities the sequence interpreter consumes.
//! Chip-specific crates implement them, so the interpreter never assumes a
//! particular register layout or time source.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  uartseq-core (interpreter, lifecycle)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  uartseq-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ uartseq-hal-  │       │  host mocks / │
//! │     netx      │       │   simulators  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTransport`] - Byte-level FIFO access and divider programming
//! - [`uart::UartCore`] - Bring-up and teardown of one UART core
//! - [`time::Timebase`] - Monotonic millisecond clock
//! - [`status::StatusIndicator`] - Pass/fail indication (RDY/RUN LEDs)

#![no_std]
#![deny(unsafe_code)]

pub mod status;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use status::{Status, StatusIndicator};
pub use time::{Timebase, TimebaseDelay};
pub use uart::{PinAssignment, PinConfig, UartCore, UartSignal, UartTransport};
