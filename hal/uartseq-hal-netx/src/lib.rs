//! netX implementation of the `uartseq-hal` UART traits
//!
//! The netX UART is a register-compatible relative of the ARM PL010 with a
//! 16-bit baud divider split over two line control registers. This crate
//! drives it through a small register access trait so the same code runs
//! against real memory-mapped registers or a simulated register file.
//!
//! # Layout
//!
//! - [`regs`] - register offsets, bit masks and the [`RegisterAccess`] trait
//! - [`mmio`] - volatile memory-mapped implementation of [`RegisterAccess`]
//! - [`pinmux`] - routing UART signals to MMIO pins
//! - [`uart`] - [`NetxUart`], the [`UartCore`](uartseq_hal::UartCore) implementation
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting support

#![no_std]
#![deny(unsafe_code)]

pub mod mmio;
pub mod pinmux;
pub mod regs;
pub mod uart;

pub use mmio::Mmio;
pub use pinmux::{MmioLayout, MmioMux, NoPinMux, NoPortControl, PinMux, PinMuxError, PortControl};
pub use regs::{Register, RegisterAccess};
pub use uart::NetxUart;

#[cfg(test)]
mod sim;
