//! Signal routing
//!
//! netX devices route peripheral signals to pins through the MMIO matrix:
//! each MMIO pin has a config word selecting the function driven onto it.
//! The config words are protected by the ASIC control access key, which has
//! to be read and written back right before every protected write.
//!
//! Some devices additionally need a port control word per pin. That is
//! handled by a separate [`PortControl`] implementation.

use core::fmt;

use uartseq_hal::{PinAssignment, UartSignal};

use crate::regs::RegisterAccess;

/// Routing failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMuxError {
    /// MMIO index beyond the pins of this device
    InvalidPin(u8),
}

impl fmt::Display for PinMuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinMuxError::InvalidPin(pin) => write!(f, "MMIO{} does not exist", pin),
        }
    }
}

/// Routes one UART signal to the pin described by its assignment
pub trait PinMux {
    type Error;

    fn route(&mut self, signal: UartSignal, pin: PinAssignment) -> Result<(), Self::Error>;
}

/// For boards where the host configures the pins itself
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPinMux;

impl PinMux for NoPinMux {
    type Error = PinMuxError;

    fn route(&mut self, _signal: UartSignal, _pin: PinAssignment) -> Result<(), PinMuxError> {
        Ok(())
    }
}

/// Applies port control words to MMIO pins
pub trait PortControl {
    fn apply(&mut self, mmio: u8, value: u16);
}

/// Device without port control
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPortControl;

impl PortControl for NoPortControl {
    fn apply(&mut self, _mmio: u8, _value: u16) {}
}

/// Device specific placement of the MMIO matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MmioLayout {
    /// Offset of the access key register in the ASIC control block
    pub access_key_offset: usize,
    /// Number of MMIO pins
    pub pin_count: u8,
}

/// MMIO matrix pin multiplexer
///
/// `functions` holds the MMIO function codes of the UART instance in
/// RX, TX, RTS, CTS order.
pub struct MmioMux<A, K, P = NoPortControl> {
    mmio_ctrl: A,
    asic_ctrl: K,
    port_control: P,
    layout: MmioLayout,
    functions: [u8; 4],
}

impl<A: RegisterAccess, K: RegisterAccess> MmioMux<A, K> {
    pub fn new(mmio_ctrl: A, asic_ctrl: K, layout: MmioLayout, functions: [u8; 4]) -> Self {
        Self {
            mmio_ctrl,
            asic_ctrl,
            port_control: NoPortControl,
            layout,
            functions,
        }
    }
}

impl<A: RegisterAccess, K: RegisterAccess, P: PortControl> MmioMux<A, K, P> {
    /// Same multiplexer, also applying port control words
    pub fn with_port_control<Q: PortControl>(self, port_control: Q) -> MmioMux<A, K, Q> {
        MmioMux {
            mmio_ctrl: self.mmio_ctrl,
            asic_ctrl: self.asic_ctrl,
            port_control,
            layout: self.layout,
            functions: self.functions,
        }
    }

    pub fn release(self) -> (A, K, P) {
        (self.mmio_ctrl, self.asic_ctrl, self.port_control)
    }
}

impl<A: RegisterAccess, K: RegisterAccess, P: PortControl> PinMux for MmioMux<A, K, P> {
    type Error = PinMuxError;

    fn route(&mut self, signal: UartSignal, pin: PinAssignment) -> Result<(), PinMuxError> {
        let Some(mmio) = pin.mmio else {
            return Ok(());
        };
        if mmio >= self.layout.pin_count {
            return Err(PinMuxError::InvalidPin(mmio));
        }

        let key = self.asic_ctrl.read(self.layout.access_key_offset);
        self.asic_ctrl.write(self.layout.access_key_offset, key);
        self.mmio_ctrl
            .write(usize::from(mmio) * 4, u32::from(self.functions[signal as usize]));

        if let Some(value) = pin.port_control {
            self.port_control.apply(mmio, value);
        }
        Ok(())
    }
}
