//! UART abstractions
//!
//! The interpreter drives a UART purely through FIFO status flags and
//! single-byte data access. Every wait is a busy-poll on the caller's thread.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Byte-level UART transport
///
/// Flag reads take `&mut self` because status and data registers may have
/// read side effects on real hardware.
///
/// # Blocking contract
///
/// Callers spin on [`tx_full`](Self::tx_full) and [`tx_busy`](Self::tx_busy)
/// without a timeout. An implementation whose transmitter can stall forever
/// will hang the caller; that is the accepted behavior for a trusted,
/// always-progressing peripheral.
pub trait UartTransport {
    /// Receive FIFO holds no data
    fn rx_empty(&mut self) -> bool;

    /// Transmit FIFO cannot accept another byte
    fn tx_full(&mut self) -> bool;

    /// Transmitter still shifting out data
    fn tx_busy(&mut self) -> bool;

    /// Pop one byte from the receive FIFO
    ///
    /// Only meaningful after [`rx_empty`](Self::rx_empty) returned `false`.
    fn read_byte(&mut self) -> u8;

    /// Push one byte into the transmit FIFO
    fn write_byte(&mut self, byte: u8);

    /// Program the device-specific 16-bit baud rate divider
    fn program_baud_divider(&mut self, divider: u16);
}

/// A UART core that can be brought up and torn down
///
/// One implementation exists per hardware variant; the host application
/// picks the implementation, not the interpreter.
pub trait UartCore: UartTransport {
    /// Error type for bring-up
    type Error;

    /// Configure the core for 8N1 with FIFOs, program `divider`, route the
    /// pins and enable the transmitter drivers.
    fn enable(&mut self, divider: u16, pins: &PinConfig) -> Result<(), Self::Error>;

    /// Wait for the transmitter to drain, then reset the core
    fn disable(&mut self);
}

/// UART signals in parameter order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UartSignal {
    Rx,
    Tx,
    Rts,
    Cts,
}

impl UartSignal {
    /// All signals, in the order used by [`PinConfig`]
    pub const ALL: [UartSignal; 4] = [UartSignal::Rx, UartSignal::Tx, UartSignal::Rts, UartSignal::Cts];

    /// Short name for diagnostics
    pub fn name(self) -> &'static str {
        match self {
            UartSignal::Rx => "RX",
            UartSignal::Tx => "TX",
            UartSignal::Rts => "RTS",
            UartSignal::Cts => "CTS",
        }
    }
}

/// Raw MMIO index meaning "signal not routed"
pub const MMIO_UNUSED: u8 = 0xff;

/// Raw port control value meaning "leave port control untouched"
pub const PORTCONTROL_SKIP: u16 = 0xffff;

/// Routing of a single UART signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinAssignment {
    /// MMIO pin index, `None` if the signal is not routed
    pub mmio: Option<u8>,
    /// Port control word applied to the pin, `None` to skip
    pub port_control: Option<u16>,
}

impl PinAssignment {
    /// Convert from the raw host parameter encoding
    pub fn from_raw(mmio: u8, port_control: u16) -> Self {
        Self {
            mmio: (mmio != MMIO_UNUSED).then_some(mmio),
            port_control: (port_control != PORTCONTROL_SKIP).then_some(port_control),
        }
    }

    /// Signal is routed to a pin
    pub fn is_routed(&self) -> bool {
        self.mmio.is_some()
    }
}

/// Pin routing for RX, TX, RTS and CTS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    pub pins: [PinAssignment; 4],
}

impl PinConfig {
    /// No signal routed (pins already set up by the host)
    pub const fn unrouted() -> Self {
        Self {
            pins: [PinAssignment {
                mmio: None,
                port_control: None,
            }; 4],
        }
    }

    /// Convert from the raw host parameter arrays (RX, TX, RTS, CTS)
    pub fn from_raw(mmio: [u8; 4], port_control: [u16; 4]) -> Self {
        let mut pins = [PinAssignment::default(); 4];
        for (i, pin) in pins.iter_mut().enumerate() {
            *pin = PinAssignment::from_raw(mmio[i], port_control[i]);
        }
        Self { pins }
    }

    /// Assignment for one signal
    pub fn get(&self, signal: UartSignal) -> PinAssignment {
        self.pins[signal as usize]
    }

    /// Iterate over signals together with their assignment
    pub fn iter(&self) -> impl Iterator<Item = (UartSignal, PinAssignment)> + '_ {
        UartSignal::ALL.iter().map(move |&signal| (signal, self.get(signal)))
    }
}
