//! Configuration types
//!
//! Plain data handed in by the host application. With the `serde` feature
//! these can be loaded from whatever format the host uses.

use uartseq_hal::PinConfig;

use crate::baud::DEFAULT_DEVICE_FREQUENCY_HZ;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default maximum number of UART cores a sequencer manages
pub const DEFAULT_MAX_CORES: usize = 4;

/// Sequencer-wide settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SequencerConfig {
    /// Log every command, hexdumps and discard counts
    pub verbose: bool,
    /// Clock feeding the UART cores, used for divider computation
    pub device_frequency_hz: u32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            device_frequency_hz: DEFAULT_DEVICE_FREQUENCY_HZ,
        }
    }
}

impl SequencerConfig {
    /// Default settings with verbose diagnostics on
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            ..Self::default()
        }
    }
}

/// Parameters of an Open request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OpenParams {
    /// Index of the UART core, in registration order
    pub core: u32,
    /// Initial baud rate
    pub baud_rate: u32,
    /// Pin routing for RX, TX, RTS and CTS
    pub pins: PinConfig,
}

impl Default for OpenParams {
    fn default() -> Self {
        Self {
            core: 0,
            baud_rate: 115_200,
            pins: PinConfig::unrouted(),
        }
    }
}

impl OpenParams {
    /// Open `core` at `baud_rate` without routing any pins
    pub fn new(core: u32, baud_rate: u32) -> Self {
        Self {
            core,
            baud_rate,
            pins: PinConfig::unrouted(),
        }
    }

    /// Same parameters with the given pin routing
    pub fn with_pins(mut self, pins: PinConfig) -> Self {
        self.pins = pins;
        self
    }
}
