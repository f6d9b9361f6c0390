//! Baud rate to divider conversion
//!
//! The UART cores derive their bit clock from a 16-bit divider:
//!
//! ```text
//! divider = baud_rate * 16 * 2^16 / device_frequency
//! ```
//!
//! rounded to the nearest integer (half up). The product needs 64 bits:
//! a 32-bit baud rate times 2^20 overflows `u32` for any rate above 4095.

use core::fmt;

/// Clock feeding every UART core
pub const DEFAULT_DEVICE_FREQUENCY_HZ: u32 = 100_000_000;

/// Requested baud rate cannot be expressed with a 16-bit divider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudRateOutOfRange {
    pub baud_rate: u32,
}

impl fmt::Display for BaudRateOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "baud rate {} out of range", self.baud_rate)
    }
}

/// Compute the divider for `baud_rate` on a core clocked at `device_frequency_hz`
pub fn compute_divider(baud_rate: u32, device_frequency_hz: u32) -> Result<u16, BaudRateOutOfRange> {
    let out_of_range = BaudRateOutOfRange { baud_rate };
    if device_frequency_hz == 0 {
        return Err(out_of_range);
    }

    let frequency = u64::from(device_frequency_hz);
    let scaled = u64::from(baud_rate) * 16 * 65536;
    // Round to nearest: add half the divisor before dividing
    let divider = (scaled + frequency / 2) / frequency;

    u16::try_from(divider).map_err(|_| out_of_range)
}

/// Highest baud rate whose divider still fits into 16 bits
pub fn max_baud_rate(device_frequency_hz: u32) -> u32 {
    // divider <= 0xffff  <=>  baud * 2^20 + f/2 < 0x10000 * f
    let frequency = u64::from(device_frequency_hz);
    let limit = (0x1_0000 * frequency - frequency / 2).saturating_sub(1) >> 20;
    u32::try_from(limit).unwrap_or(u32::MAX)
}
