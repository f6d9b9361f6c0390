//! UART register map

/// UART registers used by the driver, by byte offset from the core base address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(usize)]
pub enum Register {
    /// Data
    Dr = 0x00,
    /// Line control, high byte (word length, FIFO enable)
    LcrH = 0x08,
    /// Line control, middle byte (divider bits 15..8)
    LcrM = 0x0c,
    /// Line control, low byte (divider bits 7..0)
    LcrL = 0x10,
    /// Control
    Cr = 0x14,
    /// Flags
    Fr = 0x18,
    /// RTS/CTS control
    Rts = 0x24,
    /// Output driver enable
    DrvOut = 0x34,
    /// Control 2 (baud rate mode)
    Cr2 = 0x38,
}

impl Register {
    pub const fn offset(self) -> usize {
        self as usize
    }
}

/// Flags: transmitter busy
pub const FR_BUSY: u32 = 1 << 3;
/// Flags: receive FIFO empty
pub const FR_RXFE: u32 = 1 << 4;
/// Flags: transmit FIFO full
pub const FR_TXFF: u32 = 1 << 5;

/// Line control: FIFO enable
pub const LCR_H_FEN: u32 = 1 << 4;
/// Line control: 8 data bits
pub const LCR_H_WLEN_8: u32 = 0b11 << 5;

/// Control: UART enable
pub const CR_UART_EN: u32 = 1 << 0;
/// Control 2: divider mode (divider = baud * 2^20 / f)
pub const CR2_BAUD_RATE_MODE: u32 = 1 << 0;

/// Driver enable: TX
pub const DRVOUT_DRVTX: u32 = 1 << 0;
/// 32-bit register access at byte offsets within one register block
pub trait RegisterAccess {
    fn read(&mut self, offset: usize) -> u32;
    fn write(&mut self, offset: usize, value: u32);

    fn read_reg(&mut self, reg: Register) -> u32 {
        self.read(reg.offset())
    }

    fn write_reg(&mut self, reg: Register, value: u32) {
        self.write(reg.offset(), value)
    }
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &mut T {
    fn read(&mut self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    fn write(&mut self, offset: usize, value: u32) {
        (**self).write(offset, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_offsets() {
        let map = [
            (Register::Dr, 0x00),
            (Register::LcrH, 0x08),
            (Register::LcrM, 0x0c),
            (Register::LcrL, 0x10),
            (Register::Cr, 0x14),
            (Register::Fr, 0x18),
            (Register::Rts, 0x24),
            (Register::DrvOut, 0x34),
            (Register::Cr2, 0x38),
        ];
        for (reg, offset) in map {
            assert_eq!(reg.offset(), offset);
            assert_eq!(offset % 4, 0);
        }
    }

    #[test]
    fn test_line_control_8n1_fifo() {
        assert_eq!(LCR_H_WLEN_8 | LCR_H_FEN, 0x70);
    }
}
