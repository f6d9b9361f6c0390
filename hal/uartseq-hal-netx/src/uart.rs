//! UART core driver
//!
//! Every wait in here is an unbounded busy-poll on the flag register.

use uartseq_hal::{PinConfig, UartCore, UartTransport};

use crate::pinmux::{NoPinMux, PinMux};
use crate::regs::{
    Register, RegisterAccess, CR2_BAUD_RATE_MODE, CR_UART_EN, DRVOUT_DRVTX, FR_BUSY, FR_RXFE, FR_TXFF,
    LCR_H_FEN, LCR_H_WLEN_8,
};

/// One netX UART core
pub struct NetxUart<R, M = NoPinMux> {
    regs: R,
    mux: M,
}

impl<R: RegisterAccess> NetxUart<R> {
    /// Core whose pins are set up elsewhere
    pub fn new(regs: R) -> Self {
        Self { regs, mux: NoPinMux }
    }
}

impl<R: RegisterAccess, M: PinMux> NetxUart<R, M> {
    /// Core that routes its signals through `mux` when enabled
    pub fn with_pin_mux(regs: R, mux: M) -> Self {
        Self { regs, mux }
    }

    pub fn release(self) -> (R, M) {
        (self.regs, self.mux)
    }

    fn flags(&mut self) -> u32 {
        self.regs.read_reg(Register::Fr)
    }

    /// Put every configuration register back to its reset value
    fn reset(&mut self) {
        self.regs.write_reg(Register::Cr, 0);
        self.regs.write_reg(Register::LcrM, 0);
        self.regs.write_reg(Register::LcrL, 0);
        self.regs.write_reg(Register::LcrH, 0);
        self.regs.write_reg(Register::Rts, 0);
        self.regs.write_reg(Register::DrvOut, 0);
    }
}

impl<R: RegisterAccess, M: PinMux> UartTransport for NetxUart<R, M> {
    fn rx_empty(&mut self) -> bool {
        self.flags() & FR_RXFE != 0
    }

    fn tx_full(&mut self) -> bool {
        self.flags() & FR_TXFF != 0
    }

    fn tx_busy(&mut self) -> bool {
        self.flags() & FR_BUSY != 0
    }

    fn read_byte(&mut self) -> u8 {
        (self.regs.read_reg(Register::Dr) & 0xff) as u8
    }

    fn write_byte(&mut self, byte: u8) {
        self.regs.write_reg(Register::Dr, u32::from(byte));
    }

    fn program_baud_divider(&mut self, divider: u16) {
        self.regs.write_reg(Register::LcrL, u32::from(divider & 0xff));
        self.regs.write_reg(Register::LcrM, u32::from(divider >> 8));
    }
}

impl<R: RegisterAccess, M: PinMux> UartCore for NetxUart<R, M> {
    type Error = M::Error;

    fn enable(&mut self, divider: u16, pins: &PinConfig) -> Result<(), M::Error> {
        self.regs.write_reg(Register::Cr, 0);
        self.regs.write_reg(Register::Cr2, CR2_BAUD_RATE_MODE);
        self.program_baud_divider(divider);

        // 8N1 with FIFOs
        self.regs.write_reg(Register::LcrH, LCR_H_WLEN_8 | LCR_H_FEN);
        self.regs.write_reg(Register::DrvOut, 0);
        // No hardware flow control
        self.regs.write_reg(Register::Rts, 0);
        self.regs.write_reg(Register::Cr, CR_UART_EN);

        for (signal, pin) in pins.iter() {
            if let Err(e) = self.mux.route(signal, pin) {
                self.reset();
                return Err(e);
            }
        }

        self.regs.write_reg(Register::DrvOut, DRVOUT_DRVTX);
        Ok(())
    }

    fn disable(&mut self) {
        while self.tx_busy() {
            core::hint::spin_loop();
        }
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pinmux::{MmioLayout, MmioMux, PinMuxError};
    use crate::sim::SimRegisters;

    const LAYOUT: MmioLayout = MmioLayout {
        access_key_offset: 0x70,
        pin_count: 18,
    };

    #[test]
    fn test_enable_sequence() {
        let mut regs = SimRegisters::new();
        let mut uart = NetxUart::new(&mut regs);
        uart.enable(0x04b8, &PinConfig::unrouted()).unwrap();

        assert_eq!(
            &regs.writes[..],
            &[
                (Register::Cr.offset(), 0),
                (Register::Cr2.offset(), CR2_BAUD_RATE_MODE),
                (Register::LcrL.offset(), 0xb8),
                (Register::LcrM.offset(), 0x04),
                (Register::LcrH.offset(), 0x70),
                (Register::DrvOut.offset(), 0),
                (Register::Rts.offset(), 0),
                (Register::Cr.offset(), CR_UART_EN),
                (Register::DrvOut.offset(), DRVOUT_DRVTX),
            ]
        );
    }

    #[test]
    fn test_flags() {
        let mut regs = SimRegisters::new();
        regs.set(Register::Fr.offset(), FR_RXFE | FR_BUSY);
        let mut uart = NetxUart::new(&mut regs);

        assert!(uart.rx_empty());
        assert!(uart.tx_busy());
        assert!(!uart.tx_full());
    }

    #[test]
    fn test_data_register() {
        let mut regs = SimRegisters::new();
        // Error bits above the data byte are dropped
        regs.set(Register::Dr.offset(), 0x0f41);
        let mut uart = NetxUart::new(&mut regs);

        assert_eq!(uart.read_byte(), 0x41);
        uart.write_byte(0x5a);
        assert_eq!(regs.get(Register::Dr.offset()), 0x5a);
    }

    #[test]
    fn test_disable_resets_registers() {
        let mut regs = SimRegisters::new();
        let mut uart = NetxUart::new(&mut regs);
        uart.enable(1208, &PinConfig::unrouted()).unwrap();
        uart.disable();

        for reg in [
            Register::Cr,
            Register::LcrM,
            Register::LcrL,
            Register::LcrH,
            Register::Rts,
            Register::DrvOut,
        ] {
            assert_eq!(regs.get(reg.offset()), 0);
        }
        // Divider mode stays selected
        assert_eq!(regs.get(Register::Cr2.offset()), CR2_BAUD_RATE_MODE);
    }

    #[test]
    fn test_enable_routes_pins_in_signal_order() {
        let mut regs = SimRegisters::new();
        let mut mmio_ctrl = SimRegisters::new();
        let mut asic_ctrl = SimRegisters::new();
        let mux = MmioMux::new(&mut mmio_ctrl, &mut asic_ctrl, LAYOUT, [0x20, 0x21, 0x22, 0x23]);

        let mut uart = NetxUart::with_pin_mux(&mut regs, mux);
        let pins = PinConfig::from_raw([5, 6, 0xff, 0xff], [0xffff; 4]);
        uart.enable(101, &pins).unwrap();
        drop(uart);

        assert_eq!(&mmio_ctrl.writes[..], &[(5 * 4, 0x20), (6 * 4, 0x21)]);
        assert_eq!(asic_ctrl.writes.len(), 2);
        assert_eq!(regs.get(Register::DrvOut.offset()), DRVOUT_DRVTX);
    }

    #[test]
    fn test_failed_routing_leaves_core_disabled() {
        let mut regs = SimRegisters::new();
        let mux = MmioMux::new(SimRegisters::new(), SimRegisters::new(), LAYOUT, [0; 4]);

        let mut uart = NetxUart::with_pin_mux(&mut regs, mux);
        let pins = PinConfig::from_raw([1, 30, 0xff, 0xff], [0xffff; 4]);
        assert_eq!(uart.enable(101, &pins), Err(PinMuxError::InvalidPin(30)));
        drop(uart);

        assert_eq!(regs.get(Register::Cr.offset()), 0);
        assert_eq!(regs.get(Register::DrvOut.offset()), 0);
    }
}
