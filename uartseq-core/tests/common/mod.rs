//! Simulated UART and clock shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;

use uartseq_hal::{PinConfig, Timebase, UartCore, UartTransport};

/// Bring-up failure injected by [`SimUart::failing`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

/// UART core backed by in-memory FIFOs
#[derive(Debug, Default)]
pub struct SimUart {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub loopback: bool,
    /// Receive FIFO refills on every other poll; reads past the fed data return 0
    pub endless: bool,
    polls: usize,
    pub enabled: bool,
    pub divider: Option<u16>,
    pub pins: Option<PinConfig>,
    pub fail_enable: bool,
    pub enable_count: usize,
    pub disable_count: usize,
}

impl SimUart {
    pub fn loopback() -> Self {
        Self {
            loopback: true,
            ..Self::default()
        }
    }

    pub fn endless() -> Self {
        Self {
            endless: true,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_enable: true,
            ..Self::default()
        }
    }

    pub fn feed(&mut self, data: &[u8]) {
        self.rx.extend(data.iter().copied());
    }
}

impl UartTransport for SimUart {
    fn rx_empty(&mut self) -> bool {
        if self.endless {
            self.polls += 1;
            return self.polls % 2 == 0;
        }
        self.rx.is_empty()
    }

    fn tx_full(&mut self) -> bool {
        false
    }

    fn tx_busy(&mut self) -> bool {
        false
    }

    fn read_byte(&mut self) -> u8 {
        self.rx.pop_front().unwrap_or(0)
    }

    fn write_byte(&mut self, byte: u8) {
        assert!(self.enabled, "write to a disabled core");
        self.tx.push(byte);
        if self.loopback {
            self.rx.push_back(byte);
        }
    }

    fn program_baud_divider(&mut self, divider: u16) {
        self.divider = Some(divider);
    }
}

impl UartCore for SimUart {
    type Error = SimError;

    fn enable(&mut self, divider: u16, pins: &PinConfig) -> Result<(), SimError> {
        if self.fail_enable {
            return Err(SimError);
        }
        self.enable_count += 1;
        self.enabled = true;
        self.divider = Some(divider);
        self.pins = Some(*pins);
        Ok(())
    }

    fn disable(&mut self) {
        self.disable_count += 1;
        self.enabled = false;
        self.divider = None;
        self.rx.clear();
    }
}

/// Clock that advances one millisecond on every read
#[derive(Debug, Default)]
pub struct TickClock {
    pub now: u64,
    pub slept_ms: u64,
}

impl Timebase for TickClock {
    fn now_ms(&mut self) -> u64 {
        self.now += 1;
        self.now
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.slept_ms += u64::from(ms);
        self.now += u64::from(ms);
    }
}
