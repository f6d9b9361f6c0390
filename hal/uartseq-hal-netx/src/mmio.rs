//! Memory-mapped register block

#![allow(unsafe_code)]

use crate::regs::RegisterAccess;

/// Register block at a fixed physical address
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// # Safety
    ///
    /// `base` must be the address of a register block that is valid for
    /// 32-bit volatile access at every offset used on it, and no other
    /// `Mmio` may alias the same block.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    pub fn base(&self) -> usize {
        self.base
    }
}

impl RegisterAccess for Mmio {
    fn read(&mut self, offset: usize) -> u32 {
        // SAFETY: validity of the block is guaranteed by `Mmio::new`
        unsafe { ((self.base + offset) as *const u32).read_volatile() }
    }

    fn write(&mut self, offset: usize, value: u32) {
        // SAFETY: validity of the block is guaranteed by `Mmio::new`
        unsafe { ((self.base + offset) as *mut u32).write_volatile(value) }
    }
}
