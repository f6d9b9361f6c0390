//! Simulated register block for unit tests

use heapless::Vec;

use crate::regs::RegisterAccess;

/// Register block remembering every write in order
pub struct SimRegisters {
    words: [u32; 64],
    pub writes: Vec<(usize, u32), 64>,
}

impl SimRegisters {
    pub fn new() -> Self {
        Self {
            words: [0; 64],
            writes: Vec::new(),
        }
    }

    /// Set a value without recording a write
    pub fn set(&mut self, offset: usize, value: u32) {
        self.words[offset / 4] = value;
    }

    pub fn get(&self, offset: usize) -> u32 {
        self.words[offset / 4]
    }
}

impl RegisterAccess for SimRegisters {
    fn read(&mut self, offset: usize) -> u32 {
        self.words[offset / 4]
    }

    fn write(&mut self, offset: usize, value: u32) {
        self.words[offset / 4] = value;
        self.writes.push((offset, value)).unwrap();
    }
}
