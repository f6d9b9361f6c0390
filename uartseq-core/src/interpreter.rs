//! Sequence interpreter
//!
//! Executes a command stream against one UART. Decoding and execution are
//! interleaved: commands run as soon as they decode, and the first failing
//! command stops the run without undoing anything before it.
//!
//! Two cursors move independently: the command cursor through the stream and
//! the output cursor through the caller's receive buffer. Only completed
//! Receive commands advance the output cursor.

use core::ops::Range;

use uartseq_hal::{Timebase, UartTransport};
use uartseq_protocol::{Command, CommandReader};

use crate::baud::compute_divider;
use crate::config::SequencerConfig;
use crate::error::SequenceError;

/// Line settings recorded for an open core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineSettings {
    /// Last successfully configured baud rate
    pub baud_rate: u32,
    /// Divider programmed for `baud_rate`
    pub divider: u16,
}

/// Final state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// All commands executed
    Completed { produced: usize },
    /// A command failed; `produced` counts only completed Receive commands
    Failed { error: SequenceError, produced: usize },
}

impl Outcome {
    /// Bytes accounted to completed Receive commands
    pub fn produced(&self) -> usize {
        match *self {
            Outcome::Completed { produced } | Outcome::Failed { produced, .. } => produced,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed { .. })
    }

    /// Collapse into the caller-facing result
    pub fn into_result(self) -> Result<usize, SequenceError> {
        match self {
            Outcome::Completed { produced } => Ok(produced),
            Outcome::Failed { error, .. } => Err(error),
        }
    }
}

/// Per-run cursors, created fresh for every run
struct InterpreterState<'c, 'o> {
    commands: CommandReader<'c>,
    output: &'o mut [u8],
    out_pos: usize,
}

impl<'c, 'o> InterpreterState<'c, 'o> {
    fn new(commands: &'c [u8], output: &'o mut [u8]) -> Self {
        Self {
            commands: CommandReader::new(commands),
            output,
            out_pos: 0,
        }
    }

    /// Claim `size` bytes of output, or fail without touching the buffer
    fn reserve(&self, size: usize) -> Result<Range<usize>, SequenceError> {
        let available = self.output.len().saturating_sub(self.out_pos);
        if size > available {
            return Err(SequenceError::OutputBufferExhausted {
                requested: size,
                available,
            });
        }
        Ok(self.out_pos..self.out_pos + size)
    }

    fn finish(self) -> Outcome {
        let capacity = self.output.len();
        if self.out_pos <= capacity {
            Outcome::Completed {
                produced: self.out_pos,
            }
        } else {
            Outcome::Failed {
                error: SequenceError::OutputOverflow {
                    produced: self.out_pos,
                    capacity,
                },
                produced: capacity,
            }
        }
    }
}

/// Executes command streams against a borrowed UART and clock
///
/// The interpreter never owns the device; it borrows the transport, the
/// clock and the recorded line settings for the duration of a run.
pub struct Interpreter<'d, T, C> {
    uart: &'d mut T,
    clock: &'d mut C,
    line: &'d mut LineSettings,
    config: SequencerConfig,
}

impl<'d, T: UartTransport, C: Timebase> Interpreter<'d, T, C> {
    pub fn new(
        uart: &'d mut T,
        clock: &'d mut C,
        line: &'d mut LineSettings,
        config: SequencerConfig,
    ) -> Self {
        Self {
            uart,
            clock,
            line,
            config,
        }
    }

    /// Run every command in `commands`, receiving into `output`
    pub fn run(&mut self, commands: &[u8], output: &mut [u8]) -> Outcome {
        if self.config.verbose {
            info!(
                "Running {} command bytes with a receive buffer of {} bytes",
                commands.len(),
                output.len()
            );
        }

        let mut state = InterpreterState::new(commands, output);
        while let Some(decoded) = state.commands.next_command() {
            let result = match decoded {
                Ok(command) => self.execute(command, &mut state),
                Err(e) => Err(SequenceError::from(e)),
            };

            if let Err(error) = result {
                match error {
                    SequenceError::InvalidOpcode(byte) => warn!("Invalid command: {=u8:#x}", byte),
                    SequenceError::TruncatedCommand { opcode, .. } => {
                        if self.config.verbose {
                            info!("Not enough data for the {} command left", opcode);
                        }
                    }
                    _ => {}
                }
                if self.config.verbose {
                    info!("The command failed. Stopping execution of the sequence.");
                }
                return Outcome::Failed {
                    error,
                    produced: state.out_pos,
                };
            }
        }

        state.finish()
    }

    fn execute(
        &mut self,
        command: Command<'_>,
        state: &mut InterpreterState<'_, '_>,
    ) -> Result<(), SequenceError> {
        match command {
            Command::Clear => {
                self.clear();
            }
            Command::Send { data } => self.send(data),
            Command::Receive {
                size,
                total_timeout_ms,
                char_timeout_ms,
            } => {
                let range = state.reserve(usize::from(size))?;
                if self.config.verbose {
                    info!(
                        "RECEIVE {} bytes, total timeout = {}ms, char timeout = {}ms",
                        size, total_timeout_ms, char_timeout_ms
                    );
                }
                self.receive(&mut state.output[range.clone()], total_timeout_ms, char_timeout_ms)?;
                if self.config.verbose {
                    debug!("{=[u8]:x}", &state.output[range.clone()]);
                }
                state.out_pos = range.end;
            }
            Command::SetBaudRate { baud_rate } => self.set_baud_rate(baud_rate)?,
            Command::Delay { delay_ms } => self.delay(delay_ms),
        }
        Ok(())
    }

    /// Drain the receive FIFO, returning the number of discarded bytes
    fn clear(&mut self) -> usize {
        if self.config.verbose {
            info!("CLEAN");
        }

        let mut discarded = 0usize;
        while !self.uart.rx_empty() {
            let _ = self.uart.read_byte();
            discarded += 1;
        }

        if self.config.verbose {
            info!("Removed {} bytes from the RX FIFO.", discarded);
        }
        discarded
    }

    /// Transmit `data` and wait until the transmitter is idle
    ///
    /// Both waits are unbounded, see the blocking contract on
    /// [`UartTransport`].
    fn send(&mut self, data: &[u8]) {
        if self.config.verbose {
            info!("SEND {} bytes", data.len());
            debug!("{=[u8]:x}", data);
        }

        for &byte in data {
            while self.uart.tx_full() {
                core::hint::spin_loop();
            }
            self.uart.write_byte(byte);
        }

        while self.uart.tx_busy() {
            core::hint::spin_loop();
        }
    }

    /// Fill `dest` from the receive FIFO under the total and per-char timeouts
    ///
    /// The total timer starts once per command, the char timer once per
    /// byte. A timeout of 0 disables that timer. When both expire in the
    /// same poll, the total timeout is reported.
    fn receive(
        &mut self,
        dest: &mut [u8],
        total_timeout_ms: u16,
        char_timeout_ms: u16,
    ) -> Result<(), SequenceError> {
        let total_start = self.clock.now_ms();

        for (received, slot) in dest.iter_mut().enumerate() {
            let char_start = self.clock.now_ms();
            let mut total_elapsed = false;
            let mut char_elapsed = false;

            loop {
                let empty = self.uart.rx_empty();
                if total_timeout_ms != 0 {
                    total_elapsed = self.clock.elapsed(total_start, u64::from(total_timeout_ms));
                }
                if char_timeout_ms != 0 {
                    char_elapsed = self.clock.elapsed(char_start, u64::from(char_timeout_ms));
                }
                if !empty || total_elapsed || char_elapsed {
                    break;
                }
            }

            if total_elapsed {
                warn!("The total timeout of {}ms elapsed.", total_timeout_ms);
                return Err(SequenceError::ReceiveTimeoutTotal {
                    timeout_ms: total_timeout_ms,
                    received,
                });
            }
            if char_elapsed {
                warn!("The char timeout of {}ms elapsed.", char_timeout_ms);
                return Err(SequenceError::ReceiveTimeoutChar {
                    timeout_ms: char_timeout_ms,
                    received,
                });
            }

            *slot = self.uart.read_byte();
        }

        Ok(())
    }

    /// Reprogram the divider; the device is untouched if the rate is invalid
    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), SequenceError> {
        if self.config.verbose {
            info!("BaudRate {}", baud_rate);
        }

        let divider = compute_divider(baud_rate, self.config.device_frequency_hz).map_err(|e| {
            warn!("Failed to set the baud rate to {}.", baud_rate);
            SequenceError::from(e)
        })?;

        self.uart.program_baud_divider(divider);
        *self.line = LineSettings { baud_rate, divider };
        Ok(())
    }

    fn delay(&mut self, delay_ms: u32) {
        if self.config.verbose {
            info!("Delay {} ms", delay_ms);
        }
        self.clock.sleep_ms(delay_ms);
    }
}
