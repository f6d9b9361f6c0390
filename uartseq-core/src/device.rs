//! Device lifecycle
//!
//! A [`Sequencer`] owns the registered UART cores and the shared clock.
//! Opening a core yields a [`Handle`]; sequences run against a handle and
//! closing consumes it.
//!
//! ```text
//! register ──► Closed ──open──► Open ──close──► Closed
//!                                 │  ▲
//!                                 └──┘ run_sequence
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use heapless::Vec;
use uartseq_hal::{Timebase, UartCore};

use crate::baud::compute_divider;
use crate::config::{OpenParams, SequencerConfig, DEFAULT_MAX_CORES};
use crate::error::{CloseError, OpenError, SequenceError};
use crate::interpreter::{Interpreter, LineSettings, Outcome};

/// Session ids are unique across every sequencer in the program
static NEXT_SESSION: AtomicU32 = AtomicU32::new(0);

fn next_session_id() -> u32 {
    #[cfg(target_has_atomic = "32")]
    {
        NEXT_SESSION.fetch_add(1, Ordering::Relaxed)
    }
    // Cores without atomic read-modify-write run single-threaded
    #[cfg(not(target_has_atomic = "32"))]
    {
        let id = NEXT_SESSION.load(Ordering::Relaxed);
        NEXT_SESSION.store(id.wrapping_add(1), Ordering::Relaxed);
        id
    }
}

/// Access to one open core
///
/// Handles are neither `Clone` nor `Copy`: closing consumes the handle, so a
/// closed handle cannot be used again. Every open starts a new session; a
/// handle that does not match the current session of its core, including
/// one issued by a different sequencer, is rejected as invalid.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Handle {
    core: u32,
    session: u32,
}

impl Handle {
    /// Core this handle was opened on
    pub fn core(&self) -> u32 {
        self.core
    }
}

#[derive(Debug, Clone, Copy)]
struct Session {
    id: u32,
    line: LineSettings,
}

struct CoreSlot<U> {
    uart: U,
    session: Option<Session>,
}

/// Owner of the UART cores and the clock used for timeouts and delays
pub struct Sequencer<U, C, const N: usize = DEFAULT_MAX_CORES> {
    cores: Vec<CoreSlot<U>, N>,
    clock: C,
    config: SequencerConfig,
}

impl<U: UartCore, C: Timebase, const N: usize> Sequencer<U, C, N> {
    pub fn new(clock: C, config: SequencerConfig) -> Self {
        Self {
            cores: Vec::new(),
            clock,
            config,
        }
    }

    /// Add a core; returns its id, or gives the core back if the table is full
    pub fn register(&mut self, uart: U) -> Result<u32, U> {
        let id = self.cores.len() as u32;
        self.cores
            .push(CoreSlot { uart, session: None })
            .map_err(|slot| slot.uart)?;
        Ok(id)
    }

    pub fn core_count(&self) -> usize {
        self.cores.len()
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Bring up a core at the initial baud rate
    pub fn open(&mut self, params: &OpenParams) -> Result<Handle, OpenError<U::Error>> {
        let verbose = self.config.verbose;
        let frequency = self.config.device_frequency_hz;

        let slot = self
            .cores
            .get_mut(params.core as usize)
            .ok_or(OpenError::InvalidCore(params.core))?;
        if slot.session.is_some() {
            warn!("UART core {} is already open", params.core);
            return Err(OpenError::CoreBusy(params.core));
        }

        let divider = compute_divider(params.baud_rate, frequency).map_err(|e| {
            warn!("Failed to set the baud rate to {}.", params.baud_rate);
            OpenError::BaudRateOutOfRange(e)
        })?;

        if verbose {
            info!(
                "Setup UART{} with {} baud (native value {=u16:#06x})",
                params.core, params.baud_rate, divider
            );
            for (signal, pin) in params.pins.iter() {
                match (pin.mmio, pin.port_control) {
                    (Some(mmio), Some(pc)) => {
                        info!("  {=str}: MMIO{} with port control {=u16:#06x}", signal.name(), mmio, pc)
                    }
                    (Some(mmio), None) => info!("  {=str}: MMIO{} without port control", signal.name(), mmio),
                    (None, _) => info!("  {=str}: without MMIO", signal.name()),
                }
            }
        }

        slot.uart.enable(divider, &params.pins).map_err(OpenError::Device)?;

        let id = next_session_id();
        slot.session = Some(Session {
            id,
            line: LineSettings {
                baud_rate: params.baud_rate,
                divider,
            },
        });

        Ok(Handle {
            core: params.core,
            session: id,
        })
    }

    /// Execute a command stream; see [`Interpreter::run`]
    pub fn execute(&mut self, handle: &Handle, commands: &[u8], output: &mut [u8]) -> Outcome {
        let config = self.config;
        let Some((uart, session)) = Self::lookup(&mut self.cores, handle) else {
            warn!("Sequence requested for an invalid handle");
            return Outcome::Failed {
                error: SequenceError::InvalidHandle,
                produced: 0,
            };
        };

        Interpreter::new(uart, &mut self.clock, &mut session.line, config).run(commands, output)
    }

    /// Execute a command stream, returning the number of received bytes
    pub fn run_sequence(
        &mut self,
        handle: &Handle,
        commands: &[u8],
        output: &mut [u8],
    ) -> Result<usize, SequenceError> {
        self.execute(handle, commands, output).into_result()
    }

    /// Tear down the core behind `handle`
    pub fn close(&mut self, handle: Handle) -> Result<(), CloseError> {
        let verbose = self.config.verbose;
        let slot = self
            .cores
            .get_mut(handle.core as usize)
            .filter(|slot| slot.session.is_some_and(|session| session.id == handle.session))
            .ok_or(CloseError::InvalidHandle)?;

        if verbose {
            info!("Closing UART{}", handle.core);
        }
        slot.uart.disable();
        slot.session = None;
        Ok(())
    }

    /// Current line settings of an open core
    pub fn line_settings(&self, handle: &Handle) -> Option<LineSettings> {
        let slot = self.cores.get(handle.core as usize)?;
        slot.session
            .filter(|session| session.id == handle.session)
            .map(|session| session.line)
    }

    /// Direct access to a registered core, open or not
    pub fn core_mut(&mut self, core: u32) -> Option<&mut U> {
        self.cores.get_mut(core as usize).map(|slot| &mut slot.uart)
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    fn lookup<'s>(
        cores: &'s mut Vec<CoreSlot<U>, N>,
        handle: &Handle,
    ) -> Option<(&'s mut U, &'s mut Session)>
    where
        U: 's,
    {
        let slot = cores.get_mut(handle.core as usize)?;
        match slot.session.as_mut() {
            Some(session) if session.id == handle.session => Some((&mut slot.uart, session)),
            _ => None,
        }
    }
}
