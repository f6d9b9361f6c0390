//! Test command dispatch
//!
//! Maps the three host test commands onto the sequencer lifecycle. Each
//! request carries its own parameters; the response carries what the host
//! needs for the next request.

use uartseq_hal::{StatusIndicator, Timebase, UartCore};
use uartseq_protocol::{TestCommand, TestResult};

use crate::config::OpenParams;
use crate::device::{Handle, Sequencer};
use crate::error::DispatchError;
use crate::report::report;

/// Decode a raw host command code
///
/// Unknown codes never reach the sequencer: they are reported as a failed
/// test on `indicator` and the returned [`TestResult`] goes back to the host.
pub fn parse_command(raw: u32, indicator: &mut impl StatusIndicator) -> Result<TestCommand, TestResult> {
    match TestCommand::try_from(raw) {
        Ok(command) => Ok(command),
        Err(e) => {
            warn!("Invalid test command {}", raw);
            Err(report(&Err::<TestCommand, _>(e), indicator))
        }
    }
}

/// Host request
#[derive(Debug)]
pub enum Request<'a> {
    /// Bring up a core
    Open(OpenParams),
    /// Execute a command stream on an open core
    RunSequence {
        handle: &'a Handle,
        commands: &'a [u8],
        output: &'a mut [u8],
    },
    /// Tear down a core
    Close(Handle),
}

impl Request<'_> {
    /// Wire command this request corresponds to
    pub fn command(&self) -> TestCommand {
        match self {
            Request::Open(_) => TestCommand::Open,
            Request::RunSequence { .. } => TestCommand::RunSequence,
            Request::Close(_) => TestCommand::Close,
        }
    }
}

/// Successful reply to a [`Request`]
#[derive(Debug, PartialEq, Eq)]
pub enum Response {
    Opened(Handle),
    /// Sequence finished; `received` bytes of output are valid
    Completed { received: usize },
    Closed,
}

impl<U: UartCore, C: Timebase, const N: usize> Sequencer<U, C, N> {
    /// Route a request to open, run or close
    pub fn process(&mut self, request: Request<'_>) -> Result<Response, DispatchError<U::Error>> {
        trace!("Processing test command {}", u32::from(request.command()));

        match request {
            Request::Open(params) => Ok(Response::Opened(self.open(&params)?)),
            Request::RunSequence {
                handle,
                commands,
                output,
            } => {
                let received = self.run_sequence(handle, commands, output)?;
                Ok(Response::Completed { received })
            }
            Request::Close(handle) => {
                self.close(handle)?;
                Ok(Response::Closed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uartseq_hal::Status;
    use uartseq_protocol::params::RESULT_ERROR;

    #[derive(Default)]
    struct LastStatus(Option<Status>);

    impl StatusIndicator for LastStatus {
        fn show(&mut self, status: Status) {
            self.0 = Some(status);
        }
    }

    #[test]
    fn test_known_codes_leave_indicator_alone() {
        let mut indicator = LastStatus::default();
        assert_eq!(parse_command(0, &mut indicator), Ok(TestCommand::Open));
        assert_eq!(parse_command(1, &mut indicator), Ok(TestCommand::RunSequence));
        assert_eq!(parse_command(2, &mut indicator), Ok(TestCommand::Close));
        assert_eq!(indicator.0, None);
    }

    #[test]
    fn test_unknown_code_reports_failure() {
        let mut indicator = LastStatus::default();
        let result = parse_command(3, &mut indicator);

        assert_eq!(result, Err(TestResult::Error));
        assert_eq!(result.map_err(TestResult::code), Err(RESULT_ERROR));
        assert_eq!(indicator.0, Some(Status::Fail));
    }
}
