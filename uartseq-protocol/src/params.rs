//! Request and result codes shared with the host test tool
//!
//! The host writes a request code, the sequencer answers with a two-valued
//! test result. Failure details never cross this boundary.

use core::fmt;

// Request codes: host → sequencer
pub const CMD_OPEN: u32 = 0;
pub const CMD_RUN_SEQUENCE: u32 = 1;
pub const CMD_CLOSE: u32 = 2;

// Result codes: sequencer → host
pub const RESULT_OK: u32 = 0;
pub const RESULT_ERROR: u32 = 1;

/// Operation requested by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TestCommand {
    /// Bring up a UART core and hand out a handle
    Open,
    /// Execute a command stream on an open handle
    RunSequence,
    /// Drain and shut down the core behind a handle
    Close,
}

/// Request code outside the known set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidTestCommand(pub u32);

impl fmt::Display for InvalidTestCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid command: {:#010x}", self.0)
    }
}

impl TryFrom<u32> for TestCommand {
    type Error = InvalidTestCommand;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            CMD_OPEN => Ok(TestCommand::Open),
            CMD_RUN_SEQUENCE => Ok(TestCommand::RunSequence),
            CMD_CLOSE => Ok(TestCommand::Close),
            _ => Err(InvalidTestCommand(code)),
        }
    }
}

impl From<TestCommand> for u32 {
    fn from(cmd: TestCommand) -> Self {
        match cmd {
            TestCommand::Open => CMD_OPEN,
            TestCommand::RunSequence => CMD_RUN_SEQUENCE,
            TestCommand::Close => CMD_CLOSE,
        }
    }
}

/// Pass/fail result reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TestResult {
    Ok,
    Error,
}

impl TestResult {
    /// Wire value of this result
    pub fn code(self) -> u32 {
        match self {
            TestResult::Ok => RESULT_OK,
            TestResult::Error => RESULT_ERROR,
        }
    }

    pub fn is_ok(self) -> bool {
        self == TestResult::Ok
    }
}

impl<T, E> From<&Result<T, E>> for TestResult {
    fn from(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            TestResult::Ok
        } else {
            TestResult::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_codes() {
        assert_eq!(TestCommand::try_from(0), Ok(TestCommand::Open));
        assert_eq!(TestCommand::try_from(1), Ok(TestCommand::RunSequence));
        assert_eq!(TestCommand::try_from(2), Ok(TestCommand::Close));
        assert_eq!(TestCommand::try_from(3), Err(InvalidTestCommand(3)));
        assert_eq!(u32::from(TestCommand::Close), 2);
    }

    #[test]
    fn test_result_codes() {
        assert_eq!(TestResult::Ok.code(), 0);
        assert_eq!(TestResult::Error.code(), 1);
    }

    #[test]
    fn test_result_from_result() {
        let ok: Result<usize, ()> = Ok(3);
        let err: Result<usize, ()> = Err(());
        assert_eq!(TestResult::from(&ok), TestResult::Ok);
        assert_eq!(TestResult::from(&err), TestResult::Error);
    }
}
