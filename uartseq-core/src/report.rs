//! Pass/fail reporting

use uartseq_hal::{Status, StatusIndicator};
use uartseq_protocol::TestResult;

use crate::interpreter::Outcome;

/// Map an operation result to the wire result and show it on `indicator`
pub fn report<T, E>(result: &Result<T, E>, indicator: &mut impl StatusIndicator) -> TestResult {
    let test_result = TestResult::from(result);
    let status = if test_result.is_ok() {
        Status::Pass
    } else {
        Status::Fail
    };

    debug!("Test result {}", test_result.code());
    indicator.show(status);
    test_result
}

impl Outcome {
    pub fn test_result(&self) -> TestResult {
        if self.is_completed() {
            TestResult::Ok
        } else {
            TestResult::Error
        }
    }
}

impl From<&Outcome> for TestResult {
    fn from(outcome: &Outcome) -> Self {
        outcome.test_result()
    }
}
