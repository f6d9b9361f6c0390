//! Test status indication
//!
//! Boards running the sequencer show the outcome of the last operation on
//! the RDY/RUN LED pair: green for pass, yellow for failure.

use embedded_hal::digital::OutputPin;

/// Outcome shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Last operation passed
    Pass,
    /// Last operation failed
    Fail,
}

/// Something that can display a [`Status`]
pub trait StatusIndicator {
    fn show(&mut self, status: Status);
}

/// Indicator that shows nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndicator;

impl StatusIndicator for NoIndicator {
    fn show(&mut self, _status: Status) {}
}

/// RDY/RUN LED pair driven through `embedded-hal` output pins
///
/// Pins are active high. Pin errors are ignored; a broken LED must not
/// change the test result.
pub struct RdyRunLeds<G, Y> {
    green: G,
    yellow: Y,
}

impl<G: OutputPin, Y: OutputPin> RdyRunLeds<G, Y> {
    /// Create the indicator with both LEDs off
    pub fn new(mut green: G, mut yellow: Y) -> Self {
        let _ = green.set_low();
        let _ = yellow.set_low();
        Self { green, yellow }
    }

    /// Release the pins
    pub fn release(self) -> (G, Y) {
        (self.green, self.yellow)
    }
}

impl<G: OutputPin, Y: OutputPin> StatusIndicator for RdyRunLeds<G, Y> {
    fn show(&mut self, status: Status) {
        let (green, yellow) = match status {
            Status::Pass => (true, false),
            Status::Fail => (false, true),
        };
        let _ = self.green.set_state(green.into());
        let _ = self.yellow.set_state(yellow.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    #[test]
    fn test_leds_start_off() {
        let leds = RdyRunLeds::new(MockPin { high: true }, MockPin { high: true });
        let (green, yellow) = leds.release();
        assert!(!green.high);
        assert!(!yellow.high);
    }

    #[test]
    fn test_pass_then_fail() {
        let mut leds = RdyRunLeds::new(MockPin { high: false }, MockPin { high: false });

        leds.show(Status::Pass);
        assert!(leds.green.high);
        assert!(!leds.yellow.high);

        leds.show(Status::Fail);
        assert!(!leds.green.high);
        assert!(leds.yellow.high);
    }
}
