//! Property tests for divider conversion and output accounting

mod common;

use common::{SimUart, TickClock};
use proptest::prelude::*;
use uartseq_core::baud::{compute_divider, max_baud_rate};
use uartseq_core::{OpenParams, Sequencer, SequencerConfig, DEFAULT_DEVICE_FREQUENCY_HZ};

proptest! {
    #[test]
    fn divider_is_monotonic(a in 0u32..=6_249_952, b in 0u32..=6_249_952) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let d_low = compute_divider(low, DEFAULT_DEVICE_FREQUENCY_HZ).unwrap();
        let d_high = compute_divider(high, DEFAULT_DEVICE_FREQUENCY_HZ).unwrap();
        prop_assert!(d_low <= d_high);
    }

    #[test]
    fn divider_fits_exactly_up_to_the_limit(baud in any::<u32>(), freq in 1u32..=200_000_000) {
        let result = compute_divider(baud, freq);
        prop_assert_eq!(result.is_ok(), baud <= max_baud_rate(freq));
    }

    #[test]
    fn produced_bytes_never_exceed_capacity(
        stream in proptest::collection::vec(any::<u8>(), 0..96),
        rx in proptest::collection::vec(any::<u8>(), 0..32),
        capacity in 0usize..24,
    ) {
        // Keep Delay commands short so arbitrary streams finish quickly
        let stream: Vec<u8> = stream
            .iter()
            .map(|&b| if b == 0x04 { 0x00 } else { b })
            .collect();

        let mut sequencer: Sequencer<SimUart, TickClock, 1> =
            Sequencer::new(TickClock::default(), SequencerConfig::default());
        // Data keeps arriving, so zero timeouts cannot spin forever
        let mut uart = SimUart::endless();
        uart.feed(&rx);
        prop_assert!(sequencer.register(uart).is_ok());
        let handle = sequencer.open(&OpenParams::default()).unwrap();

        let mut output = vec![0u8; capacity];
        let outcome = sequencer.execute(&handle, &stream, &mut output);
        prop_assert!(outcome.produced() <= capacity);
    }
}
