//! Monotonic millisecond timebase

use embedded_hal::delay::DelayNs;

/// Monotonic millisecond clock
///
/// Only [`now_ms`](Self::now_ms) is required. The default `elapsed` and
/// `sleep_ms` are the free-running-counter arithmetic every timeout in the
/// interpreter relies on.
pub trait Timebase {
    /// Milliseconds since an arbitrary, fixed epoch
    fn now_ms(&mut self) -> u64;

    /// At least `timeout_ms` milliseconds have passed since `start_ms`
    ///
    /// Wrapping subtraction keeps this correct across counter overflow.
    fn elapsed(&mut self, start_ms: u64, timeout_ms: u64) -> bool {
        self.now_ms().wrapping_sub(start_ms) >= timeout_ms
    }

    /// Block for `ms` milliseconds
    ///
    /// Never returns before `elapsed(start, ms)` holds.
    fn sleep_ms(&mut self, ms: u32) {
        let start = self.now_ms();
        while !self.elapsed(start, u64::from(ms)) {
            core::hint::spin_loop();
        }
    }
}

impl<T: Timebase + ?Sized> Timebase for &mut T {
    fn now_ms(&mut self) -> u64 {
        (**self).now_ms()
    }

    fn elapsed(&mut self, start_ms: u64, timeout_ms: u64) -> bool {
        (**self).elapsed(start_ms, timeout_ms)
    }

    fn sleep_ms(&mut self, ms: u32) {
        (**self).sleep_ms(ms)
    }
}

/// Adapter exposing a [`Timebase`] as an `embedded-hal` delay
///
/// Sub-millisecond requests are rounded up to whole milliseconds.
pub struct TimebaseDelay<T> {
    timebase: T,
}

impl<T: Timebase> TimebaseDelay<T> {
    pub fn new(timebase: T) -> Self {
        Self { timebase }
    }

    /// Give the timebase back
    pub fn release(self) -> T {
        self.timebase
    }
}

impl<T: Timebase> DelayNs for TimebaseDelay<T> {
    fn delay_ns(&mut self, ns: u32) {
        self.timebase.sleep_ms(ns.div_ceil(1_000_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.timebase.sleep_ms(us.div_ceil(1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.timebase.sleep_ms(ms);
    }
}

/// Timebase backed by `embassy-time`
///
/// `sleep_ms` uses `block_for`, so it busy-waits like the rest of the
/// interpreter instead of yielding to the executor.
#[cfg(feature = "embassy")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyTimebase;

#[cfg(feature = "embassy")]
impl Timebase for EmbassyTimebase {
    fn now_ms(&mut self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }

    fn sleep_ms(&mut self, ms: u32) {
        embassy_time::block_for(embassy_time::Duration::from_millis(u64::from(ms)));
    }
}
