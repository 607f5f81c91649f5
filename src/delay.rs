//! Blocking waits for the sensor settle time and the repeat interval, expressed through the
//! `embedded-hal` [`DelayNs`] trait so tests can substitute `MockDelay`.

use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// Sleeps the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Waits for `duration` rounded down to whole milliseconds. Durations longer than `u32::MAX`
/// milliseconds are split into several waits.
pub fn sleep<D: DelayNs + ?Sized>(delay: &mut D, duration: Duration) {
    let mut ms = duration.as_millis();
    while ms > 0 {
        let chunk = u32::try_from(ms).unwrap_or(u32::MAX);
        delay.delay_ms(chunk);
        ms -= u128::from(chunk);
    }
}
