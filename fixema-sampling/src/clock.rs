use std::time::Instant;

/// Free-running tick counter.
///
/// Ticks may wrap around `u32::MAX`; consumers take differences with
/// `wrapping_sub`, so a wrap between two reads is invisible as long as less
/// than `2^32` ticks pass between them.
pub trait Clock {
    fn now(&self) -> u32;
}

/// Clock that only moves when told to. Used by tests and simulations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    ticks: u32,
}

impl ManualClock {
    pub fn new(start: u32) -> Self {
        Self { ticks: start }
    }

    pub fn advance(&mut self, ticks: u32) {
        self.ticks = self.ticks.wrapping_add(ticks);
    }

    pub fn set(&mut self, ticks: u32) {
        self.ticks = ticks;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u32 {
        self.ticks
    }
}

/// Microseconds since construction, truncated to 32 bits (wraps every
/// ~71.6 minutes).
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> u32 {
        self.origin.elapsed().as_micros() as u32
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> u32 {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_wraps() {
        let mut clock = ManualClock::new(u32::MAX - 1);
        let before = clock.now();
        clock.advance(5);
        assert_eq!(clock.now(), 3);
        assert_eq!(clock.now().wrapping_sub(before), 5);
    }

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = clock.now();
        assert!(b.wrapping_sub(a) >= 1000);
    }
}
