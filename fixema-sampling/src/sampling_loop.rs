use crate::{Clock, Sensor, SensorError};
use fixema_core::Smoother;
use tracing::{trace, warn};

/// Drives a [`Smoother`] from a clock and a sensor.
///
/// Each [`poll`](Self::poll) measures the time since the last sample that
/// reached the smoother and feeds the new sample with that `dt`. A failed
/// read leaves the smoother untouched and does not consume the elapsed time,
/// so after an outage the next good sample arrives with the whole gap and
/// the filter's staleness handling decides whether to catch up or snap.
pub struct SamplingLoop<C: Clock, S: Sensor, F: Smoother> {
    clock: C,
    sensor: S,
    smoother: F,
    last_tick: u32,
}

impl<C: Clock, S: Sensor, F: Smoother> SamplingLoop<C, S, F> {
    /// Start measuring from the clock's current tick.
    pub fn new(clock: C, sensor: S, smoother: F) -> Self {
        let last_tick = clock.now();
        Self {
            clock,
            sensor,
            smoother,
            last_tick,
        }
    }

    /// Read one sample and push it through the smoother.
    /// Returns the smoother's new output.
    pub fn poll(&mut self) -> Result<i32, SensorError> {
        let now = self.clock.now();
        let sample = match self.sensor.read() {
            Ok(sample) => sample,
            Err(e) => {
                warn!(
                    error = %e,
                    pending = now.wrapping_sub(self.last_tick),
                    "sensor read failed, carrying elapsed time"
                );
                return Err(e);
            }
        };

        let dt = now.wrapping_sub(self.last_tick);
        self.last_tick = now;
        let filtered = self.smoother.update(sample, dt);
        trace!(sample, dt, filtered, "sample filtered");
        Ok(filtered)
    }

    /// Ticks accumulated since the last sample reached the smoother.
    pub fn pending(&self) -> u32 {
        self.clock.now().wrapping_sub(self.last_tick)
    }

    /// Restart the smoother and the elapsed-time reference.
    pub fn restart(&mut self) {
        self.smoother.reset();
        self.last_tick = self.clock.now();
    }

    pub fn filtered(&self) -> i32 {
        self.smoother.filtered()
    }

    pub fn smoother(&self) -> &F {
        &self.smoother
    }

    pub fn smoother_mut(&mut self) -> &mut F {
        &mut self.smoother
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn into_parts(self) -> (C, S, F) {
        (self.clock, self.sensor, self.smoother)
    }
}
