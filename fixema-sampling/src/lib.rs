//! # fixema-sampling
//!
//! Polling loop that turns a tick counter and a sample source into the
//! `(input, dt)` stream a [`Smoother`](fixema_core::Smoother) consumes.
//!
//! Key types:
//! - [`Clock`]: wrapping `u32` tick source ([`ManualClock`], [`MonotonicClock`])
//! - [`Sensor`]: fallible sample source, implemented for closures
//! - [`SamplingLoop`]: measures `dt` between good samples and feeds the smoother

pub mod clock;
pub mod sampling_loop;
pub mod sensor;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use sampling_loop::SamplingLoop;
pub use sensor::{Sensor, SensorError};
