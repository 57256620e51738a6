//! # fixema
//!
//! Integer-only exponential moving average for real-time sampling loops.
//!
//! This umbrella crate re-exports the workspace:
//! - [`math`]: coefficient representation, overflow bound, step arithmetic
//! - the filter itself ([`FixedPointEma`], [`Smoother`], [`EmaConfig`])
//! - [`sampling`]: clock/sensor polling loop that drives a smoother

pub use fixema_core::{CoefficientChange, EmaConfig, EmaError, FixedPointEma, Smoother};
pub use fixema_math::{Coefficient, CoefficientError};

pub use fixema_math as math;
pub use fixema_sampling as sampling;
