//! # fixema-core
//!
//! Fixed-point exponential moving average for real-time sampling loops.
//!
//! - [`FixedPointEma`]: integer-only EMA whose step cadence is decoupled from
//!   the caller's polling rate, with a bounded catch-up and a staleness reset
//! - [`Smoother`]: the `(input, dt) -> output` interface consumers drive
//! - [`EmaConfig`]: serde-loadable construction parameters, including the
//!   [`CoefficientChange`] policy for the accumulator on coefficient changes

pub mod config;
pub mod ema;
pub mod smoother;

pub use config::{CoefficientChange, EmaConfig};
pub use ema::{EmaError, FixedPointEma};
pub use smoother::Smoother;
