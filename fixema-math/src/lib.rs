//! # fixema-math
//!
//! Integer-only arithmetic behind the fixema fixed-point EMA filter.
//!
//! This crate provides [`Coefficient`] — a filter gain stored as
//! `num / 2^log2_denom` — and the [`ops`] that the filter's update loop is
//! built from: the 64-bit overflow bound, the single catch-up step, and
//! accumulator rescaling between denominators.
//!
//! All intermediates are 64-bit and explicitly wrapping, so results are
//! bit-identical on every target and misuse never panics.

pub mod coefficient;
pub mod ops;

pub use coefficient::{Coefficient, CoefficientError, MAX_LOG2_DENOM};
pub use ops::{descale, rescale, scale, step, would_overflow, INPUT_SPAN};
