use crate::ops::would_overflow;
use thiserror::Error;

/// Largest accepted denominator exponent: any `i32` shifted left by this
/// much still fits in an `i64` accumulator.
pub const MAX_LOG2_DENOM: i8 = 32;

/// Filter gain `k = num / 2^log2_denom`.
///
/// A `Coefficient` is only constructed through [`Coefficient::new`] (or the
/// helpers built on it), so every value satisfies the overflow bound checked
/// by [`would_overflow`]: the update product `diff × num` cannot leave the
/// signed 64-bit range for any pair of `i32` sample and state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coefficient {
    num: i32,
    log2_denom: i8,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoefficientError {
    #[error("Denominator exponent {0} outside 0..=32")]
    Log2DenomOutOfRange(i8),
    #[error("Negative coefficient numerator: {0}")]
    NegativeNumerator(i32),
    #[error("Coefficient {num}/2^{log2_denom} can overflow the 64-bit update product")]
    WouldOverflow { num: i32, log2_denom: i8 },
    #[error("Numerator {0} does not fit in i32")]
    NumeratorTooLarge(u64),
    #[error("Sample period must be non-zero")]
    ZeroSamplePeriod,
}

impl Coefficient {
    /// `k = 1`: the output follows the input exactly.
    pub const UNITY: Self = Self {
        num: 1,
        log2_denom: 0,
    };

    /// Validate and build `num / 2^log2_denom`.
    pub fn new(num: i32, log2_denom: i8) -> Result<Self, CoefficientError> {
        if !(0..=MAX_LOG2_DENOM).contains(&log2_denom) {
            return Err(CoefficientError::Log2DenomOutOfRange(log2_denom));
        }
        if num < 0 {
            return Err(CoefficientError::NegativeNumerator(num));
        }
        if would_overflow(num as u64, log2_denom as u32) {
            return Err(CoefficientError::WouldOverflow { num, log2_denom });
        }
        Ok(Self { num, log2_denom })
    }

    /// Derive the gain of a first-order low-pass with time constant `τ`
    /// sampled every `T`: `k = T / (τ + T)`.
    ///
    /// Both arguments share the caller's time unit. The result is rounded to
    /// the nearest representable `num / 2^log2_denom` and never exceeds 1.
    ///
    /// ```
    /// use fixema_math::Coefficient;
    ///
    /// // τ = 3T  ->  k = 1/4
    /// let k = Coefficient::from_time_constant(10, 30, 8).unwrap();
    /// assert_eq!((k.num(), k.log2_denom()), (64, 8));
    /// ```
    pub fn from_time_constant(
        sample_period: u32,
        time_constant: u32,
        log2_denom: i8,
    ) -> Result<Self, CoefficientError> {
        if sample_period == 0 {
            return Err(CoefficientError::ZeroSamplePeriod);
        }
        if !(0..=MAX_LOG2_DENOM).contains(&log2_denom) {
            return Err(CoefficientError::Log2DenomOutOfRange(log2_denom));
        }

        let denom = 1u128 << log2_denom;
        let period = u128::from(sample_period);
        let total = period + u128::from(time_constant);
        // (T · 2^d + total / 2) / total, rounded to nearest
        let num = ((period * denom + total / 2) / total).min(denom);
        let num = u64::try_from(num).unwrap_or(u64::MAX);
        let num = i32::try_from(num).map_err(|_| CoefficientError::NumeratorTooLarge(num))?;

        Self::new(num, log2_denom)
    }

    pub fn num(&self) -> i32 {
        self.num
    }

    pub fn log2_denom(&self) -> i8 {
        self.log2_denom
    }

    /// Denominator exponent as a shift amount.
    #[inline]
    pub fn shift(&self) -> u32 {
        self.log2_denom as u32
    }

    /// `true` if `k == 1` exactly.
    pub fn is_unity(&self) -> bool {
        i64::from(self.num) == 1i64 << self.log2_denom
    }

    /// `true` if `k <= 1`, i.e. the filter never overshoots its input.
    pub fn is_non_amplifying(&self) -> bool {
        i64::from(self.num) <= 1i64 << self.log2_denom
    }

    /// Same ratio, maximum precision.
    ///
    /// Doubles numerator and denominator together for as long as the doubled
    /// pair still satisfies the overflow bound and the numerator itself has
    /// room to double. A zero numerator is returned as is.
    pub fn optimized(self) -> Self {
        if self.num == 0 {
            return self;
        }

        let mut num = self.num;
        let mut log2_denom = self.log2_denom;
        while log2_denom < MAX_LOG2_DENOM
            && !would_overflow(num as u64 * 2, (log2_denom + 1) as u32)
        {
            if num > i32::MAX / 2 {
                break;
            }
            num *= 2;
            log2_denom += 1;
        }

        Self { num, log2_denom }
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Self::UNITY
    }
}

impl std::fmt::Display for Coefficient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/2^{}", self.num, self.log2_denom)
    }
}
