use crate::config::{CoefficientChange, EmaConfig};
use crate::Smoother;
use fixema_math::{ops, Coefficient, CoefficientError};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmaError {
    #[error("Filter interval must be non-zero")]
    ZeroInterval,
    #[error("Coefficient error: {0}")]
    Coefficient(#[from] CoefficientError),
}

/// Fixed-point exponential moving average.
///
/// Every elapsed `interval` the output takes one step toward the most recent
/// input:
///
/// `filtered += ((input - filtered) * k_num) >> k_log2_denom`
///
/// The state is kept as `filtered × 2^k_log2_denom` so the fractional part
/// of each step carries into the next one. Callers may poll at any rate:
/// elapsed time accumulates until a whole interval has passed, and an update
/// spanning several intervals applies the same sample once per interval.
/// If more than `max_iterations` steps would be needed, the filter drops its
/// history and snaps to the input instead.
///
/// # Example
/// ```
/// use fixema_core::FixedPointEma;
/// use fixema_math::Coefficient;
///
/// // k = 1/2, one step per 1000 time units
/// let mut ema = FixedPointEma::new(1000, Coefficient::new(1, 1).unwrap(), 1).unwrap();
/// assert_eq!(ema.update(2, 1000), 1);
/// assert_eq!(ema.update(11, 1000), 6);
///
/// // half an interval: time accumulates, output holds
/// assert_eq!(ema.update(100, 500), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPointEma {
    interval: u32,
    time_since_update: u32,
    max_iterations: u32,
    coefficient: Coefficient,
    coefficient_change: CoefficientChange,
    /// filtered × 2^k_log2_denom
    filtered_scaled: i64,
    filtered: i32,
}

impl FixedPointEma {
    /// Create a filter with zero output and no elapsed time.
    pub fn new(
        interval: u32,
        coefficient: Coefficient,
        max_iterations: u32,
    ) -> Result<Self, EmaError> {
        if interval == 0 {
            return Err(EmaError::ZeroInterval);
        }

        Ok(Self {
            interval,
            time_since_update: 0,
            max_iterations,
            coefficient,
            coefficient_change: CoefficientChange::default(),
            filtered_scaled: 0,
            filtered: 0,
        })
    }

    pub fn from_config(config: &EmaConfig) -> Result<Self, EmaError> {
        let coefficient = config.validate()?;
        Ok(Self::new(config.interval, coefficient, config.max_iterations)?
            .with_coefficient_change(config.coefficient_change))
    }

    pub fn with_coefficient_change(mut self, policy: CoefficientChange) -> Self {
        self.coefficient_change = policy;
        self
    }

    pub fn set_coefficient_change(&mut self, policy: CoefficientChange) {
        self.coefficient_change = policy;
    }

    /// Replace the coefficient. Takes effect from the next filter step; the
    /// current output is left as is.
    pub fn set_coefficient(&mut self, k_num: i32, k_log2_denom: i8) -> Result<(), EmaError> {
        let coefficient = Coefficient::new(k_num, k_log2_denom)?;
        self.apply_coefficient(coefficient);
        Ok(())
    }

    /// Rescale the coefficient to the highest precision the overflow bound
    /// allows. The ratio `k` is unchanged.
    pub fn optimize_coefficient(&mut self) {
        let optimized = self.coefficient.optimized();
        self.apply_coefficient(optimized);
    }

    fn apply_coefficient(&mut self, coefficient: Coefficient) {
        let old = self.coefficient;
        if self.coefficient_change == CoefficientChange::RescaleAccumulator {
            self.filtered_scaled =
                ops::rescale(self.filtered_scaled, old.shift(), coefficient.shift());
        }
        self.coefficient = coefficient;
        debug!(
            old = %old,
            new = %coefficient,
            policy = ?self.coefficient_change,
            "filter coefficient changed"
        );
    }

    /// Feed `input`, observed `dt` time units after the previous call.
    ///
    /// Returns the filtered value, which is also available from
    /// [`filtered`](Self::filtered) afterwards.
    pub fn update(&mut self, input: i32, dt: u32) -> i32 {
        let elapsed = u64::from(self.time_since_update) + u64::from(dt);
        let limit = self.staleness_limit();
        if elapsed >= limit {
            debug!(elapsed, limit, input, "filter state stale, snapping to input");
            self.reset_to(input);
            return input;
        }

        let interval = u64::from(self.interval);
        let mut remaining = elapsed;
        while remaining >= interval {
            remaining -= interval;
            self.filtered_scaled = ops::step(self.filtered_scaled, input, self.coefficient);
        }
        trace!(
            steps = (elapsed - remaining) / interval,
            filtered_scaled = self.filtered_scaled,
            "filter updated"
        );

        // remaining < interval, so it fits
        self.time_since_update = remaining as u32;
        self.filtered = ops::descale(self.filtered_scaled, self.coefficient.shift());
        self.filtered
    }

    /// Drop all history and continue from `value`.
    pub fn reset_to(&mut self, value: i32) {
        self.time_since_update = 0;
        self.filtered_scaled = ops::scale(value, self.coefficient.shift());
        self.filtered = value;
    }

    /// Return to the freshly constructed state. Interval, iteration cap and
    /// coefficient are kept.
    pub fn reset(&mut self) {
        self.time_since_update = 0;
        self.filtered_scaled = 0;
        self.filtered = 0;
    }

    /// Elapsed time at which an update snaps instead of catching up:
    /// `interval × (max_iterations + 1)`.
    pub fn staleness_limit(&self) -> u64 {
        u64::from(self.interval) * (u64::from(self.max_iterations) + 1)
    }

    pub fn filtered(&self) -> i32 {
        self.filtered
    }

    pub fn filtered_scaled(&self) -> i64 {
        self.filtered_scaled
    }

    pub fn coefficient(&self) -> Coefficient {
        self.coefficient
    }

    pub fn k_num(&self) -> i32 {
        self.coefficient.num()
    }

    pub fn k_log2_denom(&self) -> i8 {
        self.coefficient.log2_denom()
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn time_since_update(&self) -> u32 {
        self.time_since_update
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn coefficient_change(&self) -> CoefficientChange {
        self.coefficient_change
    }
}

impl Smoother for FixedPointEma {
    fn update(&mut self, input: i32, dt: u32) -> i32 {
        FixedPointEma::update(self, input, dt)
    }

    fn filtered(&self) -> i32 {
        self.filtered
    }

    fn reset(&mut self) {
        FixedPointEma::reset(self)
    }
}
