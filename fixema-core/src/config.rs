use crate::EmaError;
use fixema_math::Coefficient;
use serde::{Deserialize, Serialize};

pub const DEFAULT_INTERVAL: u32 = 1000;
pub const DEFAULT_K_NUM: i32 = 1;
pub const DEFAULT_K_LOG2_DENOM: i8 = 3;
pub const DEFAULT_MAX_ITERATIONS: u32 = 16;

/// What happens to the accumulator when the coefficient's denominator changes.
///
/// The accumulator holds `filtered × 2^k_log2_denom`, so a new exponent
/// either leaves it at the old scale for one transitional step or shifts it
/// to the new one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoefficientChange {
    /// Leave the accumulator untouched. The next update compares a sample at
    /// the new scale against state at the old scale.
    #[default]
    KeepAccumulator,

    /// Shift the accumulator to the new denominator so the filtered value is
    /// preserved exactly across the change.
    RescaleAccumulator,
}

/// Construction parameters for [`FixedPointEma`](crate::FixedPointEma).
///
/// # Example
/// ```
/// use fixema_core::{EmaConfig, FixedPointEma};
///
/// let config: EmaConfig = serde_json::from_str(
///     r#"{ "interval": 1000, "k_num": 1, "k_log2_denom": 1, "max_iterations": 1 }"#,
/// ).unwrap();
/// let mut ema = FixedPointEma::from_config(&config).unwrap();
/// assert_eq!(ema.update(2, 1000), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaConfig {
    /// Time between filter steps, in the caller's time unit. Must be > 0.
    pub interval: u32,
    /// Coefficient numerator.
    pub k_num: i32,
    /// log2 of the coefficient denominator.
    pub k_log2_denom: i8,
    /// Catch-up steps allowed per update before the filter snaps to the input.
    pub max_iterations: u32,
    /// Run [`Coefficient::optimized`] on the configured coefficient at construction.
    pub optimize: bool,
    /// Accumulator policy for later coefficient changes.
    pub coefficient_change: CoefficientChange,
}

impl Default for EmaConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            k_num: DEFAULT_K_NUM,
            k_log2_denom: DEFAULT_K_LOG2_DENOM,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            optimize: false,
            coefficient_change: CoefficientChange::default(),
        }
    }
}

impl EmaConfig {
    pub fn new(interval: u32, k_num: i32, k_log2_denom: i8, max_iterations: u32) -> Self {
        Self {
            interval,
            k_num,
            k_log2_denom,
            max_iterations,
            ..Self::default()
        }
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_coefficient_change(mut self, policy: CoefficientChange) -> Self {
        self.coefficient_change = policy;
        self
    }

    /// Validate the coefficient parameters and return the coefficient the
    /// filter will start with (optimized if requested). The interval is
    /// checked by [`FixedPointEma::new`](crate::FixedPointEma::new).
    pub fn validate(&self) -> Result<Coefficient, EmaError> {
        let coefficient = Coefficient::new(self.k_num, self.k_log2_denom)?;
        Ok(if self.optimize {
            coefficient.optimized()
        } else {
            coefficient
        })
    }
}
