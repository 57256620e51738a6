/// A filter driven by `(sample, elapsed time)` pairs.
///
/// Time is in caller-defined units; implementations decide how many filter
/// steps a given `dt` is worth.
pub trait Smoother {
    /// Feed a sample observed `dt` time units after the previous call.
    /// Returns the new output.
    fn update(&mut self, input: i32, dt: u32) -> i32;

    /// Current output without advancing time.
    fn filtered(&self) -> i32;

    /// Return to the initial state (zero output, no elapsed time).
    fn reset(&mut self);
}
