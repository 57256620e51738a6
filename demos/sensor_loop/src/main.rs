use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use fixema_core::FixedPointEma;
use fixema_math::Coefficient;
use fixema_sampling::{Clock, ManualClock, SamplingLoop, Sensor, SensorError};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Simulated sensor loop: a noisy sine sampled with jittered timing and
/// occasional dropouts, smoothed by the fixed-point EMA.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Simulated duration in milliseconds
    #[arg(long, default_value_t = 10_000)]
    duration_ms: u32,

    /// Nominal sample interval in microseconds
    #[arg(long, default_value_t = 1000)]
    interval_us: u32,

    /// Poll jitter in microseconds (uniform, +/-)
    #[arg(long, default_value_t = 300)]
    jitter_us: u32,

    /// Filter time constant in microseconds
    #[arg(long, default_value_t = 8000)]
    time_constant_us: u32,

    /// Coefficient denominator exponent
    #[arg(long, default_value_t = 16)]
    k_log2_denom: i8,

    /// Catch-up steps allowed per update before snapping
    #[arg(long, default_value_t = 8)]
    max_iterations: u32,

    /// Sine amplitude in sensor counts
    #[arg(long, default_value_t = 10_000)]
    amplitude: i32,

    /// Sine period in milliseconds
    #[arg(long, default_value_t = 500)]
    period_ms: u32,

    /// Noise amplitude in sensor counts (uniform, +/-)
    #[arg(long, default_value_t = 2_000)]
    noise: i32,

    /// Probability that a poll starts a dropout
    #[arg(long, default_value_t = 0.002)]
    dropout_rate: f64,

    /// Length of a dropout in polls
    #[arg(long, default_value_t = 20)]
    dropout_polls: u32,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print stats every this many milliseconds of simulated time
    #[arg(long, default_value_t = 1000)]
    report_ms: u32,
}

/// Sine source with additive noise and scripted dropouts.
struct NoisySine {
    rng: StdRng,
    now_us: u32,
    amplitude: i32,
    period_us: u32,
    noise: i32,
    dropout_rate: f64,
    dropout_polls: u32,
    dropout_left: u32,
}

impl NoisySine {
    fn clean(&self) -> i32 {
        let phase = self.now_us as f64 / self.period_us as f64 * std::f64::consts::TAU;
        (phase.sin() * self.amplitude as f64) as i32
    }
}

impl Sensor for NoisySine {
    fn read(&mut self) -> Result<i32, SensorError> {
        if self.dropout_left == 0 && self.rng.gen_bool(self.dropout_rate) {
            self.dropout_left = self.dropout_polls;
        }
        if self.dropout_left > 0 {
            self.dropout_left -= 1;
            return Err(SensorError::NotReady);
        }
        let noise = self.rng.gen_range(-self.noise..=self.noise);
        Ok(self.clean().saturating_add(noise))
    }
}

#[derive(Default)]
struct Window {
    polls: u32,
    failures: u32,
    sq_err: f64,
}

impl Window {
    fn rms(sum: f64, n: u32) -> f64 {
        (sum / n.max(1) as f64).sqrt()
    }
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(fmt::layer().with_target(false))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging();

    let k = Coefficient::from_time_constant(args.interval_us, args.time_constant_us, args.k_log2_denom)
        .context("deriving coefficient")?;
    let ema = FixedPointEma::new(args.interval_us, k, args.max_iterations)
        .context("building filter")?;

    let sensor = NoisySine {
        rng: StdRng::seed_from_u64(args.seed),
        now_us: 0,
        amplitude: args.amplitude,
        period_us: args.period_ms.saturating_mul(1000).max(1),
        noise: args.noise.checked_abs().unwrap_or(i32::MAX),
        dropout_rate: args.dropout_rate.clamp(0.0, 1.0),
        dropout_polls: args.dropout_polls,
        dropout_left: 0,
    };
    let mut jitter = StdRng::seed_from_u64(args.seed.wrapping_add(1));
    // Start close to the top of the tick range so the counter wraps early
    let mut sampler = SamplingLoop::new(ManualClock::new(u32::MAX - 2_000_000), sensor, ema);

    println!(
        "Sensor loop demo: {} ms @ {} us (k = {}, staleness limit {} us)",
        args.duration_ms,
        args.interval_us,
        k,
        sampler.smoother().staleness_limit()
    );
    println!("Start: {}", Utc::now());
    info!(seed = args.seed, jitter_us = args.jitter_us, "simulation started");

    let duration_us = u64::from(args.duration_ms) * 1000;
    let report_us = u64::from(args.report_ms.max(1)) * 1000;
    let mut elapsed_us = 0u64;
    let mut next_report = report_us;
    let mut window = Window::default();
    let mut total_failures = 0u32;

    while elapsed_us < duration_us {
        let spread = args.jitter_us.min(args.interval_us.saturating_sub(1)) as i64;
        let offset = if spread > 0 { jitter.gen_range(-spread..=spread) } else { 0 };
        let advance = (args.interval_us as i64 + offset).max(1) as u32;
        elapsed_us += u64::from(advance);

        sampler.clock_mut().advance(advance);
        sampler.sensor_mut().now_us = (elapsed_us % u64::from(u32::MAX)) as u32;
        let clean = sampler.sensor_mut().clean();

        window.polls += 1;
        match sampler.poll() {
            Ok(filtered) => {
                let err = f64::from(filtered) - f64::from(clean);
                window.sq_err += err * err;
            }
            Err(e) => {
                window.failures += 1;
                total_failures += 1;
                debug!(tick = sampler.clock().now(), error = %e, "poll skipped");
            }
        }

        if elapsed_us >= next_report {
            let good = window.polls - window.failures;
            println!(
                "t={:>6} ms | tick={:>10} | filtered={:>7} | clean={:>7} | polls={:>5} fail={:>3} | rms err={:>7.1}",
                elapsed_us / 1000,
                sampler.clock().now(),
                sampler.filtered(),
                clean,
                window.polls,
                window.failures,
                Window::rms(window.sq_err, good),
            );
            window = Window::default();
            next_report += report_us;
        }
    }

    println!("End: {} ({} failed polls)", Utc::now(), total_failures);
    Ok(())
}
