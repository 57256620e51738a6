use anyhow::{Context, Result};
use clap::Parser;
use fixema_core::{CoefficientChange, EmaConfig, FixedPointEma};
use std::{fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Step response of the fixed-point EMA, printed one row per interval.
///
/// Optionally switches coefficient halfway through to show the effect of the
/// accumulator policy.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON filter config; overrides the coefficient flags below
    #[arg(long)]
    config: Option<PathBuf>,

    /// Nominal sample interval in ticks
    #[arg(long, default_value_t = 1000)]
    interval: u32,

    /// Coefficient numerator
    #[arg(long, default_value_t = 1)]
    k_num: i32,

    /// Coefficient denominator exponent
    #[arg(long, default_value_t = 3)]
    k_log2_denom: i8,

    /// Catch-up steps allowed per update before snapping
    #[arg(long, default_value_t = 16)]
    max_iterations: u32,

    /// Maximize coefficient precision before filtering
    #[arg(long, default_value_t = false)]
    optimize: bool,

    /// Rescale the accumulator on coefficient changes
    #[arg(long, default_value_t = false)]
    rescale: bool,

    /// Number of updates to run
    #[arg(long, default_value_t = 40)]
    steps: usize,

    /// Level before the step
    #[arg(long, default_value_t = 0)]
    from: i32,

    /// Level after the step
    #[arg(long, default_value_t = 1000)]
    to: i32,

    /// Ticks between updates (defaults to the interval)
    #[arg(long)]
    dt: Option<u32>,

    /// Coefficient "num/log2_denom" to switch to after half the steps
    #[arg(long)]
    switch_to: Option<String>,
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

fn load_config(args: &Args) -> Result<EmaConfig> {
    if let Some(path) = &args.config {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        return serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()));
    }
    let policy = if args.rescale {
        CoefficientChange::RescaleAccumulator
    } else {
        CoefficientChange::KeepAccumulator
    };
    Ok(
        EmaConfig::new(args.interval, args.k_num, args.k_log2_denom, args.max_iterations)
            .with_optimize(args.optimize)
            .with_coefficient_change(policy),
    )
}

fn parse_coefficient(raw: &str) -> Result<(i32, i8)> {
    let (num, denom) = raw
        .split_once('/')
        .with_context(|| format!("expected num/log2_denom, got {raw:?}"))?;
    Ok((
        num.trim().parse().context("coefficient numerator")?,
        denom.trim().parse().context("coefficient exponent")?,
    ))
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging();

    let config = load_config(&args)?;
    let mut ema = FixedPointEma::from_config(&config).context("building filter")?;
    let switch = args.switch_to.as_deref().map(parse_coefficient).transpose()?;
    let dt = args.dt.unwrap_or(ema.interval());

    info!(
        k = %ema.coefficient(),
        interval = ema.interval(),
        max_iterations = ema.max_iterations(),
        policy = ?ema.coefficient_change(),
        "filter ready"
    );

    ema.reset_to(args.from);
    println!("=== Step response {} -> {} ===\n", args.from, args.to);
    println!("{:>6} {:>12} {:>24} {:>10}", "step", "output", "accumulator", "error");

    for step in 0..args.steps {
        if step == args.steps / 2 {
            if let Some((num, log2_denom)) = switch {
                ema.set_coefficient(num, log2_denom)
                    .context("switching coefficient")?;
                info!(k = %ema.coefficient(), filtered = ema.filtered(), "coefficient switched");
            }
        }
        let out = ema.update(args.to, dt);
        println!(
            "{:>6} {:>12} {:>24} {:>10}",
            step + 1,
            out,
            ema.filtered_scaled(),
            args.to as i64 - out as i64
        );
    }

    println!(
        "\nSettled at {} (scaled {} with k = {})",
        ema.filtered(),
        ema.filtered_scaled(),
        ema.coefficient()
    );
    Ok(())
}
