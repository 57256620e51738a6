// End-to-end behavior of the filter through the umbrella crate: the
// reference examples, config loading, step response and coefficient changes.
use fixema::{Coefficient, CoefficientChange, EmaConfig, EmaError, FixedPointEma, Smoother};

fn from_json(json: &str) -> FixedPointEma {
    let config: EmaConfig = serde_json::from_str(json).expect("config json");
    FixedPointEma::from_config(&config).expect("valid config")
}

/// The four reference sequences, each on a fresh k = 1/2 (or k = 1) filter.
#[test]
fn test_reference_sequences() {
    let mut ema = from_json(r#"{ "interval": 1000, "k_num": 1, "k_log2_denom": 0, "max_iterations": 1 }"#);
    assert_eq!(ema.filtered(), 0);
    assert_eq!(ema.update(1, 1000), 1);

    let mut ema = from_json(r#"{ "interval": 1000, "k_num": 1, "k_log2_denom": 1, "max_iterations": 1 }"#);
    assert_eq!(ema.update(2, 1000), 1);
    assert_eq!(ema.update(11, 1000), 6);

    let mut ema = from_json(r#"{ "interval": 1000, "k_num": 1, "k_log2_denom": 1, "max_iterations": 1 }"#);
    assert_eq!(ema.update(1000, 500), 0);
    assert_eq!(ema.update(2, 500), 1);

    let mut ema = from_json(r#"{ "interval": 1000, "k_num": 1, "k_log2_denom": 1, "max_iterations": 1 }"#);
    assert_eq!(ema.update(-2, 1000), -1);
    assert_eq!(ema.update(-11, 1000), -6);
}

/// Optimizing before first use gives the same outputs for the reference
/// sequence.
#[test]
fn test_reference_sequence_optimized() {
    let mut ema = from_json(
        r#"{ "interval": 1000, "k_num": 1, "k_log2_denom": 1, "max_iterations": 1, "optimize": true }"#,
    );
    assert_eq!((ema.k_num(), ema.k_log2_denom()), (32768, 16));
    assert_eq!(ema.update(2, 1000), 1);
    assert_eq!(ema.update(11, 1000), 6);
}

#[test]
fn test_config_errors() {
    let config: EmaConfig = serde_json::from_str(r#"{ "interval": 0 }"#).unwrap();
    assert_eq!(FixedPointEma::from_config(&config), Err(EmaError::ZeroInterval));

    let config: EmaConfig = serde_json::from_str(r#"{ "k_num": -1 }"#).unwrap();
    assert!(matches!(
        FixedPointEma::from_config(&config),
        Err(EmaError::Coefficient(_))
    ));
}

/// Step response of k = 1/8 from 0 to ±1000.
///
/// Truncation toward negative infinity leaves the rising response one unit
/// short while the falling one lands exactly.
#[test]
fn test_step_response_one_eighth() {
    let mut ema = FixedPointEma::new(100, Coefficient::new(1, 3).unwrap(), 4).unwrap();
    let rising: Vec<i32> = (0..8).map(|_| ema.update(1000, 100)).collect();
    assert_eq!(rising, vec![125, 234, 330, 413, 487, 551, 607, 656]);
    for _ in 0..300 {
        ema.update(1000, 100);
    }
    assert_eq!(ema.filtered(), 999);
    assert_eq!(ema.filtered_scaled(), 7993);

    let mut ema = FixedPointEma::new(100, Coefficient::new(1, 3).unwrap(), 4).unwrap();
    let falling: Vec<i32> = (0..8).map(|_| ema.update(-1000, 100)).collect();
    assert_eq!(falling, vec![-125, -235, -331, -414, -488, -552, -608, -657]);
    for _ in 0..300 {
        ema.update(-1000, 100);
    }
    assert_eq!(ema.filtered(), -1000);
}

/// The optimized coefficient has the same transient but its dead band is
/// 2^14 times narrower.
#[test]
fn test_step_response_optimized_dead_band() {
    let k = Coefficient::new(1, 3).unwrap().optimized();
    assert_eq!((k.num(), k.log2_denom()), (16384, 17));

    let mut ema = FixedPointEma::new(100, k, 4).unwrap();
    let rising: Vec<i32> = (0..8).map(|_| ema.update(1000, 100)).collect();
    assert_eq!(rising, vec![125, 234, 330, 413, 487, 551, 607, 656]);
    for _ in 0..300 {
        ema.update(1000, 100);
    }
    assert_eq!(ema.filtered(), 999);
    // 7 / 2^17 of a unit short instead of 7 / 2^3
    assert_eq!((1000i64 << 17) - ema.filtered_scaled(), 7);
}

/// Catching up several intervals in one call matches polling once per interval.
#[test]
fn test_irregular_polling_matches_regular() {
    let mut regular = FixedPointEma::new(10, Coefficient::new(3, 4).unwrap(), 16).unwrap();
    let mut irregular = regular;

    // One sample per 40 ticks, polled every 10 vs. once per 40
    for sample in [100, -50, 7, 7, 2000, 0] {
        for _ in 0..4 {
            regular.update(sample, 10);
        }
        irregular.update(sample, 40);
        assert_eq!(regular, irregular);
    }
}

#[test]
fn test_runtime_coefficient_change_rescaled() {
    let config = EmaConfig::new(1000, 1, 1, 4)
        .with_coefficient_change(CoefficientChange::RescaleAccumulator);
    let mut ema = FixedPointEma::from_config(&config).unwrap();
    ema.update(1000, 1000);
    assert_eq!(ema.filtered(), 500);

    // Slow down to k = 1/4
    ema.set_coefficient(1, 2).unwrap();
    assert_eq!(ema.filtered_scaled(), 2000);
    assert_eq!(ema.update(1000, 1000), 625);
}

#[test]
fn test_trait_object_usage() {
    let filters: Vec<Box<dyn Smoother>> = vec![
        Box::new(FixedPointEma::new(1, Coefficient::UNITY, 1).unwrap()),
        Box::new(FixedPointEma::new(1, Coefficient::new(1, 1).unwrap(), 1).unwrap()),
    ];
    let outputs: Vec<i32> = filters
        .into_iter()
        .map(|mut f| f.update(64, 1))
        .collect();
    assert_eq!(outputs, vec![64, 32]);
}
