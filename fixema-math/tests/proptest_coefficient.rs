use fixema_math::{
    descale, rescale, scale, step, would_overflow, Coefficient, INPUT_SPAN, MAX_LOG2_DENOM,
};
use proptest::prelude::*;

/// Valid, non-amplifying coefficients (k <= 1).
fn valid_coefficient() -> impl Strategy<Value = Coefficient> {
    (0i8..=31).prop_flat_map(|log2_denom| {
        // largest num with num · (2^32 - 1) < 2^(63 - d), capped at k = 1
        let bound = ((1u64 << (63 - log2_denom)) - 1) / INPUT_SPAN;
        let max_num = bound.min(1u64 << log2_denom) as i32;
        (0..=max_num).prop_map(move |num| Coefficient::new(num, log2_denom).unwrap())
    })
}

// Property 1: Optimization preserves the ratio exactly
proptest! {
    #[test]
    fn prop_optimize_preserves_ratio(k in valid_coefficient()) {
        let opt = k.optimized();
        prop_assert!(opt.log2_denom() >= k.log2_denom());

        let grown = (opt.log2_denom() - k.log2_denom()) as u32;
        prop_assert_eq!(
            i64::from(opt.num()),
            i64::from(k.num()) << grown,
            "{} optimized to {} changed the ratio", k, opt
        );
    }
}

// Property 2: Optimized coefficients respect the bound and are maximal
proptest! {
    #[test]
    fn prop_optimize_is_maximal(k in valid_coefficient()) {
        prop_assume!(k.num() > 0);
        let opt = k.optimized();

        prop_assert!(!would_overflow(opt.num() as u64, opt.shift()));

        // One more doubling must trip the bound or the numerator guard
        let next_overflows = would_overflow(opt.num() as u64 * 2, opt.shift() + 1);
        let numerator_full = opt.num() > i32::MAX / 2;
        prop_assert!(
            next_overflows || numerator_full || opt.log2_denom() == MAX_LOG2_DENOM,
            "{} could still be doubled", opt
        );
    }
}

// Property 3: The overflow bound is monotone in both numerator and exponent
proptest! {
    #[test]
    fn prop_would_overflow_monotone(num in 0u64..(1u64 << 33), d in 0u32..64) {
        if would_overflow(num, d) {
            prop_assert!(would_overflow(num, d + 1));
            prop_assert!(would_overflow(num + 1, d));
        }
    }
}

// Property 4: A step never moves past the input for k <= 1
proptest! {
    #[test]
    fn prop_step_does_not_overshoot(
        k in valid_coefficient(),
        state in any::<i32>(),
        input in any::<i32>()
    ) {
        let shift = k.shift();
        let before = scale(state, shift);
        let target = scale(input, shift);
        let after = step(before, input, k);

        let (lo, hi) = if before <= target { (before, target) } else { (target, before) };
        prop_assert!(
            lo <= after && after <= hi,
            "step left [{}, {}]: {}", lo, hi, after
        );
    }
}

// Property 5: Rescaling up and back down is lossless
proptest! {
    #[test]
    fn prop_rescale_roundtrip(value in any::<i32>(), from in 0u32..=16, extra in 0u32..=16) {
        let scaled = scale(value, from);
        let to = from + extra;
        prop_assert_eq!(rescale(rescale(scaled, from, to), to, from), scaled);
        prop_assert_eq!(descale(rescale(scaled, from, to), to), value);
    }
}
