use crate::Coefficient;

/// Widest possible distance between an `i32` sample and the accumulator,
/// in output units: `2^32 - 1`.
pub const INPUT_SPAN: u64 = (1u64 << 32) - 1;

/// Returns `true` if a coefficient with this numerator and exponent can push
/// the update product `diff × num` outside the signed 64-bit range.
///
/// `diff` spans at most `INPUT_SPAN · 2^log2_denom`, so the product is safe
/// when `num · INPUT_SPAN < 2^(63 - log2_denom)`, which in integer form is
/// `num · INPUT_SPAN >> (63 - log2_denom) == 0`.
pub fn would_overflow(num: u64, log2_denom: u32) -> bool {
    let Some(shift) = 63u32.checked_sub(log2_denom) else {
        return num != 0;
    };
    match num.checked_mul(INPUT_SPAN) {
        Some(product) => product >> shift != 0,
        None => true,
    }
}

/// Lifts a sample into the fixed-point domain: `value · 2^log2_denom`.
#[inline]
pub fn scale(value: i32, log2_denom: u32) -> i64 {
    i64::from(value).wrapping_shl(log2_denom)
}

/// Drops the fractional bits of an accumulator (arithmetic shift, rounds
/// toward negative infinity).
#[inline]
pub fn descale(scaled: i64, log2_denom: u32) -> i32 {
    (scaled >> log2_denom) as i32
}

/// One filter step: moves `filtered_scaled` toward `input` by the fraction
/// `coefficient`.
///
/// `filtered_scaled += ((input << d) - filtered_scaled) * k_num >> d`
#[inline]
pub fn step(filtered_scaled: i64, input: i32, coefficient: Coefficient) -> i64 {
    let shift = coefficient.shift();
    let input_num = scale(input, shift);
    let diff_num = input_num.wrapping_sub(filtered_scaled);
    let delta = diff_num.wrapping_mul(i64::from(coefficient.num())) >> shift;
    filtered_scaled.wrapping_add(delta)
}

/// Re-expresses an accumulator scaled by `2^from` as one scaled by `2^to`.
///
/// Exact when moving to a larger exponent; moving to a smaller one drops the
/// low bits, which never changes `descale(.., to)` of the result.
#[inline]
pub fn rescale(scaled: i64, from: u32, to: u32) -> i64 {
    if to >= from {
        scaled.wrapping_shl(to - from)
    } else {
        scaled >> (from - to)
    }
}
