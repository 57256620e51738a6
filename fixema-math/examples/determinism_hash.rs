use fixema_math::{step, Coefficient};
use sha2::{Digest, Sha256};

// Prints a digest of a canonical step trace so builds on different targets
// can be compared with a single string.
fn main() {
    let inputs: [i32; 12] = [
        0, 1, -1, 100, -100, 4096, -4096, 123_456, -123_456, 7, i32::MAX, i32::MIN,
    ];
    let coefficients = [
        Coefficient::UNITY,
        Coefficient::new(1, 1).expect("1/2"),
        Coefficient::new(3, 3).expect("3/8"),
        Coefficient::new(1, 4).expect("1/16").optimized(),
    ];

    let mut bytes = Vec::with_capacity(coefficients.len() * inputs.len() * 8);
    for k in coefficients {
        let mut state = 0i64;
        for &input in &inputs {
            state = step(state, input, k);
            bytes.extend_from_slice(&state.to_le_bytes());
        }
    }
    println!("FIXEMA_TRACE_HASH {}", hex::encode(Sha256::digest(&bytes)));
}
