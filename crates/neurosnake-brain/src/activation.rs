//! Activation functions used by the network layers.

/// Inputs above this saturate to `+∞`.
const RELU_OVERFLOW: f64 = 1.023_999_999_999_999_9e3;
/// Inputs below this flush to zero.
const RELU_UNDERFLOW: f64 = -1.074e3;
/// Half-width of the band around zero that is linearised as `1 + x`.
const RELU_NEAR_ZERO: f64 = 1.0 / 268_435_456.0;

/// Rectified linear unit with explicit handling of non-finite and extreme inputs.
///
/// | input                    | output |
/// |--------------------------|--------|
/// | NaN, `+∞`                | input  |
/// | `−∞`                     | `0`    |
/// | `> 1023.9999…`           | `+∞`   |
/// | `< −1074`                | `0`    |
/// | `(−2⁻²⁸, 2⁻²⁸)`          | `1 + x`|
/// | otherwise                | `max(x, 0)` |
///
/// Trained brain files depend on this exact table, including the `1 + x`
/// band around zero.
#[must_use]
pub fn relu(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }
    if x > RELU_OVERFLOW {
        return f64::INFINITY;
    }
    if x < RELU_UNDERFLOW {
        return 0.0;
    }
    if -RELU_NEAR_ZERO < x && x < RELU_NEAR_ZERO {
        return 1.0 + x;
    }
    if x > 0.0 { x } else { 0.0 }
}

/// Normalised exponentials of `x`.
///
/// The maximum is subtracted before exponentiating, so any finite input yields
/// components in `[0, 1]` that sum to 1.
#[must_use]
pub fn softmax<const N: usize>(x: &[f64; N]) -> [f64; N] {
    let max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut out = x.map(|v| (v - max).exp());
    let sum: f64 = out.iter().sum();
    for v in &mut out {
        *v /= sum;
    }
    out
}
