//! Exponential Moving Average.
//!
//! k = 2/(span+1), seeded with the first value, then EMA[i] = V[i]*k + EMA[i-1]*(1-k).
//! No bias adjustment and no warmup: every entry of a non-empty input is defined.

pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let k = smoothing_factor(span);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = values[0];
    out.push(ema);

    for &v in &values[1..] {
        ema = v * k + ema * (1.0 - k);
        out.push(ema);
    }

    out
}

/// 2/(span+1). A span of 0 degenerates to k = 2, which is clamped to 1 (no smoothing).
pub fn smoothing_factor(span: usize) -> f64 {
    (2.0 / (span as f64 + 1.0)).min(1.0)
}
