//! Trailing rolling mean.

/// Trailing mean over `window` values ending at each position.
///
/// Positions with fewer than `window` values available (the first
/// `window - 1`) are `None`. Each window is summed directly, so results do
/// not accumulate drift over long series. A zero window yields all `None`.
pub fn trailing_means(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    for (offset, slice) in values.windows(window).enumerate() {
        out[offset + window - 1] = Some(mean(slice));
    }
    out
}

/// Mean of the last `n` values (or all of them when fewer exist).
pub fn tail_mean(values: &[f64], n: usize) -> Option<f64> {
    let start = values.len().saturating_sub(n);
    let tail = &values[start..];
    if tail.is_empty() { None } else { Some(mean(tail)) }
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
