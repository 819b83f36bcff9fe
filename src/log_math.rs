
/*!
Log-space numeric helpers shared by the forward algorithms and the searches.
All probabilities in this crate are carried as natural-log values; a probability of
zero is represented by [`LOG_ZERO`] (negative infinity), which is the additive
identity under [`log_add_exp`].
*/

/// Log-space representation of probability zero.
pub const LOG_ZERO: f64 = f64::NEG_INFINITY;

/// Computes `ln(exp(x1) + exp(x2))` without leaving log space.
/// The smaller operand is exponentiated relative to the larger one, so the result
/// never overflows and degrades gracefully when one side is [`LOG_ZERO`].
pub fn log_add_exp(x1: f64, x2: f64) -> f64 {
    let (big, small) = if x1 >= x2 { (x1, x2) } else { (x2, x1) };
    if small == LOG_ZERO {
        // adding probability zero is a no-op, and this also covers big == LOG_ZERO
        big
    } else {
        big + (small - big).exp().ln_1p()
    }
}

/// Computes `ln(sum(exp(values)))` by subtracting the running maximum before
/// exponentiating, which keeps long accumulations (T in the hundreds) stable.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().cloned().fold(LOG_ZERO, f64::max);
    if max == LOG_ZERO {
        return LOG_ZERO;
    }
    let sum: f64 = values.iter().map(|&v| (v - max).exp()).sum();
    max + sum.ln()
}

/// Total-order wrapper for a log-probability so it can be used as a priority.
/// Log-probabilities produced by this crate are never NaN, so `total_cmp` agrees
/// with the usual ordering on the values we see (including negative infinity).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogScore(pub f64);

impl Eq for LogScore {}

impl PartialOrd for LogScore {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogScore {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}
