
/*!
Joint scoring for a pair of profiles believed to describe the same underlying label.

Under independence, the unnormalized joint log-mass of a label is simply the sum of
its single-read forward probabilities ([`pair_label_probability`]). The normalizing
constant is the agreement probability Z: the total mass, over every possible label,
that both profiles jointly support it. [`pair_gamma`] computes log Z directly with a
dynamic program over the product of the two time axes ([`GammaTable`]), without any
label enumeration; `logsumexp` over all labels of `pair_label_probability` must equal
it, which the tests use as a cross-check.
*/

use itertools::iproduct;
use simple_error::bail;

use crate::log_math::{log_add_exp, LOG_ZERO};
use crate::profile::Profile;

/// Log-mass of mutual agreement on a label continuation, per pair of suffix start
/// times (u, v). Cell (T1, T2) is the empty continuation (log 1); cell (0, 0) is the
/// full agreement probability, log Z.
#[derive(Debug)]
pub struct GammaTable {
    /// Row-major values, `rows` rows of `cols` columns
    values: Vec<f64>,
    /// T1 + 1
    rows: usize,
    /// T2 + 1
    cols: usize
}

impl GammaTable {
    /// Returns the agreement mass for the suffix pair starting at (u, v).
    pub fn at(&self, u: usize, v: usize) -> f64 {
        self.values[u * self.cols + v]
    }

    /// Returns log Z, the log of the total probability mass that the two profiles
    /// agree on any label at all. This is the designated root cell (0, 0).
    pub fn log_agreement(&self) -> f64 {
        self.at(0, 0)
    }

    // getters
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}

/// Verifies that two profiles can be scored jointly. The time axes may differ; the
/// alphabets may not.
fn check_pair(profile1: &Profile, profile2: &Profile) -> Result<(), Box<dyn std::error::Error>> {
    if profile1.alphabet() != profile2.alphabet() {
        bail!("Pair operations require both profiles to share one alphabet.");
    }
    Ok(())
}

/// Computes the Gamma Table for a profile pair.
///
/// The recursion works backwards over suffix pairs and splits on what happens first,
/// with read 1's gaps consumed eagerly so no case is counted twice:
/// either read 1's next step is a gap, or read 1 emits its next symbol, in which case
/// read 2 may burn gaps before matching that emission. The second case is the
/// auxiliary "emit" table, so everything stays additive in log space.
/// # Arguments
/// * `profile1` - the first profile
/// * `profile2` - the second profile; its length may differ from the first
/// # Errors
/// * if the profiles disagree on the alphabet
pub fn pair_gamma(profile1: &Profile, profile2: &Profile) -> Result<GammaTable, Box<dyn std::error::Error>> {
    check_pair(profile1, profile2)?;

    let t1 = profile1.time_steps();
    let t2 = profile2.time_steps();
    let rows = t1 + 1;
    let cols = t2 + 1;
    let symbol_count = profile1.alphabet().len();

    let mut gamma = vec![LOG_ZERO; rows * cols];
    let mut emit = vec![LOG_ZERO; rows * cols];

    // exhausted suffixes agree only on the empty continuation
    gamma[t1 * cols + t2] = 0.0;
    for u in (0..t1).rev() {
        gamma[u * cols + t2] = gamma[(u + 1) * cols + t2] + profile1.gap_log_prob(u);
    }
    for v in (0..t2).rev() {
        gamma[t1 * cols + v] = gamma[t1 * cols + v + 1] + profile2.gap_log_prob(v);
    }

    for (u, v) in iproduct!((0..t1).rev(), (0..t2).rev()) {
        // mass of both reads emitting the same symbol right now
        let mut match_mass = LOG_ZERO;
        for col in 0..symbol_count {
            match_mass = log_add_exp(match_mass, profile1.log_prob(u, col) + profile2.log_prob(v, col));
        }

        let emit_value = log_add_exp(
            profile2.gap_log_prob(v) + emit[u * cols + v + 1],
            match_mass + gamma[(u + 1) * cols + v + 1]
        );
        emit[u * cols + v] = emit_value;
        gamma[u * cols + v] = log_add_exp(
            profile1.gap_log_prob(u) + gamma[(u + 1) * cols + v],
            emit_value
        );
    }

    Ok(GammaTable {
        values: gamma,
        rows,
        cols
    })
}

/// Returns the unnormalized joint log-probability of a label under both profiles:
/// the sum of the two single-read forward probabilities. Dividing by Z (subtracting
/// [`GammaTable::log_agreement`]) yields the posterior; the argmax label is the same
/// either way.
/// # Arguments
/// * `profile1` - the first profile
/// * `profile2` - the second profile
/// * `label` - the gap-free label to score
/// # Errors
/// * if the profiles disagree on the alphabet
/// * if the label contains the gap or a symbol outside the alphabet
pub fn pair_label_probability(profile1: &Profile, profile2: &Profile, label: &[u8]) -> Result<f64, Box<dyn std::error::Error>> {
    check_pair(profile1, profile2)?;
    Ok(profile1.label_probability(label)? + profile2.label_probability(label)?)
}
