
/*!
This module provides the [`Profile`] type, an immutable, row-stochastic T×(K+1)
probability matrix over an [`Alphabet`](crate::alphabet::Alphabet). A profile is one
model output for one read: row t is the distribution over the alphabet (gap included)
at time step t. Probabilities are stored in log space; label and prefix queries are
answered by the reference Forward Algorithm in [`crate::forward`].

# Example usage
```rust
use prefix_con::alphabet::Alphabet;
use prefix_con::profile::Profile;

let alphabet = Alphabet::new(b"AB", b'-').unwrap();
let profile = Profile::new(&[
    vec![0.8, 0.1, 0.1],
    vec![0.1, 0.3, 0.6]
], alphabet).unwrap();

// P("A") = P(A, gap) + P(gap, A) = 0.8*0.6 + 0.1*0.1
let log_p = profile.label_probability(b"A").unwrap();
assert!((log_p - 0.49_f64.ln()).abs() < 1e-12);
```
*/

use simple_error::bail;

use crate::alphabet::Alphabet;
use crate::forward::ForwardTable;

/// Default tolerance on |row sum - 1| when validating a profile.
pub const DEFAULT_ROW_SUM_TOLERANCE: f64 = 1e-6;

/// An immutable time-indexed probability matrix over an alphabet.
/// Construction validates the matrix; afterwards it is read-only.
#[derive(Clone, Debug)]
pub struct Profile {
    /// The alphabet defining the column order
    alphabet: Alphabet,
    /// Row-major log-probabilities, `time_steps` rows of `width` columns
    log_probs: Vec<f64>,
    /// The number of time steps, T
    time_steps: usize,
    /// The number of columns, K+1
    width: usize
}

impl Profile {
    /// Creates a new profile from linear-space probability rows using the default
    /// row-sum tolerance.
    /// # Arguments
    /// * `rows` - T rows, each with K+1 probabilities in alphabet column order
    /// * `alphabet` - the alphabet defining the columns
    /// # Errors
    /// * see `with_tolerance`
    pub fn new(rows: &[Vec<f64>], alphabet: Alphabet) -> Result<Profile, Box<dyn std::error::Error>> {
        Self::with_tolerance(rows, alphabet, DEFAULT_ROW_SUM_TOLERANCE)
    }

    /// Creates a new profile from linear-space probability rows.
    /// # Arguments
    /// * `rows` - T rows, each with K+1 probabilities in alphabet column order
    /// * `alphabet` - the alphabet defining the columns
    /// * `row_sum_tolerance` - the allowed deviation of each row sum from 1
    /// # Errors
    /// * if `rows` is empty (T=0 leaves label probabilities undefined)
    /// * if a row does not have exactly K+1 entries
    /// * if an entry is negative or non-finite
    /// * if a row sum deviates from 1 by more than the tolerance
    pub fn with_tolerance(rows: &[Vec<f64>], alphabet: Alphabet, row_sum_tolerance: f64) -> Result<Profile, Box<dyn std::error::Error>> {
        if rows.is_empty() {
            bail!("Profile requires at least one time step.");
        }

        let width = alphabet.width();
        let mut log_probs: Vec<f64> = Vec::with_capacity(rows.len() * width);
        for (t, row) in rows.iter().enumerate() {
            if row.len() != width {
                bail!("Profile row {} has {} entries, expected {} for this alphabet.", t, row.len(), width);
            }

            let mut row_sum = 0.0;
            for &p in row.iter() {
                if !p.is_finite() || p < 0.0 {
                    bail!("Profile row {} contains an invalid probability: {}", t, p);
                }
                row_sum += p;
            }
            if (row_sum - 1.0).abs() > row_sum_tolerance {
                bail!("Profile row {} sums to {}, expected 1.", t, row_sum);
            }

            // a zero probability becomes -inf here, which is a valid log-space value
            log_probs.extend(row.iter().map(|&p| p.ln()));
        }

        Ok(Profile {
            alphabet,
            log_probs,
            time_steps: rows.len(),
            width
        })
    }

    /// Returns the log-probability that the profile's underlying alignment collapses
    /// to exactly `label`, computed by the reference Forward Algorithm. A return of
    /// negative infinity means the label is impossible under this profile; it is a
    /// valid output, not an error.
    /// # Arguments
    /// * `label` - the gap-free label to score
    /// # Errors
    /// * if the label contains the gap or a symbol outside the alphabet
    pub fn label_probability(&self, label: &[u8]) -> Result<f64, Box<dyn std::error::Error>> {
        let indices = self.alphabet.label_indices(label)?;
        Ok(ForwardTable::new(self, &indices).label_probability())
    }

    /// Returns the log of the total probability mass of all labels that start with
    /// `prefix`, the prefix itself included. This is monotonically non-increasing as
    /// the prefix lengthens, which makes it an admissible search bound.
    /// # Arguments
    /// * `prefix` - the gap-free prefix to score
    /// # Errors
    /// * if the prefix contains the gap or a symbol outside the alphabet
    pub fn prefix_probability(&self, prefix: &[u8]) -> Result<f64, Box<dyn std::error::Error>> {
        let indices = self.alphabet.label_indices(prefix)?;
        Ok(ForwardTable::new(self, &indices).prefix_probability())
    }

    /// Returns the log-probability of column `col` at time `t`.
    pub(crate) fn log_prob(&self, t: usize, col: usize) -> f64 {
        self.log_probs[t * self.width + col]
    }

    /// Returns the log-probability of the gap at time `t`.
    pub(crate) fn gap_log_prob(&self, t: usize) -> f64 {
        self.log_prob(t, self.alphabet.gap_index())
    }

    // getters
    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }
}
