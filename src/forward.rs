
/*!
The single-read Forward Algorithm, in two interchangeable forms:

* [`ForwardTable`] - the readable reference implementation. For each query it fills
  the full (2|label|+1) × T log-space table over the extended label (the label with a
  gap slot before, between, and after every symbol) and answers label and prefix
  probability queries from it.
* [`PrefixScorer`] - the optimized incremental form used by the prefix searches. A
  search node keeps one length-T vector for its prefix; extending the prefix by one
  symbol is O(T) instead of re-running the full table.

The two are verified equal by property tests rather than trusting either one.

The collapse model: an aligned path assigns each time step one alphabet column, and
its label is the path with gaps removed. Every non-gap emission is a distinct label
symbol, so a symbol state in the extended label has no self loop (staying on the same
symbol would lengthen the label) and the skip from the previous symbol state is always
permitted, repeats included.
*/

use crate::log_math::{log_add_exp, log_sum_exp, LOG_ZERO};
use crate::profile::Profile;

/// Reference forward dynamic program for one (profile, label) query.
/// Row s of the table is a state of the extended label: even rows are gap slots, odd
/// rows are label symbols. Cell (s, t) holds the log-mass of paths through the first
/// t+1 time steps that end in state s.
#[derive(Debug)]
pub struct ForwardTable {
    /// Row-major values, `states` rows of `time_steps` columns
    values: Vec<f64>,
    /// The number of extended-label states, 2|label|+1
    states: usize,
    /// The number of time steps, T
    time_steps: usize
}

impl ForwardTable {
    /// Fills the forward table for a label under a profile.
    /// # Arguments
    /// * `profile` - the profile to score against
    /// * `label` - the label, as profile column indices (no gaps)
    pub fn new(profile: &Profile, label: &[usize]) -> ForwardTable {
        let time_steps = profile.time_steps();
        let states = 2 * label.len() + 1;
        let mut values = vec![LOG_ZERO; states * time_steps];

        // t=0: the path is either the leading gap or the first symbol
        values[0] = profile.gap_log_prob(0);
        if !label.is_empty() {
            values[time_steps] = profile.log_prob(0, label[0]);
        }

        for t in 1..time_steps {
            for s in 0..states {
                let value = if s % 2 == 0 {
                    // gap slot: stay in the gap or close out the preceding symbol
                    let stay = values[s * time_steps + t - 1];
                    let from_symbol = if s > 0 {
                        values[(s - 1) * time_steps + t - 1]
                    } else {
                        LOG_ZERO
                    };
                    log_add_exp(stay, from_symbol) + profile.gap_log_prob(t)
                } else {
                    // symbol state: enter from the gap slot before it, or skip that
                    // gap directly from the previous symbol; no self loop
                    let from_gap = values[(s - 1) * time_steps + t - 1];
                    let from_skip = if s >= 3 {
                        values[(s - 2) * time_steps + t - 1]
                    } else {
                        LOG_ZERO
                    };
                    log_add_exp(from_gap, from_skip) + profile.log_prob(t, label[(s - 1) / 2])
                };
                values[s * time_steps + t] = value;
            }
        }

        ForwardTable {
            values,
            states,
            time_steps
        }
    }

    /// Returns the table value for extended-label state `s` at time `t`.
    pub fn at(&self, s: usize, t: usize) -> f64 {
        self.values[s * self.time_steps + t]
    }

    /// Returns the log-probability that the full path collapses to exactly the label:
    /// the final column mass of the last two states (on the final symbol, or in the
    /// trailing gap).
    pub fn label_probability(&self) -> f64 {
        let last_t = self.time_steps - 1;
        if self.states == 1 {
            // empty label: all-gap path
            self.at(0, last_t)
        } else {
            log_add_exp(self.at(self.states - 1, last_t), self.at(self.states - 2, last_t))
        }
    }

    /// Returns the log of the total mass of all labels extending this one (itself
    /// included). Since symbol states have no self loop, row M-2 at time t is exactly
    /// the mass that completes the label at t, and any continuation of such a path
    /// keeps the label as a prefix, so the row sums to the prefix probability.
    pub fn prefix_probability(&self) -> f64 {
        if self.states == 1 {
            // every label extends the empty prefix
            0.0
        } else {
            let row_start = (self.states - 2) * self.time_steps;
            log_sum_exp(&self.values[row_start..row_start + self.time_steps])
        }
    }
}

/// The result of extending a search prefix by one symbol.
#[derive(Debug)]
pub struct Extension {
    /// Per-time-step log-mass of paths collapsing exactly to the extended prefix
    pub forward: Vec<f64>,
    /// Admissible upper bound: log total mass of all labels extending the prefix
    pub bound: f64
}

/// Incremental forward scorer for best-first prefix search.
/// Each node's state is the vector `f[t] = log P(path through time t collapses
/// exactly to the node's prefix)`; the node's own label probability is `f[T-1]`.
#[derive(Clone, Debug)]
pub struct PrefixScorer<'a> {
    profile: &'a Profile
}

impl<'a> PrefixScorer<'a> {
    pub fn new(profile: &'a Profile) -> PrefixScorer<'a> {
        PrefixScorer { profile }
    }

    /// Returns the forward vector for the empty prefix: cumulative gap mass.
    pub fn root_forward(&self) -> Vec<f64> {
        let mut gap_sum = 0.0;
        (0..self.profile.time_steps())
            .map(|t| {
                gap_sum += self.profile.gap_log_prob(t);
                gap_sum
            })
            .collect()
    }

    /// Extends a prefix by one symbol, producing the child's forward vector and its
    /// admissible prefix bound.
    /// # Arguments
    /// * `parent_forward` - the parent node's forward vector
    /// * `parent_is_root` - true if the parent is the empty prefix
    /// * `symbol_col` - the profile column index of the appended symbol
    pub fn extend(&self, parent_forward: &[f64], parent_is_root: bool, symbol_col: usize) -> Extension {
        let time_steps = self.profile.time_steps();

        // entry[t] is the mass that completes the child prefix exactly at time t:
        // the parent prefix by t-1, then a fresh emission of the symbol
        let mut entry = vec![LOG_ZERO; time_steps];
        if parent_is_root {
            entry[0] = self.profile.log_prob(0, symbol_col);
        }
        for t in 1..time_steps {
            entry[t] = parent_forward[t - 1] + self.profile.log_prob(t, symbol_col);
        }

        // any continuation of a completing path keeps the prefix, so the entry mass
        // alone bounds every completion of this prefix
        let bound = log_sum_exp(&entry);

        // the exact-collapse mass additionally requires trailing gaps
        let mut forward = vec![LOG_ZERO; time_steps];
        forward[0] = entry[0];
        for t in 1..time_steps {
            forward[t] = log_add_exp(entry[t], forward[t - 1] + self.profile.gap_log_prob(t));
        }

        Extension { forward, bound }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::alphabet::Alphabet;
    use crate::profile_gen::{enumerate_label_probabilities, generate_test};

    fn toy_alphabet() -> Alphabet {
        Alphabet::new(b"AB", b'-').unwrap()
    }

    fn toy_profile() -> Profile {
        Profile::new(&[
            vec![0.8, 0.1, 0.1],
            vec![0.1, 0.3, 0.6],
            vec![0.7, 0.2, 0.1],
            vec![0.1, 0.1, 0.8]
        ], toy_alphabet()).unwrap()
    }

    /// Sums the enumerated mass of every label starting with `prefix`.
    fn brute_force_prefix_probability(profile: &Profile, prefix: &[u8]) -> f64 {
        enumerate_label_probabilities(profile).iter()
            .filter(|(label, _p)| label.starts_with(prefix))
            .map(|(_label, p)| p)
            .sum()
    }

    #[test]
    fn test_label_probability_vs_enumeration() {
        let profile = toy_profile();
        let enumerated = enumerate_label_probabilities(&profile);
        for label in [b"AAAA".to_vec(), b"ABBA".to_vec(), b"ABA".to_vec(), b"AA".to_vec(),
                      b"BB".to_vec(), b"A".to_vec(), b"B".to_vec(), b"".to_vec()] {
            let expected = enumerated.get(&label).cloned().unwrap_or(0.0).ln();
            let actual = profile.label_probability(&label).unwrap();
            if expected == LOG_ZERO {
                assert_eq!(actual, LOG_ZERO, "label {:?}", label);
            } else {
                assert_relative_eq!(actual, expected, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_prefix_probability_vs_enumeration() {
        let profile = toy_profile();
        for prefix in [b"".to_vec(), b"A".to_vec(), b"B".to_vec(), b"AB".to_vec(),
                       b"BA".to_vec(), b"AAB".to_vec(), b"ABBA".to_vec()] {
            let expected = brute_force_prefix_probability(&profile, &prefix).ln();
            let actual = profile.prefix_probability(&prefix).unwrap();
            assert_relative_eq!(actual, expected, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_prefix_probability_monotonic() {
        let (_label, profile) = generate_test(2, 3, 6, 0.3, 42);
        let chains = [b"AABA".to_vec(), b"BBBB".to_vec(), b"ABAB".to_vec()];
        for chain in chains.iter() {
            let mut previous = profile.prefix_probability(b"").unwrap();
            assert_eq!(previous, 0.0);
            for end in 1..=chain.len() {
                let current = profile.prefix_probability(&chain[..end]).unwrap();
                assert!(current <= previous, "prefix bound grew on {:?}", &chain[..end]);
                previous = current;
            }
        }
    }

    #[test]
    fn test_scorer_matches_reference() {
        // walk several prefixes with the incremental scorer and require exact
        // agreement with the reference table at every step
        let profiles = [
            toy_profile(),
            generate_test(2, 4, 6, 0.25, 7).1,
            generate_test(2, 2, 5, 0.4, 11).1
        ];
        for profile in profiles.iter() {
            let scorer = PrefixScorer::new(profile);
            for label in [b"AAAA".to_vec(), b"ABBA".to_vec(), b"BABB".to_vec(), b"BB".to_vec()] {
                let mut forward = scorer.root_forward();
                let mut indices = vec![];
                for (depth, &symbol) in label.iter().enumerate() {
                    let col = profile.alphabet().symbol_index(symbol).unwrap();
                    let extension = scorer.extend(&forward, depth == 0, col);
                    indices.push(col);

                    let table = ForwardTable::new(profile, &indices);
                    let time_steps = profile.time_steps();
                    assert_relative_eq!(
                        extension.forward[time_steps - 1],
                        table.label_probability(),
                        max_relative = 1e-12
                    );
                    assert_relative_eq!(
                        extension.bound,
                        table.prefix_probability(),
                        max_relative = 1e-12
                    );
                    forward = extension.forward;
                }
            }
        }
    }

    #[test]
    fn test_root_forward_is_empty_label() {
        let profile = toy_profile();
        let scorer = PrefixScorer::new(&profile);
        let root = scorer.root_forward();
        assert_relative_eq!(
            root[profile.time_steps() - 1],
            profile.label_probability(b"").unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_degenerate_single_step_table() {
        let profile = Profile::new(&[vec![0.25, 0.35, 0.4]], toy_alphabet()).unwrap();
        let table = ForwardTable::new(&profile, &[1]);
        // T=1 leaves exactly two reachable cells
        assert_relative_eq!(table.at(1, 0), 0.35_f64.ln(), max_relative = 1e-12);
        assert_relative_eq!(table.at(0, 0), 0.4_f64.ln(), max_relative = 1e-12);
        assert_eq!(table.at(2, 0), LOG_ZERO);
        assert_relative_eq!(table.label_probability(), 0.35_f64.ln(), max_relative = 1e-12);
    }
}
