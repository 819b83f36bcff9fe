
/*!
This module provides the [`PairPrefixSearch`], which finds the best consensus label
for two profiles believed to describe the same underlying sequence.

The search strategy is identical to the single-read
[`PrefixSearch`](crate::prefix_search::PrefixSearch), substituting the joint scoring
function: a node carries one incremental forward vector per profile, its stop score is
the sum of the two exact-collapse masses, and its bound is the sum of the two
single-read prefix bounds (admissible, since the joint mass of any completion is
dominated by the product of the per-read masses).

The returned score is **unnormalized**: it is proportional to the posterior with
constant log Z, so callers wanting a posterior subtract
[`GammaTable::log_agreement`](crate::pair_forward::GammaTable::log_agreement). The
argmax label is unaffected by the normalization.

# Example usage
```rust
use prefix_con::alphabet::Alphabet;
use prefix_con::profile::Profile;
use prefix_con::pair_prefix_search::PairPrefixSearch;

let rows = [
    vec![0.9, 0.05, 0.05],
    vec![0.05, 0.05, 0.9]
];
let profile1 = Profile::new(&rows, Alphabet::new(b"AB", b'-').unwrap()).unwrap();
let profile2 = Profile::new(&rows, Alphabet::new(b"AB", b'-').unwrap()).unwrap();

let consensus = PairPrefixSearch::new(&profile1, &profile2).unwrap().search().unwrap();
assert_eq!(consensus.label(), b"A");
```
*/

use log::{debug, trace};
use priority_queue::PriorityQueue;
use simple_error::bail;
use std::cmp::Reverse;
use std::hash::{Hash, Hasher};

use crate::decoder_config::DecoderConfig;
use crate::forward::PrefixScorer;
use crate::log_math::{LogScore, LOG_ZERO};
use crate::prefix_search::Decoded;
use crate::profile::Profile;

/// Joint prefix bound, then first-pushed-first-popped among equal bounds; the same
/// deterministic tie-break as the single-read search.
type NodePriority = (LogScore, Reverse<u64>);

/// A frontier entry: a prefix plus one incremental forward vector per profile.
#[derive(Clone, Debug)]
struct PairSearchNode {
    /// The consensus prefix so far
    prefix: Vec<u8>,
    /// Per-time-step exact-collapse mass under the first profile
    forward1: Vec<f64>,
    /// Per-time-step exact-collapse mass under the second profile
    forward2: Vec<f64>
}

impl PartialEq for PairSearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix
    }
}

impl Eq for PairSearchNode {}

impl Hash for PairSearchNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prefix.hash(state);
    }
}

/// Exact best-first consensus decoder for a profile pair.
#[derive(Debug)]
pub struct PairPrefixSearch<'a> {
    /// The first profile
    profile1: &'a Profile,
    /// The second profile; its length may differ from the first
    profile2: &'a Profile,
    /// The config for this search
    config: DecoderConfig
}

impl<'a> PairPrefixSearch<'a> {
    /// Creates a new pair search with the default config.
    /// # Arguments
    /// * `profile1` - the first profile
    /// * `profile2` - the second profile
    /// # Errors
    /// * if the profiles disagree on the alphabet
    pub fn new(profile1: &'a Profile, profile2: &'a Profile) -> Result<PairPrefixSearch<'a>, Box<dyn std::error::Error>> {
        Self::with_config(profile1, profile2, Default::default())
    }

    /// Creates a new pair search with an explicit config.
    /// # Arguments
    /// * `profile1` - the first profile
    /// * `profile2` - the second profile
    /// * `config` - search resource limits
    /// # Errors
    /// * if the profiles disagree on the alphabet
    pub fn with_config(profile1: &'a Profile, profile2: &'a Profile, config: DecoderConfig) -> Result<PairPrefixSearch<'a>, Box<dyn std::error::Error>> {
        if profile1.alphabet() != profile2.alphabet() {
            bail!("Pair operations require both profiles to share one alphabet.");
        }
        Ok(PairPrefixSearch {
            profile1,
            profile2,
            config
        })
    }

    /// Runs the search, returning the label that maximizes the unnormalized joint
    /// probability together with that score.
    /// # Errors
    /// * if the node budget or the frontier cap is exceeded
    pub fn search(&self) -> Result<Decoded, Box<dyn std::error::Error>> {
        let last1 = self.profile1.time_steps() - 1;
        let last2 = self.profile2.time_steps() - 1;
        let alphabet = self.profile1.alphabet();
        let scorer1 = PrefixScorer::new(self.profile1);
        let scorer2 = PrefixScorer::new(self.profile2);

        let mut nodes_explored: usize = 0;
        let mut nodes_pruned: usize = 0;
        let mut peak_queue_size: usize = 0;
        let mut push_counter: u64 = 0;

        let mut pqueue: PriorityQueue<PairSearchNode, NodePriority> = PriorityQueue::new();
        let root = PairSearchNode {
            prefix: vec![],
            forward1: scorer1.root_forward(),
            forward2: scorer2.root_forward()
        };
        pqueue.push(root, (LogScore(0.0), Reverse(push_counter)));

        let mut best_label: Vec<u8> = vec![];
        let mut best_score = LOG_ZERO;

        while let Some((node, (LogScore(bound), _order))) = pqueue.pop() {
            peak_queue_size = peak_queue_size.max(pqueue.len() + 1);

            if bound <= best_score {
                break;
            }

            nodes_explored += 1;
            if nodes_explored > self.config.max_search_nodes {
                bail!("Pair prefix search exceeded the configured node budget.");
            }

            let stop_score = node.forward1[last1] + node.forward2[last2];
            trace!("Pop: bound={} stop={} prefix={:?}", bound, stop_score, node.prefix);
            if stop_score > best_score {
                best_score = stop_score;
                best_label = node.prefix.clone();
            }

            for (col, &symbol) in alphabet.symbols().iter().enumerate() {
                let extension1 = scorer1.extend(&node.forward1, node.prefix.is_empty(), col);
                let extension2 = scorer2.extend(&node.forward2, node.prefix.is_empty(), col);
                let child_bound = extension1.bound + extension2.bound;
                if child_bound <= best_score {
                    nodes_pruned += 1;
                    continue;
                }

                if pqueue.len() >= self.config.max_queue_size {
                    bail!("Pair prefix search exceeded the configured frontier cap.");
                }

                let mut child_prefix = node.prefix.clone();
                child_prefix.push(symbol);
                trace!("\tPush: bound={} prefix={:?}", child_bound, child_prefix);

                push_counter += 1;
                pqueue.push(
                    PairSearchNode {
                        prefix: child_prefix,
                        forward1: extension1.forward,
                        forward2: extension2.forward
                    },
                    (LogScore(child_bound), Reverse(push_counter))
                );
            }
        }

        debug!("nodes_explored: {nodes_explored}");
        debug!("nodes_pruned: {nodes_pruned}");
        debug!("peak_queue_size: {peak_queue_size}");
        Ok(Decoded::new(best_label, best_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::alphabet::Alphabet;
    use crate::pair_forward::{pair_gamma, pair_label_probability};
    use crate::prefix_search::PrefixSearch;
    use crate::profile_gen::enumerate_label_probabilities;

    fn toy_profile(rows: &[Vec<f64>]) -> Profile {
        Profile::new(rows, Alphabet::new(b"AB", b'-').unwrap()).unwrap()
    }

    /// Finds the joint-argmax label and its linear-space joint mass by enumeration.
    fn brute_force_top_joint(profile1: &Profile, profile2: &Profile) -> (Vec<u8>, f64) {
        let totals1 = enumerate_label_probabilities(profile1);
        let totals2 = enumerate_label_probabilities(profile2);
        totals1.into_iter()
            .filter_map(|(label, p1)| totals2.get(&label).map(|p2| (label, p1 * p2)))
            .max_by(|(_l1, p1), (_l2, p2)| p1.total_cmp(p2))
            .unwrap()
    }

    fn assert_pair_search_matches_oracle(profile1: &Profile, profile2: &Profile) {
        let (expected_label, expected_joint) = brute_force_top_joint(profile1, profile2);
        let consensus = PairPrefixSearch::new(profile1, profile2).unwrap().search().unwrap();
        assert_eq!(consensus.label(), expected_label);
        assert_relative_eq!(consensus.score(), expected_joint.ln(), max_relative = 1e-9);

        // the reported score is the unnormalized joint probability of the label
        assert_relative_eq!(
            consensus.score(),
            pair_label_probability(profile1, profile2, consensus.label()).unwrap(),
            max_relative = 1e-9
        );
    }

    #[test_log::test]
    fn test_identical_diffuse_profiles() {
        let rows = [
            vec![0.1, 0.6, 0.3],
            vec![0.4, 0.2, 0.4],
            vec![0.4, 0.3, 0.3],
            vec![0.2, 0.8, 0.0]
        ];
        let profile1 = toy_profile(&rows);
        let profile2 = toy_profile(&rows);
        assert_pair_search_matches_oracle(&profile1, &profile2);

        // identical profiles must agree with the single-read decoder on the top label
        let single = PrefixSearch::new(&profile1).search().unwrap();
        let consensus = PairPrefixSearch::new(&profile1, &profile2).unwrap().search().unwrap();
        assert_eq!(consensus.label(), single.label());
    }

    #[test]
    fn test_distinct_profiles() {
        let profile1 = toy_profile(&[
            vec![0.8, 0.1, 0.1],
            vec![0.1, 0.3, 0.6],
            vec![0.7, 0.2, 0.1],
            vec![0.1, 0.1, 0.8]
        ]);
        let profile2 = toy_profile(&[
            vec![0.7, 0.2, 0.1],
            vec![0.2, 0.3, 0.5],
            vec![0.7, 0.2, 0.1],
            vec![0.05, 0.05, 0.9]
        ]);
        assert_pair_search_matches_oracle(&profile1, &profile2);
    }

    #[test]
    fn test_mismatched_lengths() {
        let profile1 = toy_profile(&[
            vec![0.8, 0.1, 0.1],
            vec![0.1, 0.3, 0.6],
            vec![0.7, 0.2, 0.1],
            vec![0.1, 0.1, 0.8]
        ]);
        let profile2 = toy_profile(&[
            vec![0.7, 0.2, 0.1],
            vec![0.2, 0.3, 0.5]
        ]);
        assert_pair_search_matches_oracle(&profile1, &profile2);
    }

    #[test]
    fn test_certain_profiles() {
        // both profiles force the path (gap, A, B)
        let rows = [
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0]
        ];
        let profile1 = toy_profile(&rows);
        let profile2 = toy_profile(&rows);
        let consensus = PairPrefixSearch::new(&profile1, &profile2).unwrap().search().unwrap();
        assert_eq!(consensus.label(), b"AB");
        assert_relative_eq!(consensus.score(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalized_posterior() {
        // subtracting log Z from the reported score yields the brute-force posterior
        let profile1 = toy_profile(&[
            vec![0.8, 0.1, 0.1],
            vec![0.1, 0.3, 0.6],
            vec![0.7, 0.2, 0.1],
            vec![0.1, 0.1, 0.8]
        ]);
        let profile2 = toy_profile(&[
            vec![0.7, 0.2, 0.1],
            vec![0.2, 0.3, 0.5]
        ]);

        let (_top, expected_joint) = brute_force_top_joint(&profile1, &profile2);
        let totals1 = enumerate_label_probabilities(&profile1);
        let totals2 = enumerate_label_probabilities(&profile2);
        let agreement: f64 = totals1.iter()
            .filter_map(|(label, p1)| totals2.get(label).map(|p2| p1 * p2))
            .sum();

        let consensus = PairPrefixSearch::new(&profile1, &profile2).unwrap().search().unwrap();
        let gamma = pair_gamma(&profile1, &profile2).unwrap();
        assert_relative_eq!(
            consensus.score() - gamma.log_agreement(),
            (expected_joint / agreement).ln(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_deterministic() {
        let rows = [
            vec![0.4, 0.4, 0.2],
            vec![0.4, 0.4, 0.2]
        ];
        let profile1 = toy_profile(&rows);
        let profile2 = toy_profile(&rows);
        let first = PairPrefixSearch::new(&profile1, &profile2).unwrap().search().unwrap();
        for _rerun in 0..5 {
            let rerun = PairPrefixSearch::new(&profile1, &profile2).unwrap().search().unwrap();
            assert_eq!(first, rerun);
        }
    }

    #[test]
    fn test_alphabet_mismatch() {
        let profile1 = toy_profile(&[vec![0.5, 0.2, 0.3]]);
        let profile2 = Profile::new(
            &[vec![0.5, 0.2, 0.3]],
            Alphabet::new(b"XY", b'-').unwrap()
        ).unwrap();
        assert!(PairPrefixSearch::new(&profile1, &profile2).is_err());
    }
}
