
/*!
This module provides the single-read [`PrefixSearch`], a best-first branch-and-bound
search over the label prefix tree that returns the globally most probable label under
a profile.

The frontier is a max-priority queue keyed by each prefix's probability bound (the
total mass of all its completions). Because the bound is monotonically non-increasing
along any branch, the search is exact: once the best bound in the frontier no longer
exceeds the best complete label found, no unexplored prefix can improve on it.

# Example usage
```rust
use prefix_con::alphabet::Alphabet;
use prefix_con::profile::Profile;
use prefix_con::prefix_search::PrefixSearch;

let alphabet = Alphabet::new(b"AB", b'-').unwrap();
let profile = Profile::new(&[
    vec![0.9, 0.05, 0.05],
    vec![0.05, 0.05, 0.9]
], alphabet).unwrap();

let decoded = PrefixSearch::new(&profile).search().unwrap();
assert_eq!(decoded.label(), b"A");
assert!((decoded.score() - profile.label_probability(b"A").unwrap()).abs() < 1e-9);
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
use crate::profile::Profile;

/// Priority is the prefix bound, then first-pushed-first-popped among equal bounds.
/// The push order is deterministic (children are generated in alphabet order), so the
/// whole search is deterministic and ties between equal-probability labels go to the
/// label discovered first.
type NodePriority = (LogScore, Reverse<u64>);

/// Contains a final decoding result
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded {
    /// The decoded label
    label: Vec<u8>,
    /// The label's log-probability score
    score: f64
}

impl Decoded {
    /// Constructor
    pub fn new(label: Vec<u8>, score: f64) -> Decoded {
        Decoded {
            label,
            score
        }
    }

    // Getters
    pub fn label(&self) -> &[u8] {
        &self.label
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// A frontier entry: a prefix plus its incremental forward vector.
/// The forward vector fully determines the scores, so identity (for the queue's
/// hashing) is just the prefix itself; each prefix is generated at most once.
#[derive(Clone, Debug)]
struct SearchNode {
    /// The prefix so far
    prefix: Vec<u8>,
    /// Per-time-step log-mass of paths collapsing exactly to this prefix
    forward: Vec<f64>
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix
    }
}

impl Eq for SearchNode {}

impl Hash for SearchNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prefix.hash(state);
    }
}

/// Exact best-first decoder for a single profile.
#[derive(Debug)]
pub struct PrefixSearch<'a> {
    /// The profile getting decoded
    profile: &'a Profile,
    /// The config for this search
    config: DecoderConfig
}

impl<'a> PrefixSearch<'a> {
    /// Creates a new search with the default config.
    /// # Arguments
    /// * `profile` - the profile to decode
    pub fn new(profile: &'a Profile) -> PrefixSearch<'a> {
        Self::with_config(profile, Default::default())
    }

    /// Creates a new search with an explicit config.
    /// # Arguments
    /// * `profile` - the profile to decode
    /// * `config` - search resource limits
    pub fn with_config(profile: &'a Profile, config: DecoderConfig) -> PrefixSearch<'a> {
        PrefixSearch {
            profile,
            config
        }
    }

    /// Runs the search, returning the label that maximizes `label_probability` under
    /// the profile together with that log-probability.
    /// # Errors
    /// * if the node budget or the frontier cap is exceeded
    pub fn search(&self) -> Result<Decoded, Box<dyn std::error::Error>> {
        let time_steps = self.profile.time_steps();
        let alphabet = self.profile.alphabet();
        let scorer = PrefixScorer::new(self.profile);

        let mut nodes_explored: usize = 0;
        let mut nodes_pruned: usize = 0;
        let mut peak_queue_size: usize = 0;
        let mut push_counter: u64 = 0;

        // the empty prefix bounds everything: its completions carry all the mass
        let mut pqueue: PriorityQueue<SearchNode, NodePriority> = PriorityQueue::new();
        let root = SearchNode {
            prefix: vec![],
            forward: scorer.root_forward()
        };
        pqueue.push(root, (LogScore(0.0), Reverse(push_counter)));

        let mut best_label: Vec<u8> = vec![];
        let mut best_score = LOG_ZERO;

        while let Some((node, (LogScore(bound), _order))) = pqueue.pop() {
            peak_queue_size = peak_queue_size.max(pqueue.len() + 1);

            // the frontier maximum can no longer beat the best complete label, and
            // every deeper bound only shrinks
            if bound <= best_score {
                break;
            }

            nodes_explored += 1;
            if nodes_explored > self.config.max_search_nodes {
                bail!("Prefix search exceeded the configured node budget.");
            }

            // "stop here" candidate: the mass that collapses to exactly this prefix
            let stop_score = node.forward[time_steps - 1];
            trace!("Pop: bound={} stop={} prefix={:?}", bound, stop_score, node.prefix);
            if stop_score > best_score {
                best_score = stop_score;
                best_label = node.prefix.clone();
            }

            for (col, &symbol) in alphabet.symbols().iter().enumerate() {
                let extension = scorer.extend(&node.forward, node.prefix.is_empty(), col);
                if extension.bound <= best_score {
                    // no completion of this child can strictly improve
                    nodes_pruned += 1;
                    continue;
                }

                if pqueue.len() >= self.config.max_queue_size {
                    bail!("Prefix search exceeded the configured frontier cap.");
                }

                let mut child_prefix = node.prefix.clone();
                child_prefix.push(symbol);
                trace!("\tPush: bound={} prefix={:?}", extension.bound, child_prefix);

                push_counter += 1;
                pqueue.push(
                    SearchNode {
                        prefix: child_prefix,
                        forward: extension.forward
                    },
                    (LogScore(extension.bound), Reverse(push_counter))
                );
            }
        }

        debug!("nodes_explored: {nodes_explored}");
        debug!("nodes_pruned: {nodes_pruned}");
        debug!("peak_queue_size: {peak_queue_size}");
        Ok(Decoded::new(best_label, best_score))
    }

    // getters
    pub fn profile(&self) -> &Profile {
        self.profile
    }
}
