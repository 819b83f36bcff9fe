
/*!
# prefix_con
This library decodes per-position symbol-probability matrices ("profiles") into
discrete labels, and fuses two independent profiles of the same underlying sequence
into a single consensus call.

Key pieces:
* A log-space Forward Algorithm scoring labels and prefixes under a profile, in a
  reference form and an incremental form that are verified against each other
* An exact best-first prefix search (branch-and-bound with admissible prefix bounds)
* A greedy O(T) best-path approximation
* A pair extension: joint label scoring, the agreement probability Z via a Gamma
  dynamic program, and a consensus prefix search

Performance notes:
* The searches are exact and fast on sharp profiles; on near-uniform profiles the
  bounds are loose and worst-case cost is exponential, so the config exposes node and
  frontier budgets

# Example usage
```rust
use prefix_con::alphabet::Alphabet;
use prefix_con::greedy::greedy_decode;
use prefix_con::pair_prefix_search::PairPrefixSearch;
use prefix_con::prefix_search::PrefixSearch;
use prefix_con::profile::Profile;

let alphabet = Alphabet::new(b"AB", b'-').unwrap();
let profile = Profile::new(&[
    vec![0.9, 0.05, 0.05],
    vec![0.05, 0.05, 0.9]
], alphabet.clone()).unwrap();

// fast approximation: argmax columns with the gaps removed
assert_eq!(greedy_decode(&profile), b"A");

// exact search: the globally most probable label and its log-probability
let decoded = PrefixSearch::new(&profile).search().unwrap();
assert_eq!(decoded.label(), b"A");
assert!((decoded.score() - profile.label_probability(b"A").unwrap()).abs() < 1e-9);

// consensus of two reads of the same sequence
let profile2 = Profile::new(&[
    vec![0.8, 0.1, 0.1],
    vec![0.1, 0.1, 0.8]
], alphabet).unwrap();
let consensus = PairPrefixSearch::new(&profile, &profile2).unwrap().search().unwrap();
assert_eq!(consensus.label(), b"A");
```
*/

/// The shared alphabet: emitted symbols plus the reserved gap, and the collapse rule
pub mod alphabet;
/// Configuration for the prefix-search decoders
pub mod decoder_config;
/// The single-read Forward Algorithm, reference and incremental forms
pub mod forward;
/// The greedy best-path decoder
pub mod greedy;
/// Log-space numeric helpers
pub mod log_math;
/// Joint scoring for a profile pair and the agreement-probability Gamma Table
pub mod pair_forward;
/// Best-first consensus search over a profile pair
pub mod pair_prefix_search;
/// Best-first exact search for the most probable label of one profile
pub mod prefix_search;
/// The row-stochastic probability matrix over an alphabet
pub mod profile;
/// Utilities for generating test profiles and brute-force cross-checks
pub mod profile_gen;
