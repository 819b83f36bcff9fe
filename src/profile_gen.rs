
/*!
Utilities for generating test profiles and for brute-force cross-checks.
The generator builds a hidden label, scatters its emissions over the time axis, and
produces a row-stochastic profile with the requested noise level. The enumeration
helper sums path probabilities exhaustively and is the oracle the property tests
compare the dynamic programs against; it is exponential in T, so keep T small.
*/

use rand::distributions::Uniform;
use rand::{Rng, SeedableRng};

use itertools::Itertools;
use rustc_hash::FxHashMap as HashMap;

use crate::alphabet::Alphabet;
use crate::profile::Profile;

/// Creates a test profile around a hidden label.
/// # Arguments
/// * `alphabet_size` - the number of emitted symbols, e.g. for DNA it's 4; symbols are 'A', 'B', ...
/// * `label_len` - the length of the hidden label
/// * `time_steps` - the number of profile rows, must be >= `label_len`
/// * `error_rate` - per-row mass assigned away from the true column, spread uniformly
/// * `seed` - RNG seed, so tests and benches are reproducible
pub fn generate_test(alphabet_size: u8, label_len: usize, time_steps: usize, error_rate: f64, seed: u64) -> (Vec<u8>, Profile) {
    assert!(alphabet_size >= 1 && alphabet_size <= 26);
    assert!(time_steps >= label_len);
    assert!((0.0..=1.0).contains(&error_rate));

    let symbols: Vec<u8> = (0..alphabet_size).map(|i| b'A' + i).collect();
    let alphabet = Alphabet::new(&symbols, b'-').unwrap();

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let symbol_distribution = Uniform::new(0, alphabet_size as usize);

    let label_cols: Vec<usize> = (0..label_len)
        .map(|_i| rng.sample(symbol_distribution))
        .collect();

    // pick the time steps where the label symbols are emitted, in order
    let mut emit_frames = rand::seq::index::sample(&mut rng, time_steps, label_len).into_vec();
    emit_frames.sort_unstable();

    let width = alphabet.width();
    let off_mass = error_rate / (width - 1) as f64;
    let mut next_emit = 0;
    let rows: Vec<Vec<f64>> = (0..time_steps)
        .map(|t| {
            let true_col = if next_emit < emit_frames.len() && emit_frames[next_emit] == t {
                let col = label_cols[next_emit];
                next_emit += 1;
                col
            } else {
                alphabet.gap_index()
            };

            (0..width)
                .map(|col| if col == true_col { 1.0 - error_rate } else { off_mass })
                .collect()
        })
        .collect();

    let label: Vec<u8> = label_cols.iter().map(|&col| symbols[col]).collect();
    let profile = Profile::new(&rows, alphabet).unwrap();
    (label, profile)
}

/// Enumerates every aligned path of the profile and sums linear-space probabilities
/// per collapsed label. Exact but exponential: (K+1)^T paths.
/// # Arguments
/// * `profile` - the profile to enumerate
pub fn enumerate_label_probabilities(profile: &Profile) -> HashMap<Vec<u8>, f64> {
    let width = profile.width();
    let gap_index = profile.alphabet().gap_index();
    let symbols = profile.alphabet().symbols();

    let mut totals: HashMap<Vec<u8>, f64> = Default::default();
    for path in (0..profile.time_steps()).map(|_t| 0..width).multi_cartesian_product() {
        let log_p: f64 = path.iter()
            .enumerate()
            .map(|(t, &col)| profile.log_prob(t, col))
            .sum();
        let p = log_p.exp();
        if p == 0.0 {
            continue;
        }

        let label: Vec<u8> = path.iter()
            .filter(|&&col| col != gap_index)
            .map(|&col| symbols[col])
            .collect();
        *totals.entry(label).or_insert(0.0) += p;
    }

    totals
}
