
/*!
The greedy best-path decoder: an O(T) approximation that takes the argmax column at
every time step and strips the gaps. It carries no probability guarantee and may
disagree with the exact prefix search when the distribution is diffuse.

# Example usage
```rust
use prefix_con::alphabet::Alphabet;
use prefix_con::profile::Profile;
use prefix_con::greedy::greedy_decode;

let alphabet = Alphabet::new(b"AB", b'-').unwrap();
let profile = Profile::new(&[
    vec![0.5, 0.1, 0.4],
    vec![0.5, 0.1, 0.4],
    vec![0.5, 0.1, 0.4],
    vec![0.0, 0.1, 0.9]
], alphabet).unwrap();

assert_eq!(greedy_decode(&profile), b"AAA");
```
*/

use crate::profile::Profile;

/// Decodes a profile by per-time-step argmax, then removes the gaps.
/// Ties go to the lowest column index, so the result is deterministic.
/// # Arguments
/// * `profile` - the profile to decode
pub fn greedy_decode(profile: &Profile) -> Vec<u8> {
    let alphabet = profile.alphabet();
    let raw_path: Vec<u8> = (0..profile.time_steps())
        .map(|t| {
            let mut best_col = 0;
            for col in 1..profile.width() {
                if profile.log_prob(t, col) > profile.log_prob(t, best_col) {
                    best_col = col;
                }
            }
            if best_col == alphabet.gap_index() {
                alphabet.gap()
            } else {
                alphabet.symbols()[best_col]
            }
        })
        .collect();

    alphabet.remove_gaps(&raw_path)
}
