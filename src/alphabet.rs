
/*!
This module provides the shared [`Alphabet`] type: a fixed, ordered set of emitted
symbols plus one reserved gap symbol. The alphabet defines the column order of every
probability matrix (symbols first, gap in the final column) and the symbol vocabulary
of every decoded label.

# Example usage
```rust
use prefix_con::alphabet::Alphabet;

let alphabet = Alphabet::new(b"ACGT", b'-').unwrap();
assert_eq!(alphabet.len(), 4);
assert_eq!(alphabet.width(), 5);
assert_eq!(alphabet.remove_gaps(b"-AC--GA-"), b"ACGA");
```
*/

use rustc_hash::FxHashMap as HashMap;
use simple_error::bail;

/// Ordered set of K emitted symbols plus one reserved gap symbol.
/// Probability matrix columns follow the symbol order, with the gap as column K.
/// The gap is never a valid label character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    /// The emitted (non-gap) symbols, in column order
    symbols: Vec<u8>,
    /// The reserved gap symbol
    gap: u8,
    /// Reverse lookup from symbol to column index
    index_lookup: HashMap<u8, usize>
}

impl Alphabet {
    /// Creates a new alphabet and performs sanity checks.
    /// # Arguments
    /// * `symbols` - the emitted symbols, in the column order of the profiles
    /// * `gap` - the reserved gap symbol
    /// # Errors
    /// * if `symbols` is empty
    /// * if `symbols` contains a duplicate
    /// * if `gap` collides with one of the symbols
    pub fn new(symbols: &[u8], gap: u8) -> Result<Alphabet, Box<dyn std::error::Error>> {
        if symbols.is_empty() {
            bail!("Alphabet requires at least one emitted symbol.");
        }

        let mut index_lookup: HashMap<u8, usize> = Default::default();
        for (index, &symbol) in symbols.iter().enumerate() {
            if symbol == gap {
                bail!("Gap symbol collides with an emitted symbol.");
            }
            if index_lookup.insert(symbol, index).is_some() {
                bail!("Alphabet contains a duplicate symbol.");
            }
        }

        Ok(Alphabet {
            symbols: symbols.to_vec(),
            gap,
            index_lookup
        })
    }

    /// Returns the number of emitted symbols, K.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the total column count of a conforming profile, K+1.
    pub fn width(&self) -> usize {
        self.symbols.len() + 1
    }

    /// Returns the column index of the gap, which is always the final column.
    pub fn gap_index(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the column index for an emitted symbol, or None for anything else
    /// (including the gap).
    /// # Arguments
    /// * `symbol` - the symbol to look up
    pub fn symbol_index(&self, symbol: u8) -> Option<usize> {
        self.index_lookup.get(&symbol).copied()
    }

    /// Strips every gap symbol from a raw aligned sequence, yielding a label.
    /// This is idempotent: applying it to a label returns the label unchanged.
    /// # Arguments
    /// * `raw` - the raw symbol sequence, possibly containing gaps
    pub fn remove_gaps(&self, raw: &[u8]) -> Vec<u8> {
        raw.iter()
            .filter(|&&symbol| symbol != self.gap)
            .cloned()
            .collect()
    }

    /// Converts a label into profile column indices, rejecting usage errors.
    /// # Arguments
    /// * `label` - the label to convert
    /// # Errors
    /// * if the label contains the gap symbol
    /// * if the label contains a symbol outside the alphabet
    pub fn label_indices(&self, label: &[u8]) -> Result<Vec<usize>, Box<dyn std::error::Error>> {
        label.iter()
            .map(|&symbol| {
                if symbol == self.gap {
                    bail!("Label contains the gap symbol.");
                }
                match self.symbol_index(symbol) {
                    Some(index) => Ok(index),
                    None => bail!("Label contains a symbol outside the alphabet.")
                }
            })
            .collect()
    }

    // getters
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn gap(&self) -> u8 {
        self.gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        let alphabet = Alphabet::new(b"AB", b'-').unwrap();
        assert_eq!(alphabet.len(), 2);
        assert_eq!(alphabet.width(), 3);
        assert_eq!(alphabet.gap_index(), 2);
        assert_eq!(alphabet.symbol_index(b'A'), Some(0));
        assert_eq!(alphabet.symbol_index(b'B'), Some(1));
        assert_eq!(alphabet.symbol_index(b'-'), None);
        assert_eq!(alphabet.symbol_index(b'C'), None);
    }

    #[test]
    fn test_construction_errors() {
        assert!(Alphabet::new(b"", b'-').is_err());
        assert!(Alphabet::new(b"AAB", b'-').is_err());
        assert!(Alphabet::new(b"AB", b'B').is_err());
    }

    #[test]
    fn test_remove_gaps() {
        let alphabet = Alphabet::new(b"AB", b'-').unwrap();
        assert_eq!(alphabet.remove_gaps(b"A-B"), b"AB");
        assert_eq!(alphabet.remove_gaps(b"-AA--B"), b"AAB");
        assert_eq!(alphabet.remove_gaps(b"---"), b"");
        assert_eq!(alphabet.remove_gaps(b""), b"");
    }

    #[test]
    fn test_remove_gaps_idempotent() {
        let alphabet = Alphabet::new(b"AB", b'-').unwrap();
        let once = alphabet.remove_gaps(b"-A-BA--B");
        let twice = alphabet.remove_gaps(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_label_indices() {
        let alphabet = Alphabet::new(b"AB", b'-').unwrap();
        assert_eq!(alphabet.label_indices(b"ABBA").unwrap(), vec![0, 1, 1, 0]);
        assert_eq!(alphabet.label_indices(b"").unwrap(), Vec::<usize>::new());

        // gaps and foreign symbols are usage errors
        assert!(alphabet.label_indices(b"A-B").is_err());
        assert!(alphabet.label_indices(b"AXB").is_err());
    }
}
