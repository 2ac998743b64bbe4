//! Input generation for demos.
//!
//! When no input is given on the command line we generate one: a frequency
//! table with a skewed distribution (so code lengths visibly differ) and a
//! message drawn from a model's alphabet.
//!
//! # Design
//!
//! Everything is driven by a `ChaCha8Rng` seeded from the configured seed,
//! so the same seed always reproduces the same run.

use prefix_code_core::{CodeModel, FrequencyTable, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Symbols random tables draw from.
const ALPHABET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', ' ', '.', ',', '!',
];

/// Offset so a message does not reuse the stream that built its table.
const MESSAGE_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Generate a frequency table over `symbols` distinct symbols.
///
/// `symbols` is clamped to `2..=30`. Frequencies are biased toward small
/// values so a few symbols dominate.
pub fn generate_frequencies(seed: u64, symbols: usize) -> Result<FrequencyTable> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let count = symbols.clamp(2, ALPHABET.len());

    let mut chosen: Vec<char> = ALPHABET.choose_multiple(&mut rng, count).copied().collect();
    chosen.sort_unstable();

    FrequencyTable::from_pairs(chosen.into_iter().map(|symbol| {
        let r: f64 = rng.gen();
        (symbol.to_string(), 1 + (r * r * 999.0) as u64)
    }))
}

/// Generate a plaintext of `len` symbols from a model's alphabet.
///
/// Symbols are drawn in proportion to their frequency when the model has
/// frequency data, uniformly otherwise. Multi-character codebook symbols
/// are skipped because plaintext is read one character per symbol.
pub fn generate_message(seed: u64, model: &CodeModel, len: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ MESSAGE_STREAM);
    let symbols: Vec<&str> = model
        .codebook()
        .iter()
        .map(|(symbol, _)| symbol)
        .filter(|symbol| symbol.chars().count() == 1)
        .collect();
    if symbols.is_empty() {
        return String::new();
    }

    let weights: Vec<u64> = symbols
        .iter()
        .map(|symbol| {
            model
                .frequencies()
                .and_then(|table| table.get(symbol))
                .unwrap_or(1)
        })
        .collect();

    match WeightedIndex::new(&weights) {
        Ok(dist) => (0..len).map(|_| symbols[dist.sample(&mut rng)]).collect(),
        Err(_) => (0..len)
            .map(|_| symbols[rng.gen_range(0..symbols.len())])
            .collect(),
    }
}
