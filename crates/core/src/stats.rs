//! Code statistics.
//!
//! Summarizes how good a code is:
//! - Codeword lengths (shortest, longest, mean)
//! - Kraft sum (1.0 exactly when the code is complete)
//! - With frequencies: weighted length, entropy, efficiency and the saving
//!   over a fixed-width code
//!
//! # Design
//!
//! Statistics are computed once from a model and never updated. Every field
//! is public so hosts can render them however they like; `print_summary` and
//! `export_text` cover the common cases.

use crate::huffman::CodeModel;

/// Frequency-weighted figures, available for frequency-built models.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedStats {
    /// Sum of all frequencies
    pub total_frequency: u64,

    /// Sum of frequency × codeword length, saturating at `u64::MAX`
    pub weighted_bits: u64,

    /// Mean bits per symbol occurrence
    pub average_bits: f64,

    /// Shannon entropy of the frequency distribution, bits per symbol
    pub entropy: f64,

    /// Bits per symbol for a fixed-width code over the same alphabet
    pub fixed_width_bits: u32,
}

impl WeightedStats {
    /// entropy / average_bits (1.0 for a perfect code).
    pub fn efficiency(&self) -> f64 {
        if self.average_bits == 0.0 {
            0.0
        } else {
            self.entropy / self.average_bits
        }
    }

    /// Encoded size relative to a fixed-width encoding.
    ///
    /// Returns 0.0 if the fixed-width code would use no bits.
    pub fn compression_ratio(&self) -> f64 {
        let fixed = self.total_frequency as f64 * f64::from(self.fixed_width_bits);
        if fixed == 0.0 {
            0.0
        } else {
            self.weighted_bits as f64 / fixed
        }
    }
}

/// Length statistics for any code, plus weighted figures when available.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeStats {
    /// Number of symbols in the codebook
    pub symbols: usize,

    /// Shortest codeword length
    pub min_length: usize,

    /// Longest codeword length
    pub max_length: usize,

    /// Unweighted mean codeword length
    pub mean_length: f64,

    /// Σ 2^-len over all codewords
    pub kraft_sum: f64,

    pub weighted: Option<WeightedStats>,
}

impl CodeStats {
    /// Compute statistics for a model.
    pub fn from_model(model: &CodeModel) -> Self {
        let lengths: Vec<usize> = model.codebook().iter().map(|(_, c)| c.len()).collect();
        let symbols = lengths.len();

        let min_length = lengths.iter().copied().min().unwrap_or(0);
        let max_length = lengths.iter().copied().max().unwrap_or(0);
        let mean_length = if symbols == 0 {
            0.0
        } else {
            lengths.iter().sum::<usize>() as f64 / symbols as f64
        };
        let kraft_sum: f64 = lengths.iter().map(|&len| 0.5f64.powi(len as i32)).sum();

        let weighted = model.frequencies().map(|table| {
            let total_frequency = table.total();
            let weighted_bits = table.iter().fold(0u64, |bits, (symbol, frequency)| {
                let len = model.codebook().codeword(symbol).map_or(0, str::len);
                bits.saturating_add(frequency.saturating_mul(len as u64))
            });
            let entropy: f64 = table
                .iter()
                .map(|(_, frequency)| {
                    let p = frequency as f64 / total_frequency as f64;
                    -p * p.log2()
                })
                .sum();
            WeightedStats {
                total_frequency,
                weighted_bits,
                average_bits: weighted_bits as f64 / total_frequency as f64,
                entropy,
                fixed_width_bits: fixed_width(symbols),
            }
        });

        Self {
            symbols,
            min_length,
            max_length,
            mean_length,
            kraft_sum,
            weighted,
        }
    }

    /// A prefix code is complete when no codeword can be added to it.
    pub fn is_complete(&self) -> bool {
        (self.kraft_sum - 1.0).abs() < 1e-9
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Code Summary ===");
        println!("Symbols: {}", self.symbols);
        println!(
            "Codeword length: min {} / max {} / mean {:.3}",
            self.min_length, self.max_length, self.mean_length
        );
        println!(
            "Kraft sum: {:.6} ({})",
            self.kraft_sum,
            if self.is_complete() { "complete" } else { "incomplete" }
        );

        if let Some(w) = &self.weighted {
            println!();
            println!("=== Weighted ===");
            println!("Total frequency: {}", w.total_frequency);
            println!("Encoded bits: {}", w.weighted_bits);
            println!("Average: {:.4} bits/symbol", w.average_bits);
            println!("Entropy: {:.4} bits/symbol", w.entropy);
            println!("Efficiency: {:.1}%", w.efficiency() * 100.0);
            println!(
                "Fixed width: {} bits/symbol (ratio {:.1}%)",
                w.fixed_width_bits,
                w.compression_ratio() * 100.0
            );
        }
        println!();
    }

    /// Export statistics as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        let mut text = format!(
            "symbols={}\n\
             min_length={}\n\
             max_length={}\n\
             mean_length={:.4}\n\
             kraft_sum={:.6}\n",
            self.symbols, self.min_length, self.max_length, self.mean_length, self.kraft_sum,
        );
        if let Some(w) = &self.weighted {
            text.push_str(&format!(
                "total_frequency={}\n\
                 weighted_bits={}\n\
                 average_bits={:.4}\n\
                 entropy={:.4}\n\
                 efficiency={:.4}\n\
                 compression_ratio={:.4}\n",
                w.total_frequency,
                w.weighted_bits,
                w.average_bits,
                w.entropy,
                w.efficiency(),
                w.compression_ratio(),
            ));
        }
        text
    }
}

/// Bits per symbol needed to give `symbols` symbols distinct fixed-width codes.
fn fixed_width(symbols: usize) -> u32 {
    match symbols {
        0 | 1 => 0,
        n => usize::BITS - (n - 1).leading_zeros(),
    }
}
