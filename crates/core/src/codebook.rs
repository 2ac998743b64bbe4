//! Ordered symbol tables: frequencies and codewords.
//!
//! Both tables preserve insertion order, because that order drives the
//! default display order of a model. Lookups by symbol go through a side
//! index so they stay O(1).
//!
//! # Codebook Invariants
//!
//! - Every codeword matches `[01]+`
//! - No codeword is a prefix of another (prefix-free)
//! - Symbols are unique
//!
//! [`Codebook::insert`] enforces all three, so a `Codebook` value is always
//! valid. The set of accepted codebooks does not depend on entry order; only
//! the error message for a rejected one does.

use crate::error::{InputError, Result};
use std::collections::HashMap;

/// Ordered mapping from symbol to positive frequency.
///
/// The sum of all frequencies always fits in a `u64`, so every subtree
/// frequency built from the table does too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
    total: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from pairs, rejecting duplicates and zero frequencies.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (symbol, frequency) in pairs {
            table.insert(symbol.into(), frequency)?;
        }
        Ok(table)
    }

    /// Append an entry.
    ///
    /// # Errors
    /// - `InputError::NonPositiveFrequency` if `frequency` is 0
    /// - `InputError::DuplicateKey` if `symbol` is already present
    /// - `InputError::FrequencyOverflow` if the total would exceed `u64::MAX`
    pub fn insert(&mut self, symbol: String, frequency: u64) -> Result<()> {
        if frequency == 0 {
            return Err(InputError::NonPositiveFrequency {
                token: frequency.to_string(),
            }
            .into());
        }
        if self.index.contains_key(&symbol) {
            return Err(InputError::DuplicateKey { key: symbol }.into());
        }
        self.total = self
            .total
            .checked_add(frequency)
            .ok_or(InputError::FrequencyOverflow {
                token: frequency.to_string(),
            })?;
        self.index.insert(symbol.clone(), self.entries.len());
        self.entries.push((symbol, frequency));
        Ok(())
    }

    pub fn get(&self, symbol: &str) -> Option<u64> {
        self.index.get(symbol).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all frequencies.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(s, f)| (s.as_str(), *f))
    }
}

/// Ordered, validated mapping from symbol to codeword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codebook {
    entries: Vec<(String, String)>,
    by_symbol: HashMap<String, usize>,
}

impl Codebook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a codebook from pairs, validating each in order.
    ///
    /// # Errors
    /// See [`Codebook::insert`].
    pub fn from_pairs<I, S, C>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
        C: Into<String>,
    {
        let mut codebook = Self::new();
        for (symbol, codeword) in pairs {
            codebook.insert(symbol.into(), codeword.into())?;
        }
        Ok(codebook)
    }

    /// Append an entry after validating it against the entries so far.
    ///
    /// # Errors
    /// - `InputError::IllegalCodeword` if the codeword is empty or has a
    ///   digit other than 0/1
    /// - `InputError::AmbiguousCodebook` if it is a prefix of, or prefixed
    ///   by, an accepted codeword
    /// - `InputError::DuplicateKey` if the symbol is already present
    pub fn insert(&mut self, symbol: String, codeword: String) -> Result<()> {
        validate_codeword(&codeword)?;
        if let Some((_, other)) = self
            .entries
            .iter()
            .find(|(_, other)| codeword.starts_with(other.as_str()) || other.starts_with(&codeword))
        {
            return Err(InputError::AmbiguousCodebook {
                codeword,
                other: other.clone(),
            }
            .into());
        }
        if self.by_symbol.contains_key(&symbol) {
            return Err(InputError::DuplicateKey { key: symbol }.into());
        }

        let slot = self.entries.len();
        self.by_symbol.insert(symbol.clone(), slot);
        self.entries.push((symbol, codeword));
        Ok(())
    }

    /// Codeword for a symbol.
    pub fn codeword(&self, symbol: &str) -> Option<&str> {
        self.by_symbol
            .get(symbol)
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(s, c)| (s.as_str(), c.as_str()))
    }

    /// True if both codebooks map every symbol to the same codeword,
    /// regardless of entry order.
    pub fn same_entries(&self, other: &Codebook) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(symbol, codeword)| other.codeword(symbol) == Some(codeword))
    }
}

/// Check that a codeword is a non-empty string of 0s and 1s.
pub fn validate_codeword(codeword: &str) -> Result<()> {
    if codeword.is_empty() || !codeword.chars().all(|c| c == '0' || c == '1') {
        return Err(InputError::IllegalCodeword {
            codeword: codeword.to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_codebook_preserves_order() {
        let codebook = Codebook::from_pairs([("e", "0"), ("a", "11"), ("b", "10")]).unwrap();
        let symbols: Vec<_> = codebook.iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec!["e", "a", "b"]);
        assert_eq!(codebook.codeword("a"), Some("11"));
        assert_eq!(codebook.codeword("b"), Some("10"));
        assert_eq!(codebook.codeword("z"), None);
    }

    #[test]
    fn test_illegal_code() {
        let result = Codebook::from_pairs([("a", "2")]);
        assert!(matches!(
            result,
            Err(Error::Input(InputError::IllegalCodeword { ref codeword })) if codeword == "2"
        ));

        let result = Codebook::from_pairs([("a", "")]);
        assert!(matches!(
            result,
            Err(Error::Input(InputError::IllegalCodeword { .. }))
        ));
    }

    #[test]
    fn test_ambiguous_codes() {
        let result = Codebook::from_pairs([("a", "0"), ("b", "01")]);
        match result {
            Err(Error::Input(InputError::AmbiguousCodebook { codeword, other })) => {
                assert_eq!(codeword, "01");
                assert_eq!(other, "0");
            }
            other => panic!("expected ambiguous codes, got {:?}", other),
        }

        // Order of entry only changes which codeword is named first
        let result = Codebook::from_pairs([("b", "01"), ("a", "0")]);
        assert!(matches!(
            result,
            Err(Error::Input(InputError::AmbiguousCodebook { .. }))
        ));
    }

    #[test]
    fn test_identical_codewords_are_ambiguous() {
        let result = Codebook::from_pairs([("a", "10"), ("b", "10")]);
        assert!(matches!(
            result,
            Err(Error::Input(InputError::AmbiguousCodebook { .. }))
        ));
    }

    #[test]
    fn test_duplicate_symbol() {
        let result = Codebook::from_pairs([("a", "0"), ("a", "1")]);
        assert!(matches!(
            result,
            Err(Error::Input(InputError::DuplicateKey { .. }))
        ));
    }

    #[test]
    fn test_same_entries_ignores_order() {
        let first = Codebook::from_pairs([("a", "0"), ("b", "10")]).unwrap();
        let second = Codebook::from_pairs([("b", "10"), ("a", "0")]).unwrap();
        let third = Codebook::from_pairs([("a", "1"), ("b", "00")]).unwrap();
        assert!(first.same_entries(&second));
        assert!(!first.same_entries(&third));
    }

    #[test]
    fn test_frequency_table() {
        let table = FrequencyTable::from_pairs([("a", 25), ("b", 76), ("e", 135)]).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.total(), 236);
        assert_eq!(table.get("b"), Some(76));
        assert_eq!(table.get("z"), None);

        assert!(FrequencyTable::from_pairs([("a", 0)]).is_err());
        assert!(FrequencyTable::from_pairs([("a", 1), ("a", 2)]).is_err());
    }

    #[test]
    fn test_frequency_total_overflow() {
        let result = FrequencyTable::from_pairs([("a", u64::MAX), ("b", 1)]);
        assert!(matches!(
            result,
            Err(Error::Input(InputError::FrequencyOverflow { ref token })) if token == "1"
        ));

        // A rejected entry leaves the table unchanged
        let mut table = FrequencyTable::from_pairs([("a", u64::MAX - 1)]).unwrap();
        assert!(table.insert("b".to_string(), 2).is_err());
        assert_eq!(table.len(), 1);
        assert_eq!(table.total(), u64::MAX - 1);

        table.insert("b".to_string(), 1).unwrap();
        assert_eq!(table.total(), u64::MAX);
    }
}
