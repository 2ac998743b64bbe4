//! Parsing and validation of user-entered tables.
//!
//! Frequency tables and codebooks are typed as two columns, one entry per
//! line:
//!
//! ```text
//! a 25
//! b 76
//! \s 135
//! ```
//!
//! # Line Rules
//!
//! - Lines are separated by one or more newlines; leading whitespace is ignored
//! - A blank line is skipped
//! - A single token is a value for the space symbol `" "`
//! - Two tokens are a symbol and a value
//! - More than two tokens is a malformed entry
//!
//! Symbols are written in escaped form so that whitespace symbols can be
//! typed: `\s` is a space, `\n` a newline and `\t` a tab.

use crate::codebook::{Codebook, FrequencyTable};
use crate::error::{InputError, Result};
use std::collections::HashSet;

/// Symbol used for a line that holds only a value.
const DEFAULT_SYMBOL: &str = " ";

/// Escape whitespace in a symbol for display.
pub fn escape_symbol(symbol: &str) -> String {
    symbol
        .replace(' ', "\\s")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}

/// Inverse of [`escape_symbol`].
pub fn unescape_symbol(symbol: &str) -> String {
    symbol
        .replace("\\s", " ")
        .replace("\\n", "\n")
        .replace("\\t", "\t")
}

/// Split text into ordered (symbol, value) pairs.
///
/// Symbols are returned unescaped; values verbatim.
///
/// # Errors
/// - `InputError::MalformedEntry` for a line with more than two tokens
/// - `InputError::DuplicateKey` for a repeated symbol
/// - `InputError::EmptyInput` if no line holds an entry
pub fn parse_two_column(text: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    let mut seen = HashSet::new();

    for line in text.split('\n') {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (symbol, value) = match tokens.as_slice() {
            [] => continue,
            [value] => (DEFAULT_SYMBOL.to_string(), *value),
            [symbol, value] => (unescape_symbol(symbol), *value),
            _ => {
                return Err(InputError::MalformedEntry {
                    line: line.to_string(),
                }
                .into())
            }
        };

        if !seen.insert(symbol.clone()) {
            return Err(InputError::DuplicateKey {
                key: escape_symbol(&symbol),
            }
            .into());
        }
        pairs.push((symbol, value.to_string()));
    }

    if pairs.is_empty() {
        return Err(InputError::EmptyInput.into());
    }
    Ok(pairs)
}

/// Parse a symbol/frequency table.
///
/// # Errors
/// Everything [`parse_two_column`] reports, plus
/// `InputError::NonPositiveFrequency` for a value that is not a positive
/// integer and `InputError::FrequencyOverflow` when the values add up to
/// more than `u64::MAX`.
pub fn parse_frequencies(text: &str) -> Result<FrequencyTable> {
    let mut table = FrequencyTable::new();
    for (symbol, value) in parse_two_column(text)? {
        let frequency = value
            .parse::<u64>()
            .ok()
            .filter(|&f| f > 0)
            .ok_or(InputError::NonPositiveFrequency { token: value })?;
        table.insert(symbol, frequency)?;
    }
    Ok(table)
}

/// Parse a symbol/codeword table and validate it as a prefix-free code.
///
/// # Errors
/// Everything [`parse_two_column`] reports, plus
/// `InputError::IllegalCodeword` and `InputError::AmbiguousCodebook`.
pub fn parse_codebook(text: &str) -> Result<Codebook> {
    Codebook::from_pairs(parse_two_column(text)?)
}

/// Accept any non-empty plaintext sample.
pub fn parse_plaintext(text: &str) -> Result<&str> {
    if text.is_empty() {
        return Err(InputError::EmptyInput.into());
    }
    Ok(text)
}

/// Render a codebook in the two-column input format.
pub fn format_codebook(codebook: &Codebook) -> String {
    codebook
        .iter()
        .map(|(symbol, codeword)| format!("{} {}\n", escape_symbol(symbol), codeword))
        .collect()
}

/// Render a frequency table in the two-column input format.
pub fn format_frequencies(table: &FrequencyTable) -> String {
    table
        .iter()
        .map(|(symbol, frequency)| format!("{} {}\n", escape_symbol(symbol), frequency))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_two_column() {
        let pairs = parse_two_column("  a 25\n\n\nb   76\n\\s 3\n").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "25".to_string()),
                ("b".to_string(), "76".to_string()),
                (" ".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_single_token_is_space_symbol() {
        let pairs = parse_two_column("7\nx 1").unwrap();
        assert_eq!(pairs[0], (" ".to_string(), "7".to_string()));
    }

    #[test]
    fn test_malformed_entry() {
        let result = parse_two_column("a 1\nb 2 3\n");
        assert!(matches!(
            result,
            Err(Error::Input(InputError::MalformedEntry { ref line })) if line == "b 2 3"
        ));
    }

    #[test]
    fn test_duplicate_key() {
        let result = parse_two_column("a 1\na 2\n");
        assert!(matches!(
            result,
            Err(Error::Input(InputError::DuplicateKey { ref key })) if key == "a"
        ));

        // A lone value and an explicit \s both name the space symbol
        assert!(parse_two_column("4\n\\s 5").is_err());
    }

    #[test]
    fn test_empty_input() {
        for text in ["", "\n\n", "   \n\t\n"] {
            assert!(matches!(
                parse_two_column(text),
                Err(Error::Input(InputError::EmptyInput))
            ));
        }
    }

    #[test]
    fn test_parse_frequencies() {
        let table = parse_frequencies("a 25\nb 76\ne 135").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("e"), Some(135));

        for bad in ["a 0", "a -3", "a x", "a 1.5"] {
            assert!(matches!(
                parse_frequencies(bad),
                Err(Error::Input(InputError::NonPositiveFrequency { .. }))
            ));
        }
    }

    #[test]
    fn test_parse_frequencies_rejects_overflowing_total() {
        let result = parse_frequencies("a 18446744073709551615\nb 1");
        assert!(matches!(
            result,
            Err(Error::Input(InputError::FrequencyOverflow { ref token })) if token == "1"
        ));

        // A single value one past u64::MAX is not a frequency at all
        assert!(matches!(
            parse_frequencies("a 18446744073709551616"),
            Err(Error::Input(InputError::NonPositiveFrequency { .. }))
        ));
    }

    #[test]
    fn test_format_frequencies_reparses() {
        let table = parse_frequencies("\\s 9\n\\t 2\ne 135\n").unwrap();
        let text = format_frequencies(&table);
        assert_eq!(text, "\\s 9\n\\t 2\ne 135\n");
        assert_eq!(parse_frequencies(&text).unwrap(), table);
    }

    #[test]
    fn test_parse_codebook() {
        let codebook = parse_codebook("a 01\nb 00\ne 1\n").unwrap();
        assert_eq!(codebook.codeword("e"), Some("1"));

        assert!(matches!(
            parse_codebook("a 0\nb 01"),
            Err(Error::Input(InputError::AmbiguousCodebook { .. }))
        ));
        assert!(matches!(
            parse_codebook("a 2"),
            Err(Error::Input(InputError::IllegalCodeword { .. }))
        ));
    }

    #[test]
    fn test_escape_round_trip() {
        let raw = " \n\tx";
        assert_eq!(escape_symbol(raw), "\\s\\n\\tx");
        assert_eq!(unescape_symbol(&escape_symbol(raw)), raw);
    }

    #[test]
    fn test_format_codebook_reparses() {
        let codebook = parse_codebook("\\s 0\n\\n 10\nz 11").unwrap();
        let text = format_codebook(&codebook);
        assert_eq!(text, "\\s 0\n\\n 10\nz 11\n");
        assert_eq!(parse_codebook(&text).unwrap(), codebook);
    }

    #[test]
    fn test_parse_plaintext() {
        assert!(parse_plaintext("").is_err());
        assert_eq!(parse_plaintext("hi").unwrap(), "hi");
    }
}
