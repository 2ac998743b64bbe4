//! Error types for prefix code construction and coding.
//!
//! All operations return structured errors rather than panicking.
//! Construction is atomic: an error means no model was produced and the
//! caller's previous model stays in effect.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Input: parsing and validating user-entered tables
/// - Construction: building a tree or querying its build trace
/// - Codec: whole-string encoding or decoding against a model
#[derive(Debug, Error)]
pub enum Error {
    /// User input was rejected during validation
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    /// Tree construction or trace query failed
    #[error("construction error: {0}")]
    Construction(#[from] ConstructionError),

    /// Batch encode/decode failed
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Validation errors for two-column input and codebooks.
///
/// The messages are meant to be shown to the person who typed the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A line had more than two tokens
    #[error("Invalid line: {line}")]
    MalformedEntry { line: String },

    /// The same symbol appeared on two lines
    #[error("Duplicate key: {key}")]
    DuplicateKey { key: String },

    /// No non-blank lines were given
    #[error("There must be at least one entry")]
    EmptyInput,

    /// A frequency was not a positive integer
    #[error("Illegal Frequency: {token}")]
    NonPositiveFrequency { token: String },

    /// Adding a frequency would push the table total past `u64::MAX`
    #[error("Frequency too large: {token}")]
    FrequencyOverflow { token: String },

    /// A codeword contained something other than 0 and 1
    #[error("Illegal Code: {codeword}")]
    IllegalCodeword { codeword: String },

    /// One codeword is a prefix of another
    #[error("Ambiguous Codes: {codeword} {other}")]
    AmbiguousCodebook { codeword: String, other: String },
}

/// Tree construction and trace errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// Frequency-driven construction needs at least two symbols
    #[error("at least 2 symbols are required to build a code, got {count}")]
    TooFewSymbols { count: usize },

    /// The model was built from a codebook and has no merge trace
    #[error("model has no frequency data, so no merge trace is available")]
    TraceUnavailable,

    /// Trace step outside `0..steps`
    #[error("trace step {step} out of range (model has {steps} steps)")]
    StepOutOfRange { step: usize, steps: usize },

    /// A placeholder leaf survived codebook-driven construction
    #[error("unlabeled leaf at path {path:?}")]
    UnlabeledLeaf { path: String },
}

/// Whole-string encode/decode errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Plaintext symbol has no codeword
    #[error("symbol {symbol:?} at index {index} does not appear in the alphabet")]
    UnknownSymbol { symbol: String, index: usize },

    /// Encoded text contained something other than 0 and 1
    #[error("invalid digit {digit:?} at bit offset {offset}")]
    InvalidDigit { digit: char, offset: usize },

    /// Bits at `offset` cannot be extended to any codeword
    #[error("bit at offset {offset} does not continue any codeword")]
    DeadEnd { offset: usize },

    /// Encoded text ended in the middle of a codeword
    #[error("trailing bits {bits:?} do not form a complete codeword")]
    IncompleteCodeword { bits: String },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_messages() {
        let err = InputError::AmbiguousCodebook {
            codeword: "01".to_string(),
            other: "0".to_string(),
        };
        assert_eq!(err.to_string(), "Ambiguous Codes: 01 0");

        let err = InputError::IllegalCodeword {
            codeword: "2".to_string(),
        };
        assert_eq!(err.to_string(), "Illegal Code: 2");

        let err = InputError::FrequencyOverflow {
            token: "18446744073709551615".to_string(),
        };
        assert_eq!(err.to_string(), "Frequency too large: 18446744073709551615");
    }

    #[test]
    fn test_wrapping() {
        let err: Error = InputError::EmptyInput.into();
        assert!(matches!(err, Error::Input(InputError::EmptyInput)));
        assert_eq!(
            err.to_string(),
            "invalid input: There must be at least one entry"
        );
    }
}
