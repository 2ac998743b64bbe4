//! prefix-code-core: Huffman code construction and stepwise coding
//!
//! This library provides the core components for a teaching tool that:
//! - Builds optimal prefix codes from symbol frequencies
//! - Rebuilds code trees from explicit, validated codebooks
//! - Records every merge of the construction for replay
//! - Steps through encoding and decoding one symbol or bit at a time
//!
//! # Architecture
//!
//! - `tree`: arena-allocated prefix tree and its navigation handles
//! - `codebook`: ordered frequency tables and prefix-free codebooks
//! - `huffman`: construction engine and the `CodeModel` it produces
//! - `input`: two-column text parsing and validation
//! - `cursor`: dual-index encode/decode cursor
//! - `stats`: code length, entropy and efficiency figures
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Atomic builds**: A model is either complete and valid or not produced
//! - **Deterministic**: A total subtree order makes every build reproducible
//! - **Pure stepping**: Cursor moves are a function of state and operation

pub mod codebook;
pub mod cursor;
pub mod error;
pub mod huffman;
pub mod input;
pub mod stats;
pub mod tree;

// Re-export commonly used types
pub use codebook::{Codebook, FrequencyTable};
pub use cursor::{CodecCursor, CursorView, Flow, Mode, Position};
pub use error::{Error, Result};
pub use huffman::CodeModel;
pub use tree::{NodeRef, PrefixTree};
