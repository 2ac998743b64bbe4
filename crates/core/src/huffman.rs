//! Huffman code construction.
//!
//! A [`CodeModel`] bundles the prefix tree, the codebook derived from it and,
//! when built from frequencies, the frequency table and a trace of the merge
//! frontier.
//!
//! # Frequency-Driven Build
//!
//! 1. One leaf per symbol goes into a frontier kept sorted by the subtree
//!    order (frequency, then left shape, then right shape, then symbol)
//! 2. Before each merge the sorted frontier is recorded in the trace
//! 3. The two smallest subtrees `a` (minimal) and `b` (second-minimal) are
//!    removed and replaced by a node with `left = b`, `right = a`
//! 4. After `n - 1` merges the single remaining subtree is the root
//! 5. Codewords are read off by walking from each leaf up to the root
//!
//! The subtree order is total, so identical input always produces an
//! identical tree and trace.
//!
//! # Codebook-Driven Build
//!
//! Each codeword is inserted as a path from the root, creating placeholder
//! nodes for missing children and labeling the final node. The codebook is
//! validated before insertion, so no labeled leaf ever needs to grow
//! children. No frequency information exists for such a model and its trace
//! is unavailable.

use crate::codebook::{Codebook, FrequencyTable};
use crate::error::{CodecError, ConstructionError, InputError, Result};
use crate::tree::{NodeId, NodeRef, PrefixTree, Side, TreeBuilder};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Frontier snapshots and merge log recorded during a frequency build.
#[derive(Debug, Clone)]
struct MergeTrace {
    /// `frontiers[k]` is the frontier before merge `k`, ascending.
    /// The last entry holds only the root.
    frontiers: Vec<Vec<NodeId>>,
    /// `merges[k]` is the node created by merge `k`.
    merges: Vec<NodeId>,
}

/// An immutable Huffman code: tree, codebook and optional build history.
#[derive(Debug, Clone)]
pub struct CodeModel {
    tree: PrefixTree,
    codebook: Codebook,
    leaves: HashMap<String, NodeId>,
    frequencies: Option<FrequencyTable>,
    trace: Option<MergeTrace>,
}

impl CodeModel {
    /// Build an optimal code from symbol frequencies.
    ///
    /// The codebook lists symbols in the same order as `frequencies`.
    ///
    /// # Errors
    /// - `InputError::EmptyInput` if the table is empty
    /// - `ConstructionError::TooFewSymbols` if it has a single symbol
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        match frequencies.len() {
            0 => return Err(InputError::EmptyInput.into()),
            1 => return Err(ConstructionError::TooFewSymbols { count: 1 }.into()),
            _ => {}
        }

        let mut builder = TreeBuilder::new();
        let mut leaves = HashMap::with_capacity(frequencies.len());
        let mut leaf_order = Vec::with_capacity(frequencies.len());
        let mut frontier = Vec::with_capacity(frequencies.len());

        for (symbol, frequency) in frequencies.iter() {
            let leaf = builder.leaf(symbol, frequency);
            leaves.insert(symbol.to_string(), leaf);
            leaf_order.push((symbol.to_string(), leaf));
            frontier.push(leaf);
        }
        frontier.sort_by(|&x, &y| builder.compare(x, y));

        let steps = frequencies.len() - 1;
        let mut frontiers = Vec::with_capacity(steps + 1);
        let mut merges = Vec::with_capacity(steps);

        for step in 0..steps {
            frontiers.push(frontier.clone());

            // Frontier is ascending: the two minimal subtrees are at the front
            let a = frontier.remove(0);
            let b = frontier.remove(0);
            let merged = builder.merge(b, a);
            debug!(
                step,
                minimal = builder.frequency(a),
                second = builder.frequency(b),
                merged = builder.frequency(merged),
                "merged subtrees"
            );

            let at = frontier
                .binary_search_by(|&probe| builder.compare(probe, merged))
                .unwrap_or_else(|slot| slot);
            frontier.insert(at, merged);
            merges.push(merged);
        }

        let root = frontier[0];
        frontiers.push(vec![root]);

        let tree = builder.finish(root)?;
        let mut codebook = Codebook::new();
        for (symbol, leaf) in &leaf_order {
            let codeword = tree.get(*leaf).map(|node| node.codeword()).unwrap_or_default();
            codebook.insert(symbol.clone(), codeword)?;
        }

        debug!(symbols = codebook.len(), "built code from frequencies");

        Ok(Self {
            tree,
            codebook,
            leaves,
            frequencies: Some(frequencies.clone()),
            trace: Some(MergeTrace { frontiers, merges }),
        })
    }

    /// Build the tree for an explicit codebook.
    ///
    /// The model's codebook keeps the input's entry order.
    ///
    /// # Errors
    /// - `InputError::EmptyInput` if the codebook is empty
    /// - `ConstructionError::UnlabeledLeaf` if a placeholder leaf survives
    pub fn from_codebook(codebook: &Codebook) -> Result<Self> {
        if codebook.is_empty() {
            return Err(InputError::EmptyInput.into());
        }

        let mut builder = TreeBuilder::new();
        let root = builder.placeholder();
        let mut leaves = HashMap::with_capacity(codebook.len());

        for (symbol, codeword) in codebook.iter() {
            let mut walk = root;
            for bit in codeword.chars() {
                // Codebook entries only contain 0 and 1
                let side = if bit == '0' { Side::Left } else { Side::Right };
                walk = builder.child_or_insert(walk, side);
            }
            builder.label(walk, symbol);
            leaves.insert(symbol.to_string(), walk);
        }

        let tree = builder.finish(root)?;
        debug!(symbols = codebook.len(), nodes = tree.len(), "built tree from codebook");

        Ok(Self {
            tree,
            codebook: codebook.clone(),
            leaves,
            frequencies: None,
            trace: None,
        })
    }

    /// Build an optimal code from the character counts of a text.
    ///
    /// Symbols are single characters listed in sorted order.
    ///
    /// # Errors
    /// - `InputError::EmptyInput` if `text` is empty
    /// - `ConstructionError::TooFewSymbols` if it has one distinct character
    pub fn from_text(text: &str) -> Result<Self> {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for ch in text.chars() {
            *counts.entry(ch.to_string()).or_insert(0) += 1;
        }
        let frequencies = FrequencyTable::from_pairs(counts)?;
        Self::from_frequencies(&frequencies)
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.codebook.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codebook.is_empty()
    }

    pub fn tree(&self) -> &PrefixTree {
        &self.tree
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.tree.root()
    }

    pub fn codebook(&self) -> &Codebook {
        &self.codebook
    }

    /// Frequency table, present only for frequency-built models.
    pub fn frequencies(&self) -> Option<&FrequencyTable> {
        self.frequencies.as_ref()
    }

    /// Whether the model carries frequencies and a merge trace.
    pub fn has_frequency_data(&self) -> bool {
        self.frequencies.is_some()
    }

    /// Leaf for a symbol.
    pub fn leaf(&self, symbol: &str) -> Option<NodeRef<'_>> {
        self.leaves.get(symbol).and_then(|&id| self.tree.get(id))
    }

    /// Node reached by following `path` from the root.
    pub fn node_at(&self, path: &str) -> Option<NodeRef<'_>> {
        self.tree.walk(path)
    }

    /// Number of trace snapshots (one per symbol).
    pub fn trace_len(&self) -> usize {
        self.trace.as_ref().map_or(0, |t| t.frontiers.len())
    }

    /// Frontier before merge `step`, from highest to lowest priority order.
    ///
    /// Step `len() - 1` holds only the root.
    ///
    /// # Errors
    /// - `ConstructionError::TraceUnavailable` for codebook-built models
    /// - `ConstructionError::StepOutOfRange` if `step >= trace_len()`
    pub fn trace_at(&self, step: usize) -> Result<Vec<NodeRef<'_>>> {
        let trace = self
            .trace
            .as_ref()
            .ok_or(ConstructionError::TraceUnavailable)?;
        let frontier = trace
            .frontiers
            .get(step)
            .ok_or(ConstructionError::StepOutOfRange {
                step,
                steps: trace.frontiers.len(),
            })?;
        Ok(frontier
            .iter()
            .rev()
            .filter_map(|&id| self.tree.get(id))
            .collect())
    }

    /// Node created by merge `step` (`0 <= step < len() - 1`).
    ///
    /// # Errors
    /// Same as [`CodeModel::trace_at`].
    pub fn merge_at(&self, step: usize) -> Result<NodeRef<'_>> {
        let trace = self
            .trace
            .as_ref()
            .ok_or(ConstructionError::TraceUnavailable)?;
        trace
            .merges
            .get(step)
            .and_then(|&id| self.tree.get(id))
            .ok_or_else(|| {
                ConstructionError::StepOutOfRange {
                    step,
                    steps: trace.merges.len(),
                }
                .into()
            })
    }

    /// Encode a plaintext whose characters are all symbols of the model.
    ///
    /// # Errors
    /// - `CodecError::UnknownSymbol` for the first character with no codeword
    pub fn encode(&self, plaintext: &str) -> Result<String> {
        let mut encoded = String::new();
        for (index, ch) in plaintext.chars().enumerate() {
            let symbol = ch.to_string();
            let codeword = self
                .codebook
                .codeword(&symbol)
                .ok_or(CodecError::UnknownSymbol { symbol, index })?;
            encoded.push_str(codeword);
        }
        Ok(encoded)
    }

    /// Decode a complete bitstring into its symbol sequence.
    ///
    /// # Errors
    /// - `CodecError::InvalidDigit` for a character other than 0/1
    /// - `CodecError::DeadEnd` when the bits leave the tree
    /// - `CodecError::IncompleteCodeword` if the input ends mid-codeword
    pub fn decode(&self, encoded: &str) -> Result<Vec<String>> {
        let mut symbols = Vec::new();
        let mut walk = self.tree.root();
        let mut pending = String::new();

        for (offset, digit) in encoded.chars().enumerate() {
            let side = Side::from_bit(digit).ok_or(CodecError::InvalidDigit { digit, offset })?;
            walk = walk.child(side).ok_or(CodecError::DeadEnd { offset })?;
            pending.push(digit);
            if let Some(symbol) = walk.symbol() {
                symbols.push(symbol.to_string());
                walk = self.tree.root();
                pending.clear();
            }
        }

        if !pending.is_empty() {
            return Err(CodecError::IncompleteCodeword { bits: pending }.into());
        }
        Ok(symbols)
    }
}
