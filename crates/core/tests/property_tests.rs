//! Property-based tests for code construction and the codec cursor.
//!
//! Uses proptest to check the laws the rest of the crate relies on:
//! round-tripping, codebook reconstruction, order-independent validation and
//! the cursor replay law.

use proptest::prelude::*;
use prefix_code_core::{
    cursor::{step, Op},
    CodeModel, CodecCursor, Codebook, FrequencyTable, Position,
};

// =============================================================================
// GENERATORS
// =============================================================================

/// Frequencies for 2..=8 distinct lowercase symbols.
fn frequency_strategy() -> impl Strategy<Value = FrequencyTable> {
    prop::collection::btree_map(prop::char::range('a', 'l'), 1u64..500, 2..=8).prop_map(
        |map| {
            FrequencyTable::from_pairs(map.into_iter().map(|(c, f)| (c.to_string(), f)))
                .expect("generated table is valid")
        },
    )
}

/// A prefix-free codebook taken from the leaves of a random full tree.
fn codebook_strategy() -> impl Strategy<Value = Codebook> {
    frequency_strategy().prop_map(|table| {
        let model = CodeModel::from_frequencies(&table).expect("generated model builds");
        // Drop every third symbol so some codebooks are incomplete
        let kept: Vec<(String, String)> = model
            .codebook()
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 3 != 2)
            .map(|(_, (s, c))| (s.to_string(), c.to_string()))
            .collect();
        Codebook::from_pairs(kept).expect("subset of a prefix code is prefix-free")
    })
}

#[derive(Debug, Clone, Copy)]
enum Move {
    Advance,
    Retreat,
}

fn moves_strategy() -> impl Strategy<Value = Vec<Move>> {
    prop::collection::vec(
        prop_oneof![Just(Move::Advance), Just(Move::Retreat)],
        0..60,
    )
}

/// Position reached by `k` advances from the start.
fn replay(cursor: &CodecCursor, k: usize) -> Position {
    let mut position = Position::default();
    for _ in 0..k {
        position = step(cursor.mode(), cursor.layout(), position, Op::Advance).0;
    }
    position
}

/// Number of distinct positions reachable by advancing.
fn end_index(cursor: &CodecCursor) -> usize {
    let mut position = Position::default();
    let mut k = 0;
    loop {
        let next = step(cursor.mode(), cursor.layout(), position, Op::Advance).0;
        if next == position {
            return k;
        }
        position = next;
        k += 1;
    }
}

fn check_replay_law(cursor: &mut CodecCursor, moves: &[Move]) -> Result<(), TestCaseError> {
    let end = end_index(cursor);
    let mut k = 0usize;
    for m in moves {
        match m {
            Move::Advance => {
                cursor.advance();
                k = (k + 1).min(end);
            }
            Move::Retreat => {
                cursor.retreat();
                k = k.saturating_sub(1);
            }
        }
        prop_assert_eq!(cursor.position(), replay(cursor, k));
    }
    let last = cursor.seek_end().position;
    prop_assert_eq!(last, replay(cursor, end));
    Ok(())
}

// =============================================================================
// CONSTRUCTION PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_round_trip(table in frequency_strategy(), picks in prop::collection::vec(any::<prop::sample::Index>(), 0..40)) {
        let model = CodeModel::from_frequencies(&table).unwrap();
        let symbols: Vec<&str> = table.iter().map(|(s, _)| s).collect();
        let message: String = picks.iter().map(|i| *i.get(&symbols)).collect();

        let encoded = model.encode(&message).unwrap();
        let decoded = model.decode(&encoded).unwrap();
        prop_assert_eq!(decoded.concat(), message);
    }

    #[test]
    fn prop_build_is_deterministic(table in frequency_strategy()) {
        let first = CodeModel::from_frequencies(&table).unwrap();
        let second = CodeModel::from_frequencies(&table).unwrap();
        prop_assert_eq!(first.codebook(), second.codebook());
        for k in 0..first.trace_len() {
            let a: Vec<u64> = first.trace_at(k).unwrap().iter().map(|n| n.frequency()).collect();
            let b: Vec<u64> = second.trace_at(k).unwrap().iter().map(|n| n.frequency()).collect();
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn prop_trace_shape(table in frequency_strategy()) {
        let model = CodeModel::from_frequencies(&table).unwrap();
        let n = table.len();
        prop_assert_eq!(model.trace_len(), n);
        for k in 0..n {
            let frontier = model.trace_at(k).unwrap();
            prop_assert_eq!(frontier.len(), n - k);
            // Highest priority first, so frequencies never increase
            for pair in frontier.windows(2) {
                prop_assert!(pair[0].frequency() >= pair[1].frequency());
            }
            let total: u64 = frontier.iter().map(|node| node.frequency()).sum();
            prop_assert_eq!(total, table.total());
        }
    }

    #[test]
    fn prop_frequency_tree_is_full(table in frequency_strategy()) {
        let model = CodeModel::from_frequencies(&table).unwrap();
        let mut stack = vec![model.root()];
        while let Some(node) = stack.pop() {
            prop_assert_eq!(node.left().is_some(), node.right().is_some());
            if let (Some(left), Some(right)) = (node.left(), node.right()) {
                prop_assert_eq!(node.frequency(), left.frequency() + right.frequency());
                prop_assert!(node.symbol().is_none());
                stack.push(left);
                stack.push(right);
            } else {
                prop_assert!(node.symbol().is_some());
            }
        }
    }

    #[test]
    fn prop_codebook_reconstruction(codebook in codebook_strategy()) {
        let model = CodeModel::from_codebook(&codebook).unwrap();
        let derived = Codebook::from_pairs(
            model.root().leaves().iter().map(|leaf| (leaf.symbol().unwrap(), leaf.codeword())),
        ).unwrap();
        prop_assert!(derived.same_entries(&codebook));
    }

    #[test]
    fn prop_validation_ignores_order(codebook in codebook_strategy(), extra in "[01]{1,6}") {
        let mut pairs: Vec<(String, String)> = codebook
            .iter()
            .map(|(s, c)| (s.to_string(), c.to_string()))
            .collect();
        pairs.push(("extra".to_string(), extra));

        let forward = Codebook::from_pairs(pairs.clone()).is_ok();
        pairs.reverse();
        let backward = Codebook::from_pairs(pairs).is_ok();
        prop_assert_eq!(forward, backward);
    }
}

// =============================================================================
// CURSOR PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_encoding_replay_law(table in frequency_strategy(), text in "[a-n]{0,20}", moves in moves_strategy()) {
        let model = CodeModel::from_frequencies(&table).unwrap();
        let mut cursor = CodecCursor::new();
        cursor.edit_plain(&model, &text);
        check_replay_law(&mut cursor, &moves)?;
    }

    #[test]
    fn prop_decoding_replay_law(codebook in codebook_strategy(), text in "[012]{0,30}", moves in moves_strategy()) {
        let model = CodeModel::from_codebook(&codebook).unwrap();
        let mut cursor = CodecCursor::new();
        cursor.edit_encoded(&model, &text);
        check_replay_law(&mut cursor, &moves)?;
    }

    #[test]
    fn prop_derived_side_is_prefix_consistent(table in frequency_strategy(), text in "[a-n]{0,20}") {
        let model = CodeModel::from_frequencies(&table).unwrap();
        let mut cursor = CodecCursor::new();
        cursor.edit_plain(&model, &text);

        let coded: String = text.chars().take(cursor.ending_bits().len()).collect();
        prop_assert_eq!(cursor.encoded_text(), model.encode(&coded).unwrap());

        // Decoding the derived bits gives back the coded prefix
        let encoded = cursor.encoded_text();
        cursor.edit_encoded(&model, &encoded);
        prop_assert_eq!(cursor.plain_text(), coded);
        prop_assert!(cursor.error().is_none());
    }
}
