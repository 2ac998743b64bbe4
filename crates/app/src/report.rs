//! Terminal rendering of models and cursor runs.

use prefix_code_core::cursor::{CursorView, ScanError};
use prefix_code_core::input::escape_symbol;
use prefix_code_core::{CodeModel, CodecCursor, Flow, NodeRef, Result};
use tracing::warn;

/// Print the codebook in table order, with frequencies when known.
pub fn print_codebook(model: &CodeModel) {
    println!("=== Codebook ===");
    for (symbol, codeword) in model.codebook().iter() {
        match model.frequencies().and_then(|table| table.get(symbol)) {
            Some(frequency) => {
                println!("{:>6} {:>8}  {}", escape_symbol(symbol), frequency, codeword)
            }
            None => println!("{:>6}  {}", escape_symbol(symbol), codeword),
        }
    }
    println!();
}

/// Print the tree sideways, right subtree on top.
pub fn print_tree(model: &CodeModel) {
    println!("=== Tree ===");
    print_subtree(model.root(), 0);
    println!();
}

fn print_subtree(node: NodeRef<'_>, indent: usize) {
    if let Some(right) = node.right() {
        print_subtree(right, indent + 1);
    }
    println!("{}{}", "    ".repeat(indent), node_label(node));
    if let Some(left) = node.left() {
        print_subtree(left, indent + 1);
    }
}

/// Print every frontier of the construction, highest priority first.
pub fn print_trace(model: &CodeModel) -> Result<()> {
    println!("=== Construction ===");
    for step in 0..model.trace_len() {
        let frontier = model.trace_at(step)?;
        let nodes: Vec<String> = frontier.iter().map(|node| node_label(*node)).collect();
        println!("{:>3}: {}", step, nodes.join(" "));
        if step + 1 < model.trace_len() {
            let merged = model.merge_at(step)?;
            println!("     merge -> {}", node_label(merged));
        }
    }
    println!();
    Ok(())
}

fn node_label(node: NodeRef<'_>) -> String {
    match (node.symbol(), node.frequency()) {
        (Some(symbol), 0) => format!("'{}'", escape_symbol(symbol)),
        (Some(symbol), frequency) => format!("'{}':{}", escape_symbol(symbol), frequency),
        (None, 0) => "*".to_string(),
        (None, frequency) => format!("({})", frequency),
    }
}

/// One line describing a cursor position.
pub fn step_line(view: &CursorView) -> String {
    format!(
        "[{:>3},{:>4}] {}",
        view.position.symbol, view.position.bit, view.status
    )
}

/// Advance the cursor until it stops, printing every position.
///
/// Returns the number of steps taken and whether the cursor reached a
/// character that could not be coded.
pub fn play(cursor: &mut CodecCursor) -> (usize, bool) {
    println!("=== {:?} ===", cursor.mode());
    println!("{}", step_line(&cursor.view()));

    let mut steps = 0;
    let mut stopped_at_error = false;
    loop {
        let view = cursor.advance();
        steps += 1;
        println!("{}", step_line(&view));
        if view.status.is_error() && !stopped_at_error {
            stopped_at_error = true;
            warn_scan_error(cursor.error());
        }
        if view.flow == Flow::Stop {
            break;
        }
    }

    let (symbols, codes) = cursor.alignment();
    println!();
    println!("{}", symbols.trim_end());
    println!("{}", codes.trim_end());
    println!();
    (steps, stopped_at_error)
}

fn warn_scan_error(error: Option<&ScanError>) {
    match error {
        Some(ScanError::UnknownSymbol { index, symbol }) => {
            warn!(index, symbol = %escape_symbol(symbol), "plaintext stopped at unknown symbol")
        }
        Some(other) => warn!(
            offset = other.bit_offset(),
            "encoded text stopped at {:?}",
            other
        ),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefix_code_core::cursor::Position;
    use prefix_code_core::FrequencyTable;

    fn sample() -> CodeModel {
        let table = FrequencyTable::from_pairs([("a", 25), ("b", 76), ("e", 135)]).unwrap();
        CodeModel::from_frequencies(&table).unwrap()
    }

    #[test]
    fn test_node_label() {
        let model = sample();
        assert_eq!(node_label(model.root()), "(236)");
        assert_eq!(node_label(model.leaf("a").unwrap()), "'a':25");
    }

    #[test]
    fn test_step_line() {
        let model = sample();
        let mut cursor = CodecCursor::new();
        cursor.edit_plain(&model, "ea");
        let view = cursor.advance();
        assert_eq!(view.position, Position::new(1, 1));
        assert_eq!(step_line(&view), "[  1,   1] Encoding 'e' as 0");
    }

    #[test]
    fn test_play_counts_steps() {
        let model = sample();
        let mut cursor = CodecCursor::new();
        cursor.edit_encoded(&model, "011100");
        assert_eq!(play(&mut cursor), (6, false));
        assert_eq!(cursor.view().consumed_plain, "eabe");
    }

    #[test]
    fn test_play_reports_reached_error() {
        let model = sample();
        let mut cursor = CodecCursor::new();

        // t is not in the alphabet: three coded symbols, then the error
        cursor.edit_plain(&model, "beat");
        assert_eq!(play(&mut cursor), (4, true));
        assert!(cursor.view().status.is_error());

        cursor.edit_encoded(&model, "0x0");
        assert_eq!(play(&mut cursor), (2, true));
        assert!(!cursor.reset().status.is_error());
    }

    #[test]
    fn test_print_trace() {
        assert!(print_trace(&sample()).is_ok());
    }
}
