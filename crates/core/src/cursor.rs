//! Incremental codec cursor.
//!
//! The cursor walks a plaintext and its encoding side by side, one symbol
//! (when encoding) or one bit (when decoding) at a time, and can step back
//! just as precisely. Hosts use it to animate encoding and decoding and to
//! decide what to highlight.
//!
//! # State
//!
//! ```text
//! plain        a    b    ?        symbols (encoding: every typed char)
//! encoded      0    1 0           bits (decoding: every typed char up to
//!              ^      ^                 and including the first bad one)
//! ending_bit  [0,   2]            last bit of each coded symbol
//! position    (symbol, bit)       symbols/bits consumed so far
//! ```
//!
//! The side the user typed into is the *driving* side. Every edit rescans it
//! from the start, stops at the first character that cannot be coded and
//! derives the other side from the part before it. Nothing except the
//! position survives between steps, and the position is reset by an edit.
//!
//! # Stepping
//!
//! [`step`] is a pure function of the mode, the scan layout, the current
//! position and the operation. Any sequence of advances and retreats lands
//! on the same position as replaying the net number of advances from the
//! start.
//!
//! # Thread Safety
//!
//! Not thread-safe. A host that steps from a timer must serialize calls.

use crate::huffman::CodeModel;
use crate::input::escape_symbol;
use crate::tree::Side;
use std::fmt;
use std::ops::Range;
use tracing::{debug, trace};

/// Number of colors segments cycle through.
pub const PALETTE_SIZE: usize = 2;

/// Which side drives the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Plaintext was edited; stepping moves one symbol at a time
    Encoding,
    /// Encoded text was edited; stepping moves one bit at a time
    Decoding,
}

/// Symbols and bits consumed so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub symbol: usize,
    pub bit: usize,
}

impl Position {
    pub fn new(symbol: usize, bit: usize) -> Self {
        Self { symbol, bit }
    }
}

/// Cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Reset,
    Advance,
    Retreat,
    SeekEnd,
}

/// Whether an automatic player should keep stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The last advance reached the end; do not repeat it
    Stop,
}

/// The parts of a scan that stepping depends on.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    /// Index of the last bit of each successfully coded symbol
    pub ending_bit: &'a [usize],
    /// Number of plaintext symbols
    pub plain_len: usize,
    /// Number of encoded characters
    pub encoded_len: usize,
}

impl Layout<'_> {
    /// Bit index just past the first `symbols` coded symbols.
    fn bit_after(&self, symbols: usize) -> usize {
        match symbols.min(self.ending_bit.len()) {
            0 => 0,
            k => 1 + self.ending_bit[k - 1],
        }
    }
}

/// Apply one operation to a position.
///
/// This is the whole stepping contract; [`CodecCursor`] only wraps it.
pub fn step(mode: Mode, layout: Layout<'_>, position: Position, op: Op) -> (Position, Flow) {
    let n = layout.ending_bit.len();
    let Position { symbol: mut c, bit: mut b } = position;
    let mut flow = Flow::Continue;

    match (op, mode) {
        (Op::Reset, _) => {
            c = 0;
            b = 0;
        }
        (Op::SeekEnd, Mode::Decoding) => {
            b = layout.encoded_len;
            c = (1 + n).min(layout.plain_len);
        }
        (Op::SeekEnd, Mode::Encoding) => {
            c = layout.plain_len.min(1 + n);
            // Past the last coded symbol the bit index stays at the end of
            // the coded bits
            b = layout.bit_after(c);
        }
        (Op::Advance, Mode::Decoding) => {
            if b < layout.encoded_len {
                if c < n && b == layout.ending_bit[c] {
                    c += 1;
                }
                b += 1;
            }
            if b >= layout.encoded_len {
                flow = Flow::Stop;
            }
        }
        (Op::Advance, Mode::Encoding) => {
            let last = layout.plain_len.min(1 + n);
            if c < last {
                c += 1;
                if c <= n {
                    b = layout.bit_after(c);
                }
            }
            if c >= last {
                flow = Flow::Stop;
            }
        }
        (Op::Retreat, Mode::Decoding) => {
            if b > 0 {
                b -= 1;
                if c > 0 && b == layout.ending_bit[c - 1] {
                    c -= 1;
                }
            }
        }
        (Op::Retreat, Mode::Encoding) => {
            if c > 0 {
                c -= 1;
                b = layout.bit_after(c);
            }
        }
    }

    (Position::new(c, b), flow)
}

/// First character of the driving text that could not be coded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Plaintext symbol at `index` has no codeword
    UnknownSymbol { index: usize, symbol: String },
    /// Encoded character at `offset` is not 0 or 1
    NonBinaryDigit { offset: usize, digit: char },
    /// Bit at `offset` leaves the code tree
    DeadEnd { offset: usize },
}

impl ScanError {
    /// Offset in the encoded text, for decoding errors.
    pub fn bit_offset(&self) -> Option<usize> {
        match self {
            ScanError::UnknownSymbol { .. } => None,
            ScanError::NonBinaryDigit { offset, .. } | ScanError::DeadEnd { offset } => {
                Some(*offset)
            }
        }
    }
}

/// Both sides of the text after scanning the driving side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Scan {
    plain: Vec<String>,
    encoded: Vec<char>,
    ending_bit: Vec<usize>,
    error: Option<ScanError>,
}

impl Scan {
    /// Encode `text` symbol by symbol until the first unknown symbol.
    fn from_plain(model: &CodeModel, text: &str) -> Self {
        let mut scan = Scan {
            plain: text.chars().map(String::from).collect(),
            ..Scan::default()
        };
        for (index, symbol) in scan.plain.iter().enumerate() {
            match model.codebook().codeword(symbol) {
                Some(codeword) => {
                    scan.encoded.extend(codeword.chars());
                    scan.ending_bit.push(scan.encoded.len() - 1);
                }
                None => {
                    scan.error = Some(ScanError::UnknownSymbol {
                        index,
                        symbol: symbol.clone(),
                    });
                    break;
                }
            }
        }
        scan
    }

    /// Decode `text` bit by bit until the first bad digit or dead end.
    ///
    /// The offending character is kept as the last encoded character.
    fn from_encoded(model: &CodeModel, text: &str) -> Self {
        let mut scan = Scan::default();
        let mut walk = model.root();

        for (offset, digit) in text.chars().enumerate() {
            scan.encoded.push(digit);
            let Some(side) = Side::from_bit(digit) else {
                scan.error = Some(ScanError::NonBinaryDigit { offset, digit });
                break;
            };
            let Some(next) = walk.child(side) else {
                scan.error = Some(ScanError::DeadEnd { offset });
                break;
            };
            walk = next;
            if let Some(symbol) = walk.symbol() {
                scan.plain.push(symbol.to_string());
                scan.ending_bit.push(offset);
                walk = model.root();
            }
        }
        scan
    }

    fn layout(&self) -> Layout<'_> {
        Layout {
            ending_bit: &self.ending_bit,
            plain_len: self.plain.len(),
            encoded_len: self.encoded.len(),
        }
    }

    fn bits(&self, range: Range<usize>) -> String {
        self.encoded[range].iter().collect()
    }

    /// Bit range of coded symbol `index`.
    fn segment_bits(&self, index: usize) -> Range<usize> {
        let start = if index == 0 {
            0
        } else {
            1 + self.ending_bit[index - 1]
        };
        start..1 + self.ending_bit[index]
    }
}

/// A run of bits paired with the symbol it codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub symbol_index: usize,
    /// `None` for a partial codeword
    pub symbol: Option<String>,
    pub bits: Range<usize>,
    pub codeword: String,
}

impl Segment {
    /// Color slot for highlighting.
    pub fn palette_index(&self) -> usize {
        self.symbol_index % PALETTE_SIZE
    }

    pub fn is_complete(&self) -> bool {
        self.symbol.is_some()
    }
}

/// What the last position means, for a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Both texts are empty
    Idle,
    /// Nothing consumed yet
    Ready(Mode),
    Encoded { symbol: String, codeword: String },
    Decoded { codeword: String, symbol: String },
    /// Bits consumed that do not yet form a codeword
    Partial { bits: String },
    UnknownSymbol { symbol: String },
    NonBinaryDigit { digit: char },
    DeadEnd { bits: String },
}

impl Status {
    /// True once the cursor has reached a character that cannot be coded.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Status::UnknownSymbol { .. } | Status::NonBinaryDigit { .. } | Status::DeadEnd { .. }
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => write!(f, "Input plaintext or encoded text to begin"),
            Status::Ready(Mode::Encoding) => write!(f, "Ready to encode"),
            Status::Ready(Mode::Decoding) => write!(f, "Ready to decode"),
            Status::Encoded { symbol, codeword } => {
                write!(f, "Encoding '{}' as {}", escape_symbol(symbol), codeword)
            }
            Status::Decoded { codeword, symbol } => {
                write!(f, "Code {} decoded as '{}'", codeword, escape_symbol(symbol))
            }
            Status::Partial { bits } => write!(f, "Partial code {} not yet complete", bits),
            Status::UnknownSymbol { symbol } => write!(
                f,
                "Character '{}' does not appear in the alphabet",
                escape_symbol(symbol)
            ),
            Status::NonBinaryDigit { .. } => write!(f, "Encoded text may only contain 0's and 1's"),
            Status::DeadEnd { bits } => write!(f, "Code {} does not match any codeword", bits),
        }
    }
}

/// Everything a host needs to render one cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorView {
    pub mode: Mode,
    pub position: Position,
    pub consumed_plain: String,
    pub consumed_encoded: String,
    /// Completed codewords up to the cursor
    pub segments: Vec<Segment>,
    /// The codeword just coded, or the partial one in progress
    pub active_segment: Option<Segment>,
    pub status: Status,
    /// Plaintext index (encoding) or bit offset (decoding) of an error the
    /// cursor has reached
    pub error_at: Option<usize>,
    pub flow: Flow,
}

/// Dual-index cursor over a plaintext and its encoding.
#[derive(Debug, Clone)]
pub struct CodecCursor {
    mode: Mode,
    /// Raw text of the driving side
    source: String,
    scan: Scan,
    position: Position,
}

impl Default for CodecCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecCursor {
    /// Empty cursor in encoding mode.
    pub fn new() -> Self {
        Self {
            mode: Mode::Encoding,
            source: String::new(),
            scan: Scan::default(),
            position: Position::default(),
        }
    }

    /// Plaintext was edited: rescan it and derive the encoding.
    pub fn edit_plain(&mut self, model: &CodeModel, text: &str) -> CursorView {
        self.rebuild(model, Mode::Encoding, text)
    }

    /// Encoded text was edited: rescan it and derive the plaintext.
    pub fn edit_encoded(&mut self, model: &CodeModel, text: &str) -> CursorView {
        self.rebuild(model, Mode::Decoding, text)
    }

    /// The governing code changed: rescan the driving text against it.
    pub fn set_model(&mut self, model: &CodeModel) -> CursorView {
        let source = std::mem::take(&mut self.source);
        self.rebuild(model, self.mode, &source)
    }

    pub fn reset(&mut self) -> CursorView {
        self.apply(Op::Reset)
    }

    pub fn advance(&mut self) -> CursorView {
        self.apply(Op::Advance)
    }

    pub fn retreat(&mut self) -> CursorView {
        self.apply(Op::Retreat)
    }

    pub fn seek_end(&mut self) -> CursorView {
        self.apply(Op::SeekEnd)
    }

    /// Move the cursor and describe the new position.
    pub fn apply(&mut self, op: Op) -> CursorView {
        let (position, flow) = step(self.mode, self.scan.layout(), self.position, op);
        trace!(?op, from = ?self.position, to = ?position, ?flow, "cursor step");
        self.position = position;
        self.render(flow)
    }

    /// Describe the current position without moving.
    pub fn view(&self) -> CursorView {
        self.render(Flow::Continue)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Scan boundaries, for driving [`step`] directly.
    pub fn layout(&self) -> Layout<'_> {
        self.scan.layout()
    }

    /// Full plaintext (encoding: as typed; decoding: decoded so far).
    pub fn plain_text(&self) -> String {
        self.scan.plain.concat()
    }

    /// Full encoded text (decoding: as typed up to the first bad digit).
    pub fn encoded_text(&self) -> String {
        self.scan.encoded.iter().collect()
    }

    /// Last bit index of each coded symbol.
    pub fn ending_bits(&self) -> &[usize] {
        &self.scan.ending_bit
    }

    /// Where the driving text stopped being codable, if it did.
    pub fn error(&self) -> Option<&ScanError> {
        self.scan.error.as_ref()
    }

    /// Symbols over their codewords in two aligned lines.
    ///
    /// Bits that do not complete a codeword are appended to the second line.
    pub fn alignment(&self) -> (String, String) {
        let mut symbols = String::new();
        let mut codes = String::new();
        for (index, symbol) in self.scan.plain.iter().enumerate() {
            let shown = escape_symbol(symbol);
            let code = if index < self.scan.ending_bit.len() {
                self.scan.bits(self.scan.segment_bits(index))
            } else {
                String::new()
            };
            let width = 1 + shown.chars().count().max(code.chars().count());
            symbols.push_str(&format!("{:<width$}", shown, width = width));
            codes.push_str(&format!("{:<width$}", code, width = width));
        }

        let coded = self.scan.layout().bit_after(self.scan.ending_bit.len());
        if self.scan.encoded.len() > coded {
            codes.push_str(&self.scan.bits(coded..self.scan.encoded.len()));
        }
        (symbols, codes)
    }

    fn rebuild(&mut self, model: &CodeModel, mode: Mode, text: &str) -> CursorView {
        self.mode = mode;
        self.source = text.to_string();
        self.scan = match mode {
            Mode::Encoding => Scan::from_plain(model, text),
            Mode::Decoding => Scan::from_encoded(model, text),
        };

        let (plain, coded) = self.alignment();
        debug!(
            ?mode,
            symbols = self.scan.plain.len(),
            bits = self.scan.encoded.len(),
            error = ?self.scan.error,
            "cursor rebuilt\nplain: {}\ncoded: {}",
            plain,
            coded
        );
        self.reset()
    }

    fn render(&self, flow: Flow) -> CursorView {
        let scan = &self.scan;
        let n = scan.ending_bit.len();
        let Position { symbol: c, bit: b } = self.position;

        let segments: Vec<Segment> = (0..c.min(n))
            .map(|index| {
                let bits = scan.segment_bits(index);
                Segment {
                    symbol_index: index,
                    symbol: Some(scan.plain[index].clone()),
                    codeword: scan.bits(bits.clone()),
                    bits,
                }
            })
            .collect();

        let mut status = None;
        let mut error_at = None;
        let mut active_segment = None;

        if c > n {
            // Encoding stepped onto the first symbol with no codeword
            error_at = Some(n);
            status = Some(Status::UnknownSymbol {
                symbol: scan.plain[n].clone(),
            });
        } else {
            let start = scan.layout().bit_after(c);
            if b > start {
                let mut pending = start..b;
                match &scan.error {
                    Some(ScanError::NonBinaryDigit { offset, digit }) if *offset == b - 1 => {
                        error_at = Some(*offset);
                        status = Some(Status::NonBinaryDigit { digit: *digit });
                        pending.end -= 1;
                    }
                    Some(ScanError::DeadEnd { offset }) if *offset == b - 1 => {
                        error_at = Some(*offset);
                        status = Some(Status::DeadEnd {
                            bits: scan.bits(start..b),
                        });
                        pending.end -= 1;
                    }
                    _ => {
                        status = Some(Status::Partial {
                            bits: scan.bits(start..b),
                        });
                    }
                }
                if !pending.is_empty() {
                    active_segment = Some(Segment {
                        symbol_index: c,
                        symbol: None,
                        codeword: scan.bits(pending.clone()),
                        bits: pending,
                    });
                }
            } else if let Some(last) = segments.last() {
                let symbol = last.symbol.clone().unwrap_or_default();
                let codeword = last.codeword.clone();
                status = Some(match self.mode {
                    Mode::Encoding => Status::Encoded { symbol, codeword },
                    Mode::Decoding => Status::Decoded { codeword, symbol },
                });
                active_segment = Some(last.clone());
            }
        }

        let status = status.unwrap_or_else(|| {
            if scan.plain.is_empty() && scan.encoded.is_empty() {
                Status::Idle
            } else {
                Status::Ready(self.mode)
            }
        });

        CursorView {
            mode: self.mode,
            position: self.position,
            consumed_plain: scan.plain[..c.min(scan.plain.len())].concat(),
            consumed_encoded: scan.bits(0..b.min(scan.encoded.len())),
            segments,
            active_segment,
            status,
            error_at,
            flow,
        }
    }
}
