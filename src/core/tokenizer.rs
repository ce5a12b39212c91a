//! Tokenizer for the `.sagews` marker format
//!
//! A worksheet is plain text with two reserved characters, [`CELL_MARKER`] and
//! [`OUTPUT_MARKER`], used in four split points:
//!
//! ```text
//! document := cell ( CELL_SEPARATOR cell )*
//! cell     := header HEADER_END code ( OUTPUT_START output )?
//! header   := CELL_MARKER* id{36} flags
//! output   := output_id ( OUTPUT_MARKER record )*
//! ```
//!
//! Every split is total: a missing separator produces empty segments instead
//! of an error.

use crate::data::constants::{CELL_MARKER, OUTPUT_MARKER, UUID_LEN};

/// Separates one cell from the next.
pub const CELL_SEPARATOR: &str = "\n\u{FE20}";

/// Ends the cell header; the input code follows.
pub const HEADER_END: &str = "\u{FE20}\n";

/// Starts the output section of a cell.
pub const OUTPUT_START: &str = "\n\u{FE21}";

/// The raw pieces of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellSegments<'a> {
    /// Header with leading cell markers removed (id followed by flags)
    pub header: &'a str,
    /// Input code
    pub code: &'a str,
    /// Everything after [`OUTPUT_START`], if present
    pub output: Option<&'a str>,
}

/// The raw pieces of a cell's output section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputSegments<'a> {
    pub id: &'a str,
    /// Non-empty record fragments, each expected to hold one JSON object
    pub records: Vec<&'a str>,
}

/// Split a whole document into cell chunks, in document order.
///
/// A document without any separator is a single chunk.
pub fn split_cells(document: &str) -> impl Iterator<Item = &str> {
    document.split(CELL_SEPARATOR)
}

/// Split one chunk into header, input code and output section.
pub fn split_cell(chunk: &str) -> CellSegments<'_> {
    let (input, output) = match chunk.split_once(OUTPUT_START) {
        Some((input, output)) => (input, Some(output)),
        None => (chunk, None),
    };

    match input.split_once(HEADER_END) {
        Some((header, code)) => CellSegments {
            header: header.trim_start_matches(CELL_MARKER),
            code,
            output,
        },
        None => CellSegments {
            output,
            ..Default::default()
        },
    }
}

/// Split a header into its fixed-length id and the trailing flag codes.
pub fn split_header(header: &str) -> (&str, &str) {
    let boundary = header
        .char_indices()
        .nth(UUID_LEN)
        .map(|(i, _)| i)
        .unwrap_or(header.len());
    header.split_at(boundary)
}

/// Split an output section into its id and record fragments.
///
/// Blank fragments (between doubled markers, or trailing whitespace) are
/// skipped.
pub fn split_output(output: &str) -> OutputSegments<'_> {
    let mut parts = output.split(OUTPUT_MARKER);
    let id = parts.next().unwrap_or_default();
    let records = parts.filter(|part| !part.trim().is_empty()).collect();
    OutputSegments { id, records }
}
