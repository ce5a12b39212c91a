//! Core conversion modules
//!
//! This module contains the worksheet parser and LaTeX renderer:
//! - `tokenizer`: marker-level splitting of worksheet text
//! - `markup`: HTML to LaTeX translation for rich text output
//! - `output`: output record decoding and rendering
//! - `cell`, `worksheet`: the parsed document

pub mod cell;
pub mod context;
pub mod markup;
pub mod output;
pub mod tokenizer;
pub mod worksheet;

// Re-export main types and functions
pub use cell::Cell;
pub use context::{RenderContext, RenderOptions};
pub use markup::html_to_latex;
pub use output::{
    render_input, render_outputs, render_record, FileOutput, OutputKind, OutputPart, OutputRecord,
};
pub use worksheet::Worksheet;
