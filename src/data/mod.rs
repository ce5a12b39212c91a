//! Data layer - Static mappings and constants
//!
//! This module contains all static data used for worksheet conversion:
//! - Worksheet markers and cell flag codes
//! - The LaTeX preamble
//! - HTML tag mappings

pub mod constants;
pub mod tags;

// Re-export commonly used items
pub use constants::{
    CELL_MARKER, DEFAULT_SITE, HIDE_INPUT, HIDE_OUTPUT, IMAGE_EXTENSIONS, LATEX_END,
    LATEX_PREAMBLE, OUTPUT_MARKER, WRAP_WIDTH,
};
pub use tags::{tag_rule, TagRule, FALLBACK, HTML_TAGS};
