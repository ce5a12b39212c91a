//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Error types and result types
//! - Hard wrapping of plain text output

pub mod error;
pub mod wrap;

// Re-export commonly used items
pub use error::{ConvertError, ConvertResult};
pub use wrap::{wrap_line, wrap_text};
