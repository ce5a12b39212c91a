//! # sagews2pdf
//!
//! Convert Sage worksheets (`.sagews`) to PDF via LaTeX.
//!
//! ## Features
//!
//! - **Worksheet Parsing**: Splits the marker-delimited `.sagews` text into cells,
//!   input code, flags and JSON output records, never failing on bad content
//! - **Output Rendering**: stdout/stderr, HTML, math and file outputs to LaTeX
//! - **Media**: Images are copied from project storage or downloaded; SVG is
//!   converted to PNG
//! - **PDF**: Runs the LaTeX engine in a scratch directory that is always removed
//!
//! ## Usage Examples
//!
//! ### LaTeX Only
//!
//! ```rust
//! use sagews2pdf::worksheet_to_latex;
//!
//! let latex = worksheet_to_latex("\u{FE20}0123456789abcdef0123456789abcdef0123\u{FE20}\n2+2", "Notes", "");
//! assert!(latex.contains("\\title{Notes}"));
//! assert!(latex.contains("\\begin{lstlisting}\n2+2\n\\end{lstlisting}"));
//! ```
//!
//! ### HTML Output
//!
//! ```rust
//! use sagews2pdf::html_to_latex;
//!
//! assert_eq!(html_to_latex("<h1>Title</h1>"), "\\section{Title}");
//! ```

/// Core conversion modules
pub mod core;

/// Data layer - markers, tag mappings and the LaTeX preamble
pub mod data;

/// Feature modules - media and PDF generation
pub mod features;

/// Utility modules
pub mod utils;

// Re-export core types and functions
pub use core::{
    html_to_latex, Cell, OutputKind, OutputPart, OutputRecord, RenderContext, RenderOptions,
    Worksheet,
};

// Re-export feature modules
pub use features::media;
pub use features::typeset;
pub use features::{sagews_to_pdf, ConvertOptions};

// Re-export utilities
pub use utils::error::{ConvertError, ConvertResult};

/// Convert worksheet text to a complete LaTeX document
///
/// Media are not fetched; image outputs render as "problem loading"
/// placeholders. An empty `title` leaves the title blank.
pub fn worksheet_to_latex(text: &str, title: &str, author: &str) -> String {
    Worksheet::parse(text).render(title, author)
}
