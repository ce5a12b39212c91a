//! Constants for the worksheet format and the generated LaTeX
//!
//! This module contains:
//! - The reserved marker characters of the `.sagews` serialization
//! - Per-cell visibility flag codes
//! - Media classification and download defaults
//! - The fixed LaTeX preamble shared by every generated document

// ============================================================================
// Worksheet Markers
// ============================================================================

/// Marker opening a cell, also closing the cell header.
pub const CELL_MARKER: char = '\u{FE20}';

/// Marker separating cell input from output, and output records from each other.
pub const OUTPUT_MARKER: char = '\u{FE21}';

/// Length, in characters, of the identifier at the start of a cell header.
pub const UUID_LEN: usize = 36;

// ============================================================================
// Cell Flags
// ============================================================================

/// Flag code: the cell's input is hidden.
pub const HIDE_INPUT: char = 'i';

/// Flag code: the cell's output is hidden.
pub const HIDE_OUTPUT: char = 'o';

// ============================================================================
// Output Rendering
// ============================================================================

/// Column at which stdout/stderr text is hard-wrapped.
pub const WRAP_WIDTH: usize = 90;

/// File extensions that are embedded as graphics rather than linked.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png", "eps", "pdf", "svg"];

/// Server that hosts blobs for file outputs without an explicit url.
pub const DEFAULT_SITE: &str = "https://cloud.sagemath.com";

/// Environment variable overriding [`DEFAULT_SITE`].
pub const SITE_ENV_VAR: &str = "SAGEWS_SITE";

/// Path fragment identifying a file that lives in the user's own project storage.
pub const RAW_PATH_MARKER: &str = "/raw/";

/// Colour used for stderr blocks, defined in [`LATEX_PREAMBLE`].
pub const STDERR_COLOR: &str = "dredcolor";

/// Width of the dashed line a horizontal rule turns into.
pub const RULE_WIDTH: usize = 80;

// ============================================================================
// LaTeX Document
// ============================================================================

/// Document class, packages, listing style and colours.
pub const LATEX_PREAMBLE: &str = r"
\documentclass{article}
\usepackage{fullpage}
\usepackage{amsmath}
\usepackage{amssymb}
\usepackage{graphicx}
\usepackage{etoolbox}
\usepackage{url}
\usepackage{hyperref}
\makeatletter
\preto{\@verbatim}{\topsep=0pt \partopsep=0pt }
\makeatother
\usepackage{listings}
\lstdefinelanguage{Sage}[]{Python}
{morekeywords={True,False,sage,singular},
sensitive=true}
\lstset{
  showtabs=False,
  showspaces=False,
  showstringspaces=False,
  commentstyle={\ttfamily\color{dredcolor}},
  keywordstyle={\ttfamily\color{dbluecolor}\bfseries},
  stringstyle ={\ttfamily\color{dgraycolor}\bfseries},
  backgroundcolor=\color{lightyellow},
  language = Sage,
  basicstyle={\ttfamily},
  aboveskip=1em,
  belowskip=0.1em,
  breaklines=true,
  prebreak = \raisebox{0ex}[0ex][0ex]{\ensuremath{\backslash}},
  %frame=single
}
\usepackage{color}
\definecolor{lightyellow}{rgb}{1,1,.92}
\definecolor{dblackcolor}{rgb}{0.0,0.0,0.0}
\definecolor{dbluecolor}{rgb}{.01,.02,0.7}
\definecolor{dredcolor}{rgb}{0.8,0,0}
\definecolor{dgraycolor}{rgb}{0.30,0.3,0.30}
\definecolor{graycolor}{rgb}{0.35,0.35,0.35}
";

/// Closes the document body.
pub const LATEX_END: &str = r"\end{document}";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_are_distinct() {
        assert_ne!(CELL_MARKER, OUTPUT_MARKER);
        assert_ne!(HIDE_INPUT, HIDE_OUTPUT);
    }

    #[test]
    fn test_preamble_defines_stderr_color() {
        assert!(LATEX_PREAMBLE.contains(&format!("\\definecolor{{{}}}", STDERR_COLOR)));
        assert!(LATEX_PREAMBLE.contains("\\usepackage{listings}"));
    }
}
