//! Whole worksheets and the LaTeX document around them

use crate::core::cell::Cell;
use crate::core::context::{RenderContext, RenderOptions};
use crate::core::tokenizer::split_cells;
use crate::data::constants::{LATEX_END, LATEX_PREAMBLE};
use crate::utils::error::ConvertResult;
use std::fmt::Write;
use std::ops::Index;
use std::path::Path;
use tracing::debug;

/// A parsed worksheet: its cells in document order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Worksheet {
    cells: Vec<Cell>,
    /// Title used when none is given at render time
    default_title: String,
}

impl Worksheet {
    /// Parse worksheet text. Never fails; text without markers is one cell.
    pub fn parse(document: &str) -> Self {
        let cells: Vec<Cell> = split_cells(document).map(Cell::parse).collect();
        debug!("parsed {} cells", cells.len());
        Self {
            cells,
            default_title: String::new(),
        }
    }

    /// Read and parse a `.sagews` file. The path becomes the default title.
    pub fn from_file(path: impl AsRef<Path>) -> ConvertResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text).with_default_title(path.display().to_string()))
    }

    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    pub fn default_title(&self) -> &str {
        &self.default_title
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Preamble, title block and table of contents.
    pub fn latex_preamble(&self, title: &str, author: &str) -> String {
        let title = if title.is_empty() {
            self.default_title()
        } else {
            title
        };

        let mut latex = String::from(LATEX_PREAMBLE);
        let _ = writeln!(latex, "\\title{{{}}}", escape_underscores(title));
        let _ = writeln!(latex, "\\author{{{}}}", escape_underscores(author));
        latex.push_str("\\begin{document}\n");
        latex.push_str("\\maketitle\n");
        latex.push_str("\\tableofcontents\n");
        latex
    }

    /// Render the complete LaTeX document without fetching any media.
    pub fn render(&self, title: &str, author: &str) -> String {
        let options = RenderOptions::default();
        self.render_with(title, author, &RenderContext::offline(&options))
    }

    /// Render the complete LaTeX document.
    pub fn render_with(&self, title: &str, author: &str, ctx: &RenderContext) -> String {
        let body = self
            .cells
            .iter()
            .map(|cell| cell.render_with(ctx))
            .collect::<Vec<_>>()
            .join("\n");

        let mut latex = self.latex_preamble(title, author);
        latex.push_str(&body);
        latex.push_str(LATEX_END);
        latex
    }
}

impl Index<usize> for Worksheet {
    type Output = Cell;

    fn index(&self, index: usize) -> &Cell {
        &self.cells[index]
    }
}

impl<'a> IntoIterator for &'a Worksheet {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Underscore is a control character in LaTeX text mode
fn escape_underscores(s: &str) -> String {
    s.replace('_', "\\_")
}
