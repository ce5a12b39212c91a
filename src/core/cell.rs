//! A single worksheet cell

use crate::core::context::{RenderContext, RenderOptions};
use crate::core::output::{render_input, render_outputs, OutputRecord};
use crate::core::tokenizer::{split_cell, split_header, split_output};
use crate::data::constants::{HIDE_INPUT, HIDE_OUTPUT};
use tracing::warn;

/// One input/output unit of a worksheet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    /// Identifier at the start of the header
    pub input_id: String,
    /// Single-character flag codes following the id (`i`, `o`, ...)
    pub flags: String,
    /// Source code entered by the user
    pub input: String,
    /// Identifier of the output stream
    pub output_id: String,
    /// Decoded output records, in worksheet order
    pub outputs: Vec<OutputRecord>,
}

impl Cell {
    /// Parse one cell chunk.
    ///
    /// A chunk without a header separator has no id, flags or input. Output
    /// fragments that are not valid JSON are skipped.
    pub fn parse(chunk: &str) -> Self {
        let segments = split_cell(chunk);
        let (input_id, flags) = split_header(segments.header);

        let mut cell = Cell {
            input_id: input_id.to_string(),
            flags: flags.to_string(),
            input: segments.code.to_string(),
            ..Default::default()
        };

        if let Some(output) = segments.output {
            let output = split_output(output);
            cell.output_id = output.id.to_string();
            cell.outputs = output
                .records
                .into_iter()
                .filter_map(|fragment| match OutputRecord::parse(fragment) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!("skipping malformed output record in cell {:?}: {}", input_id, e);
                        None
                    }
                })
                .collect();
        }

        cell
    }

    pub fn hides_input(&self) -> bool {
        self.flags.contains(HIDE_INPUT)
    }

    pub fn hides_output(&self) -> bool {
        self.flags.contains(HIDE_OUTPUT)
    }

    /// Render input and output without touching the filesystem or network.
    pub fn render(&self) -> String {
        let options = RenderOptions::default();
        self.render_with(&RenderContext::offline(&options))
    }

    /// Render input followed by every output record.
    pub fn render_with(&self, ctx: &RenderContext) -> String {
        let mut latex = render_input(&self.input, &self.flags);
        latex.push_str(&render_outputs(&self.outputs, &self.flags, ctx));
        latex
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::output::OutputKind;
    use pretty_assertions::assert_eq;

    const ID: &str = "3f2a9c1e-5b7d-4e8a-9f0c-1d2e3f4a5b6c";

    fn chunk(flags: &str, code: &str, outputs: &[&str]) -> String {
        let mut s = format!("\u{FE20}{ID}{flags}\u{FE20}\n{code}");
        if !outputs.is_empty() {
            s.push_str("\n\u{FE21}out-id");
            for o in outputs {
                s.push('\u{FE21}');
                s.push_str(o);
                s.push('\u{FE21}');
            }
        }
        s
    }

    #[test]
    fn test_parse_full_cell() {
        let cell = Cell::parse(&chunk("", "2+2", &[r#"{"stdout":"4\n"}"#, r#"{"done":true}"#]));
        assert_eq!(cell.input_id, ID);
        assert_eq!(cell.flags, "");
        assert_eq!(cell.input, "2+2");
        assert_eq!(cell.output_id, "out-id");
        assert_eq!(cell.outputs.len(), 2);
        assert!(cell.outputs[0].has(OutputKind::Stdout));
    }

    #[test]
    fn test_parse_flags() {
        let cell = Cell::parse(&chunk("io", "x", &[]));
        assert_eq!(cell.flags, "io");
        assert!(cell.hides_input());
        assert!(cell.hides_output());
    }

    #[test]
    fn test_parse_without_separator() {
        let cell = Cell::parse("print('hi')");
        assert_eq!(cell.input_id, "");
        assert_eq!(cell.input, "");
        assert!(cell.outputs.is_empty());
        assert_eq!(cell.render(), "");
    }

    #[test]
    fn test_malformed_record_skipped() {
        let cell = Cell::parse(&chunk("", "x", &["{not json", r#"{"stdout":"ok"}"#]));
        assert_eq!(cell.outputs.len(), 1);
    }

    #[test]
    fn test_render_input_and_output() {
        let cell = Cell::parse(&chunk("", "2+2", &[r#"{"stdout":"4\n"}"#]));
        assert_eq!(
            cell.render(),
            "\\begin{lstlisting}\n2+2\n\\end{lstlisting}\\begin{verbatim}4\\end{verbatim}"
        );
    }

    #[test]
    fn test_render_hidden_output() {
        let cell = Cell::parse(&chunk(
            "o",
            "plot()",
            &[
                r#"{"stdout":"AAA"}"#,
                r#"{"html":"<h1>BBB</h1>"}"#,
                r#"{"file":{"filename":"CCC.png","uuid":"u"}}"#,
            ],
        ));
        let latex = cell.render();
        assert_eq!(cell.outputs.len(), 3);
        assert!(!latex.contains("AAA"));
        assert!(!latex.contains("BBB"));
        assert!(!latex.contains("CCC"));
        assert!(latex.contains("plot()"));
    }

    #[test]
    fn test_render_hidden_input() {
        let cell = Cell::parse(&chunk("i", "secret()", &[r#"{"stdout":"shown"}"#]));
        let latex = cell.render();
        assert!(!latex.contains("secret"));
        assert!(latex.starts_with("\\begin{lstlisting}\n\\end{lstlisting}"));
        assert!(latex.contains("shown"));
    }
}
