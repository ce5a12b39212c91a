//! Output records and their LaTeX rendering
//!
//! Each output record is one JSON object. Its keys say what it carries, and a
//! single record may carry several kinds at once:
//!
//! | key        | payload                       | LaTeX                         |
//! |------------|-------------------------------|-------------------------------|
//! | `stdout`   | text                          | wrapped `verbatim`            |
//! | `stderr`   | text                          | red wrapped `verbatim`        |
//! | `html`     | HTML                          | [`html_to_latex`]             |
//! | `interact` | widget state                  | nothing                       |
//! | `tex`      | `{tex, display}`              | `$..$` or `$$..$$`            |
//! | `file`     | `{filename, url, uuid}`       | graphic, `\url` or `verbatim` |
//!
//! Decoding keeps the kinds in this fixed order, so rendering never depends on
//! JSON key order.

use crate::core::context::RenderContext;
use crate::core::markup::html_to_latex;
use crate::data::constants::{HIDE_INPUT, HIDE_OUTPUT, STDERR_COLOR};
use crate::features::media::{file_target, plan_file, resolve_image, MediaPlan};
use crate::utils::error::ConvertResult;
use crate::utils::wrap::wrap_text;
use serde_json::Value;

/// Kinds of output, in rendering order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Stdout,
    Stderr,
    Html,
    Interact,
    Tex,
    File,
}

impl OutputKind {
    /// Every kind in rendering order
    pub const ALL: [OutputKind; 6] = [
        OutputKind::Stdout,
        OutputKind::Stderr,
        OutputKind::Html,
        OutputKind::Interact,
        OutputKind::Tex,
        OutputKind::File,
    ];

    /// JSON key of this kind
    pub fn key(self) -> &'static str {
        match self {
            OutputKind::Stdout => "stdout",
            OutputKind::Stderr => "stderr",
            OutputKind::Html => "html",
            OutputKind::Interact => "interact",
            OutputKind::Tex => "tex",
            OutputKind::File => "file",
        }
    }
}

/// A file output payload. All fields are optional in the worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileOutput {
    pub filename: Option<String>,
    pub url: Option<String>,
    pub uuid: Option<String>,
}

/// One decoded piece of an output record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPart {
    Stdout(String),
    Stderr(String),
    Html(String),
    Interact,
    Tex { tex: String, display: bool },
    File(FileOutput),
}

impl OutputPart {
    pub fn kind(&self) -> OutputKind {
        match self {
            OutputPart::Stdout(_) => OutputKind::Stdout,
            OutputPart::Stderr(_) => OutputKind::Stderr,
            OutputPart::Html(_) => OutputKind::Html,
            OutputPart::Interact => OutputKind::Interact,
            OutputPart::Tex { .. } => OutputKind::Tex,
            OutputPart::File(_) => OutputKind::File,
        }
    }
}

/// One output record: the parts it carries, in rendering order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputRecord {
    parts: Vec<OutputPart>,
}

impl OutputRecord {
    /// Parse one JSON fragment.
    pub fn parse(fragment: &str) -> ConvertResult<Self> {
        let value: Value = serde_json::from_str(fragment)?;
        Ok(Self::from_value(&value))
    }

    /// Decode a JSON value. Unknown keys are ignored and missing or mistyped
    /// sub-fields become empty, so this never fails.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let parts = OutputKind::ALL
            .iter()
            .filter_map(|kind| {
                let payload = map.get(kind.key())?;
                Some(match kind {
                    OutputKind::Stdout => OutputPart::Stdout(text(payload)),
                    OutputKind::Stderr => OutputPart::Stderr(text(payload)),
                    OutputKind::Html => OutputPart::Html(text(payload)),
                    OutputKind::Interact => OutputPart::Interact,
                    OutputKind::Tex => tex_part(payload),
                    OutputKind::File => OutputPart::File(FileOutput {
                        filename: field(payload, "filename"),
                        url: field(payload, "url"),
                        uuid: field(payload, "uuid"),
                    }),
                })
            })
            .collect();

        Self { parts }
    }

    pub fn parts(&self) -> &[OutputPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn has(&self, kind: OutputKind) -> bool {
        self.parts.iter().any(|part| part.kind() == kind)
    }
}

/// String payloads as is, `null` as empty, anything else as its JSON text
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// `{"tex": .., "display": ..}`; a bare string is accepted as inline math.
/// Display math is used whenever `display` is present and not `false`/`null`.
fn tex_part(value: &Value) -> OutputPart {
    match value {
        Value::String(tex) => OutputPart::Tex {
            tex: tex.clone(),
            display: false,
        },
        _ => OutputPart::Tex {
            tex: value.get("tex").map(text).unwrap_or_default(),
            display: value
                .get("display")
                .is_some_and(|d| !matches!(d, Value::Bool(false) | Value::Null)),
        },
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render the input code of a cell.
///
/// Hidden input still produces an empty listing; blank input produces nothing.
pub fn render_input(code: &str, flags: &str) -> String {
    if flags.contains(HIDE_INPUT) {
        return "\\begin{lstlisting}\n\\end{lstlisting}".to_string();
    }
    if code.trim().is_empty() {
        return String::new();
    }
    format!("\\begin{{lstlisting}}\n{}\n\\end{{lstlisting}}", code)
}

/// Render all output records of a cell, or nothing when output is hidden.
pub fn render_outputs(records: &[OutputRecord], flags: &str, ctx: &RenderContext) -> String {
    if flags.contains(HIDE_OUTPUT) {
        return String::new();
    }
    records
        .iter()
        .map(|record| render_record(record, ctx))
        .collect()
}

/// Render one record: every part it carries, in rendering order.
pub fn render_record(record: &OutputRecord, ctx: &RenderContext) -> String {
    record
        .parts()
        .iter()
        .map(|part| render_part(part, ctx))
        .collect()
}

pub fn render_part(part: &OutputPart, ctx: &RenderContext) -> String {
    let width = ctx.options.wrap_width;
    match part {
        OutputPart::Stdout(s) => {
            format!("\\begin{{verbatim}}{}\\end{{verbatim}}", wrap_text(s, width))
        }
        OutputPart::Stderr(s) => format!(
            "{{\\color{{{}}}\\begin{{verbatim}}{}\\end{{verbatim}}}}",
            STDERR_COLOR,
            wrap_text(s, width)
        ),
        OutputPart::Html(html) => html_to_latex(html),
        // Widgets have no static form
        OutputPart::Interact => String::new(),
        OutputPart::Tex { tex, display: true } => format!("$${}$$", tex),
        OutputPart::Tex { tex, display: false } => format!("${}$", tex),
        OutputPart::File(file) => render_file(file, ctx),
    }
}

fn render_file(file: &FileOutput, ctx: &RenderContext) -> String {
    let target = file_target(
        file.url.as_deref(),
        file.filename.as_deref(),
        file.uuid.as_deref(),
        &ctx.options.site,
    );
    let plan = plan_file(&target, &ctx.options.home_dir, &ctx.options.work_dir);

    match plan {
        MediaPlan::Link(url) => format!("\\url{{{}}}", url),
        MediaPlan::Literal(path) => format!("\\begin{{verbatim}}[{}]\\end{{verbatim}}", path),
        image => match resolve_image(&image, ctx.media) {
            Some(name) => format!("\\includegraphics[width=\\textwidth]{{{}}}", name),
            None => format!("(problem loading \\verb|'{}'|)", target.filename),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::RenderOptions;
    use crate::features::media::MemoryMediaStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(value: Value) -> String {
        let options = RenderOptions::default();
        render_record(&OutputRecord::from_value(&value), &RenderContext::offline(&options))
    }

    #[test]
    fn test_stdout() {
        assert_eq!(
            render(json!({"stdout": "2\n"})),
            "\\begin{verbatim}2\\end{verbatim}"
        );
    }

    #[test]
    fn test_stdout_is_wrapped() {
        let long = "x ".repeat(60);
        let out = render(json!({ "stdout": long }));
        let body = out
            .strip_prefix("\\begin{verbatim}")
            .and_then(|s| s.strip_suffix("\\end{verbatim}"))
            .unwrap();
        assert_eq!(body.lines().count(), 2);
        assert!(body.lines().all(|l| l.len() <= 90));
    }

    #[test]
    fn test_stderr_is_colored() {
        assert_eq!(
            render(json!({"stderr": "oops"})),
            "{\\color{dredcolor}\\begin{verbatim}oops\\end{verbatim}}"
        );
    }

    #[test]
    fn test_html() {
        assert_eq!(render(json!({"html": "<h2>Hi</h2>"})), "\\subsection{Hi}");
    }

    #[test]
    fn test_interact_renders_nothing() {
        assert_eq!(render(json!({"interact": {"id": "x", "controls": []}})), "");
    }

    #[test]
    fn test_tex() {
        assert_eq!(render(json!({"tex": {"tex": "x^2", "display": true}})), "$$x^2$$");
        assert_eq!(render(json!({"tex": {"tex": "x^2"}})), "$x^2$");
        assert_eq!(render(json!({"tex": {"tex": "x^2", "display": false}})), "$x^2$");
        assert_eq!(render(json!({"tex": {}})), "$$");
    }

    #[test]
    fn test_fixed_order_regardless_of_keys() {
        let out = render(json!({"tex": {"tex": "y"}, "stdout": "a", "html": "b"}));
        assert_eq!(out, "\\begin{verbatim}a\\end{verbatim}b$y$");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        assert_eq!(render(json!({"done": true, "once": false})), "");
        assert!(OutputRecord::from_value(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_non_string_payload() {
        assert_eq!(
            render(json!({"stdout": 42})),
            "\\begin{verbatim}42\\end{verbatim}"
        );
    }

    #[test]
    fn test_file_placeholder_when_unavailable() {
        let out = render(json!({"file": {"filename": "plot.png", "uuid": "abc"}}));
        assert_eq!(out, "(problem loading \\verb|'plot.png'|)");
    }

    #[test]
    fn test_file_fetched_image() {
        let options = RenderOptions::default();
        let mut store = MemoryMediaStore::new();
        store.add_remote("https://cloud.sagemath.com/blobs/plot.png?uuid=abc");
        let ctx = RenderContext::new(&options, &store);
        let record = OutputRecord::from_value(&json!({"file": {"filename": "plot.png", "uuid": "abc"}}));
        assert_eq!(
            render_record(&record, &ctx),
            "\\includegraphics[width=\\textwidth]{plot.png}"
        );
    }

    #[test]
    fn test_file_link_and_literal() {
        assert_eq!(
            render(json!({"file": {"url": "https://x.org/data.csv"}})),
            "\\url{https://x.org/data.csv}"
        );
        assert_eq!(
            render(json!({"file": {"filename": "data.sobj", "uuid": "u"}})),
            "\\url{https://cloud.sagemath.com/blobs/data.sobj?uuid=u}"
        );
        assert_eq!(
            render(json!({"file": {"url": "local/data.csv"}})),
            "\\begin{verbatim}[local/data.csv]\\end{verbatim}"
        );
    }

    #[test]
    fn test_file_missing_fields() {
        assert_eq!(
            render(json!({"file": {}})),
            "\\url{https://cloud.sagemath.com/blobs/?uuid=}"
        );
    }

    #[test]
    fn test_render_input() {
        assert_eq!(
            render_input("1+1", ""),
            "\\begin{lstlisting}\n1+1\n\\end{lstlisting}"
        );
        assert_eq!(render_input("   \n", ""), "");
        assert_eq!(
            render_input("secret", "i"),
            "\\begin{lstlisting}\n\\end{lstlisting}"
        );
    }

    #[test]
    fn test_hidden_output() {
        let options = RenderOptions::default();
        let ctx = RenderContext::offline(&options);
        let records = vec![
            OutputRecord::from_value(&json!({"stdout": "one"})),
            OutputRecord::from_value(&json!({"html": "<b>two</b>"})),
        ];
        assert_eq!(render_outputs(&records, "o", &ctx), "");
        assert!(render_outputs(&records, "", &ctx).contains("one"));
    }

    #[test]
    fn test_parse_invalid_json_is_error() {
        assert!(matches!(
            OutputRecord::parse("{\"stdout\": "),
            Err(crate::utils::error::ConvertError::Json(_))
        ));
        let record = OutputRecord::parse(r#"{"file":{},"stdout":"a"}"#).unwrap();
        assert_eq!(record.parts()[0].kind(), OutputKind::Stdout);
        assert!(record.has(OutputKind::File));
    }
}
