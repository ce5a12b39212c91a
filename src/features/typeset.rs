//! PDF generation through an external LaTeX engine
//!
//! The worksheet is rendered inside a fresh scratch directory, which also
//! receives all media, and the engine runs there twice so that the table of
//! contents resolves. The scratch directory is removed when conversion ends,
//! whether it succeeded or not.

use crate::core::context::{RenderContext, RenderOptions};
use crate::core::worksheet::Worksheet;
use crate::features::media::StdMediaStore;
use crate::utils::error::{ConvertError, ConvertResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

/// Name of the generated LaTeX file inside the scratch directory
const TEX_NAME: &str = "tmp.tex";

/// Name of the PDF the engine produces from [`TEX_NAME`]
const PDF_NAME: &str = "tmp.pdf";

/// Options for worksheet to PDF conversion
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Document title; the worksheet path when empty
    pub title: String,
    pub author: String,
    /// LaTeX engine (default: "pdflatex")
    pub engine: String,
    /// Number of engine runs (default: 2)
    pub passes: usize,
    /// SVG to PNG converter (default: "convert")
    pub rasterizer: String,
    /// Also write `<basename>.tex` next to the PDF
    pub keep_tex: bool,
    /// Where the scratch directory is created; the system temp dir when unset
    pub scratch_parent: Option<PathBuf>,
    pub render: RenderOptions,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            engine: "pdflatex".to_string(),
            passes: 2,
            rasterizer: "convert".to_string(),
            keep_tex: false,
            scratch_parent: None,
            render: RenderOptions::from_env(),
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    pub fn with_scratch_parent(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_parent = Some(dir.into());
        self
    }
}

/// `<input-basename>.pdf`, next to the input
pub fn pdf_path(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}

/// Convert a worksheet file to PDF.
///
/// Returns the PDF path, or `None` when the engine ran but produced no PDF.
/// Failing to read the worksheet or to start the engine is an error.
pub fn sagews_to_pdf(input: &Path, options: &ConvertOptions) -> ConvertResult<Option<PathBuf>> {
    if input.file_stem().is_none() {
        return Err(ConvertError::invalid(format!(
            "not a worksheet file: {}",
            input.display()
        )));
    }
    let output = pdf_path(input);
    let worksheet = Worksheet::from_file(input)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix("sagews2pdf");
    let scratch = match &options.scratch_parent {
        Some(parent) => builder.tempdir_in(parent)?,
        None => builder.tempdir()?,
    };
    info!("building in {}", scratch.path().display());

    let render = options.render.clone().with_work_dir(scratch.path());
    let media = StdMediaStore::new(scratch.path()).with_rasterizer(&options.rasterizer);
    let latex = worksheet.render_with(
        &options.title,
        &options.author,
        &RenderContext::new(&render, &media),
    );

    fs::write(scratch.path().join(TEX_NAME), &latex)?;
    if options.keep_tex {
        fs::write(input.with_extension("tex"), &latex)?;
    }

    for pass in 1..=options.passes {
        info!("{} pass {}/{}", options.engine, pass, options.passes);
        run_engine(&options.engine, scratch.path())?;
    }

    let produced = scratch.path().join(PDF_NAME);
    if !produced.exists() {
        warn!("{} produced no PDF", options.engine);
        return Ok(None);
    }
    // rename fails across filesystems, and the scratch directory is dropped anyway
    fs::copy(&produced, &output)?;
    Ok(Some(output))
}

fn run_engine(engine: &str, work_dir: &Path) -> ConvertResult<()> {
    let status = Command::new(engine)
        .arg("-interaction=nonstopmode")
        .arg(TEX_NAME)
        .current_dir(work_dir)
        .status()
        .map_err(|e| ConvertError::process(engine, e))?;
    if !status.success() {
        // LaTeX exits non-zero on recoverable errors and often still writes a PDF
        warn!("{} exited with {}", engine, status);
    }
    Ok(())
}
