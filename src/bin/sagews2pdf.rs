//! sagews2pdf CLI - Convert a Sage worksheet to PDF via LaTeX

use anyhow::Context;
use clap::Parser;
use sagews2pdf::{sagews_to_pdf, typeset::pdf_path, ConvertOptions, Worksheet};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "sagews2pdf")]
#[command(version)]
#[command(about = "Convert a sagews worksheet to a pdf file via latex", long_about = None)]
struct Cli {
    /// Name of sagews file (required)
    filename: PathBuf,

    /// Author name for printout
    #[arg(long, default_value = "")]
    author: String,

    /// Title for printout (defaults to the filename)
    #[arg(long, default_value = "")]
    title: String,

    /// LaTeX engine to run
    #[arg(long, default_value = "pdflatex")]
    engine: String,

    /// Print the generated LaTeX to stdout instead of building a PDF.
    /// Media are not downloaded in this mode.
    #[arg(long)]
    latex: bool,

    /// Also write the generated LaTeX next to the PDF
    #[arg(long)]
    keep_tex: bool,

    /// Directory to create the scratch build directory in
    #[arg(long)]
    scratch_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.latex {
        let worksheet = Worksheet::from_file(&cli.filename)
            .with_context(|| format!("reading {}", cli.filename.display()))?;
        println!("{}", worksheet.render(&cli.title, &cli.author));
        return Ok(());
    }

    let options = ConvertOptions {
        keep_tex: cli.keep_tex,
        scratch_parent: cli.scratch_dir,
        ..ConvertOptions::default()
    }
    .with_title(cli.title)
    .with_author(cli.author)
    .with_engine(cli.engine);

    println!(
        "converting: {} --> {}",
        cli.filename.display(),
        pdf_path(&cli.filename).display()
    );

    match sagews_to_pdf(&cli.filename, &options)
        .with_context(|| format!("converting {}", cli.filename.display()))?
    {
        Some(pdf) => {
            println!("Created {}", pdf.display());
            Ok(())
        }
        None => {
            eprintln!("No PDF was produced; see the LaTeX output above");
            std::process::exit(1);
        }
    }
}
