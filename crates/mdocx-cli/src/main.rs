// SPDX-License-Identifier: AGPL-3.0-or-later
//! mdocx - convert a Markdown requirements document to DOCX

use anyhow::{bail, Context, Result};
use clap::Parser;
use mdocx_core::{
    Document, DocxRenderer, MarkdownParser, ParseConfig, ParserExt, RenderConfig, RendererExt,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_INPUT: &str = "Project Documents/SOFTWARE_REQUIREMENTS_SPECIFICATION.md";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Markdown file to convert
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output .docx path (defaults to the input path with a .docx extension)
    output: Option<PathBuf>,

    /// TOML file overriding fonts, colours and table style
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the reassembled document as JSON instead of writing a document
    #[arg(long)]
    dump_blocks: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if !args.input.exists() {
        println!("Error: File not found: {}", args.input.display());
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => RenderConfig::from_path(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    if args.dump_blocks {
        println!("{}", read_document(&args.input)?.to_json()?);
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("docx"));
    if same_file(&args.input, &output) {
        bail!("output {} would overwrite the input", output.display());
    }

    println!("Reading {}...", args.input.display());
    let doc = read_document(&args.input)?;

    println!("Converting {} lines to DOCX...", doc.meta.line_count);
    info!(words = doc.word_count(), "converting");

    println!("Saving to {}...", output.display());
    DocxRenderer::new()
        .render_to_path(&doc, &output, &config)
        .with_context(|| format!("write {}", output.display()))?;

    report(&output)
}

fn read_document(input: &Path) -> Result<Document> {
    MarkdownParser::new()
        .parse_path(input, &ParseConfig::default())
        .with_context(|| format!("read {}", input.display()))
}

/// Both paths name the same existing file
fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn report(output: &Path) -> Result<()> {
    let size = std::fs::metadata(output)
        .with_context(|| format!("stat {}", output.display()))?
        .len();
    println!("✓ Document created successfully!");
    println!(
        "  Size: {} bytes ({:.2} KB)",
        group_thousands(size),
        size as f64 / 1024.0
    );
    println!("  Location: {}", output.display());
    Ok(())
}

/// `12345` -> `12,345`
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(38_912), "38,912");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.docx");
        std::fs::write(&input, "# Notes\n").unwrap();

        assert!(same_file(&input, &input.with_extension("docx")));
        assert!(same_file(&input, &dir.path().join(".").join("notes.docx")));
        assert!(!same_file(&input, &dir.path().join("notes.out.docx")));
    }

    #[test]
    fn test_default_paths() {
        let args = Args::parse_from(["mdocx"]);
        assert_eq!(args.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(args.output, None);
        assert_eq!(
            args.input.with_extension("docx"),
            PathBuf::from("Project Documents/SOFTWARE_REQUIREMENTS_SPECIFICATION.docx")
        );
    }
}
