use std::path::PathBuf;

use clap::Parser;
use mathpress::render::SyntaxHighlighter;
use mathpress::{convert_file, HtmlConfig, PdfConfig};

#[derive(Parser)]
#[command(name = "mathpress")]
#[command(version, about = "Convert Markdown with LaTeX math to print-ready PDF", long_about = None)]
struct Cli {
    /// Input Markdown file
    #[arg(value_name = "INPUT", required_unless_present = "list_themes")]
    input: Option<PathBuf>,

    /// Output file (default: input with a .pdf extension; a .html output
    /// writes the rendered page instead of invoking the PDF engine)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Syntax highlighting theme for code blocks
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Document title (overrides front matter)
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,

    /// HTML-to-PDF engine binary to invoke
    #[arg(long, value_name = "PATH")]
    pdf_engine: Option<PathBuf>,

    /// List available highlighting themes and exit
    #[arg(long)]
    list_themes: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.list_themes {
        for name in SyntaxHighlighter::theme_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let input = cli
        .input
        .ok_or_else(|| anyhow::anyhow!("input file required"))?;

    let html_config = HtmlConfig {
        title: cli.title,
        theme: cli.theme,
        ..Default::default()
    };
    let pdf_config = PdfConfig {
        engine: cli.pdf_engine,
        ..Default::default()
    };

    let written = convert_file(&input, cli.output.as_deref(), &html_config, &pdf_config)?;

    let label = match written.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") => "HTML",
        _ => "PDF",
    };
    println!("✓ {label} created successfully: {}", written.display());

    Ok(())
}
