//! # mathpress
//!
//! Convert Markdown with LaTeX math into print-ready HTML and PDF.
//!
//! The library rewrites `$…$` and `$$…$$` math spans into embedded
//! SVG images while leaving fenced code blocks untouched, converts the
//! result to HTML with syntax-highlighted code and a print stylesheet
//! (A4 pages, page counters), and can drive an external HTML-to-PDF
//! engine (WeasyPrint) for the final document.
//!
//! ## Features
//!
//! - **Math to images**: Inline `$...$` and display `$$...$$`
//!   expressions become self-contained SVG data URIs, so the output
//!   needs no scripts or font files
//! - **Code protection**: Fenced code blocks (``` or ~~~) are never
//!   scanned for math, so `$` in code samples survives verbatim
//! - **Render cache**: Repeated expressions render once per
//!   `(expression, font size)` pair
//! - **Syntax highlighting**: Fenced code via syntect, theme
//!   selectable per document
//! - **TOML front matter**: `title` and `theme` between `+++` lines
//! - **PDF delegation**: Page layout stays with the external engine;
//!   this crate only produces the HTML and runs the binary
//!
//! ## Quick Start
//!
//! ```rust
//! use mathpress::{convert_to_html, HtmlConfig};
//!
//! let markdown = "\
//! # Energy
//!
//! The identity $E = mc^2$ still holds.
//! ";
//!
//! let html = convert_to_html(markdown, &HtmlConfig::default()).unwrap();
//! assert!(html.contains("math-inline"));
//! assert!(html.contains("data:image/svg+xml;base64,"));
//! ```
//!
//! ## Front Matter
//!
//! ```text
//! +++
//! title = "My Document"
//! theme = "Solarized (light)"
//! +++
//! ```
//!
//! ## Pipeline
//!
//! [`parse`] splits a document into front matter and a fence-aware
//! body segmentation. [`render_math`] rewrites math spans in the prose
//! segments through a [`MathRenderer`] and a caller-owned
//! [`MathCache`]. [`render_html`] converts the substituted body to a
//! standalone page, and [`html_to_pdf`] hands that page to the engine.
//! The one-step functions below wire the stages together.
//!
//! ## Crate Features
//!
//! - `cli` (default): builds the `mathpress` command-line binary

pub mod ast;
pub mod error;
pub mod parser;
pub mod render;

use std::path::{Path, PathBuf};

// Convenience re-exports
pub use ast::{Document, Metadata, Segment};
pub use error::{Error, MathError, ParseError, PdfError, RenderError, Result};
pub use parser::{parse, segment, serialize, split_spans, Span};
pub use render::{
    html_to_pdf, html_to_pdf_file, render_html, render_math, HtmlConfig, MathCache, MathRenderer,
    MathmlSvgRenderer, PdfConfig, DISPLAY_FONT_SIZE, INLINE_FONT_SIZE,
};

/// Convert Markdown with math to an HTML page in one step.
///
/// Parses front matter, renders math spans with the built-in SVG
/// backend and a fresh cache, and assembles the page per `config`.
///
/// # Example
///
/// ```rust
/// use mathpress::{convert_to_html, HtmlConfig};
///
/// let html = convert_to_html("# Hello $x$", &HtmlConfig::default()).unwrap();
/// assert!(html.contains("<h1 id=\"hello\">"));
/// ```
pub fn convert_to_html(input: &str, config: &HtmlConfig) -> Result<String> {
    let doc = parse(input)?;

    let renderer = MathmlSvgRenderer::new();
    let mut cache = MathCache::new();
    let segments = render::math::render_math_segments(&doc.segments, &renderer, &mut cache)?;
    let body = serialize(&segments);

    render_html(&body, &doc.metadata, config)
}

/// Convert Markdown with math to PDF bytes in one step.
///
/// Requires the configured PDF engine (WeasyPrint by default) to be
/// installed.
pub fn convert_to_pdf(
    input: &str,
    html_config: &HtmlConfig,
    pdf_config: &PdfConfig,
) -> Result<Vec<u8>> {
    let html = convert_to_html(input, html_config)?;
    html_to_pdf(&html, pdf_config)
}

/// Convert a Markdown file, returning the written path.
///
/// With no explicit output the PDF lands next to the input with a
/// `.pdf` extension. An output ending in `.html` or `.htm` writes the
/// rendered page instead of invoking the PDF engine. Unless
/// configured otherwise, the engine resolves relative resources
/// against the input file's directory.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: Option<&Path>,
    html_config: &HtmlConfig,
    pdf_config: &PdfConfig,
) -> Result<PathBuf> {
    let input = input.as_ref();
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("pdf"),
    };

    let source = std::fs::read_to_string(input)?;
    let html = convert_to_html(&source, html_config)?;

    let wants_html = output
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        .unwrap_or(false);

    if wants_html {
        std::fs::write(&output, html)?;
    } else {
        let mut pdf_config = pdf_config.clone();
        if pdf_config.base_url.is_none() {
            let canonical = std::fs::canonicalize(input)?;
            if let Some(dir) = canonical.parent() {
                pdf_config.base_url = Some(dir.to_string_lossy().into_owned());
            }
        }
        html_to_pdf_file(&html, &pdf_config, &output)?;
    }

    Ok(output)
}
