//! Rendering layer: math substitution, HTML output, PDF delegation.

pub mod html;
pub mod math;
pub mod pdf;

pub use html::{markdown_to_html, render_html, HtmlConfig, SyntaxHighlighter};
pub use math::{
    render_math, render_math_segments, MathCache, MathRenderer, MathmlSvgRenderer,
    DISPLAY_FONT_SIZE, INLINE_FONT_SIZE,
};
pub use pdf::{html_to_pdf, html_to_pdf_file, PdfConfig};

/// Escape HTML special characters.
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
