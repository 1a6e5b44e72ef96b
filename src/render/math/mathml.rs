//! SVG math image backend.
//!
//! Converts a LaTeX expression to MathML with `latex2mathml`, wraps it
//! in a minimal SVG document, and encodes the result as a
//! `data:image/svg+xml;base64` URI. Pure computation, no external
//! processes or fonts, so the output is deterministic for a given
//! `(expression, font size)` pair.

use base64::{engine::general_purpose::STANDARD, Engine};
use latex2mathml::{latex_to_mathml, DisplayStyle};

use super::{MathRenderer, DISPLAY_FONT_SIZE};
use crate::error::{MathError, Result};

/// Renderer producing self-contained SVG data URIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathmlSvgRenderer;

impl MathmlSvgRenderer {
    /// Create a new renderer.
    pub fn new() -> Self {
        Self
    }
}

/// Rough viewport size for an expression. The page stylesheet does the
/// real sizing; this only keeps the SVG viewport from clipping.
fn approximate_extent(tex: &str, font_size: u32) -> (u32, u32) {
    let glyphs = tex
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '\\' | '{' | '}'))
        .count()
        .max(1) as u32;
    let width = glyphs * (font_size * 3 / 5) + font_size;
    let height = if font_size >= DISPLAY_FONT_SIZE {
        font_size * 5 / 2
    } else {
        font_size * 7 / 5
    };
    (width, height)
}

impl MathRenderer for MathmlSvgRenderer {
    fn render(&self, tex: &str, font_size: u32) -> Result<String> {
        let style = if font_size >= DISPLAY_FONT_SIZE {
            DisplayStyle::Block
        } else {
            DisplayStyle::Inline
        };

        let mathml = latex_to_mathml(tex, style).map_err(|e| MathError::InvalidLatex {
            expression: tex.to_owned(),
            message: e.to_string(),
        })?;

        let (width, height) = approximate_extent(tex, font_size);
        let svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\
<foreignObject width=\"100%\" height=\"100%\">\
<div xmlns=\"http://www.w3.org/1999/xhtml\" style=\"font-size:{fs}px\">{math}</div>\
</foreignObject></svg>",
            w = width,
            h = height,
            fs = font_size,
            math = mathml
        );

        Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::math::INLINE_FONT_SIZE;

    #[test]
    fn test_produces_a_data_uri() {
        let renderer = MathmlSvgRenderer::new();
        let src = renderer.render("x^2", INLINE_FONT_SIZE).unwrap();
        assert!(src.starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let renderer = MathmlSvgRenderer::new();
        let a = renderer.render("\\frac{a}{b}", DISPLAY_FONT_SIZE).unwrap();
        let b = renderer.render("\\frac{a}{b}", DISPLAY_FONT_SIZE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_font_sizes_produce_distinct_images() {
        let renderer = MathmlSvgRenderer::new();
        let display = renderer.render("x", DISPLAY_FONT_SIZE).unwrap();
        let inline = renderer.render("x", INLINE_FONT_SIZE).unwrap();
        assert_ne!(display, inline);
    }

    #[test]
    fn test_payload_is_svg_wrapped_mathml() {
        let renderer = MathmlSvgRenderer::new();
        let src = renderer.render("x+y", INLINE_FONT_SIZE).unwrap();
        let payload = src.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let decoded = String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap();
        assert!(decoded.starts_with("<svg"));
        assert!(decoded.contains("<math"));
    }
}
