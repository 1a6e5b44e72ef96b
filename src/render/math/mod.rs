//! Math substitution: the rendering seam, the render cache, and the
//! pass that rewrites math spans into embedded images.

mod mathml;

pub use self::mathml::MathmlSvgRenderer;

use std::collections::HashMap;

use crate::ast::Segment;
use crate::error::Result;
use crate::parser::{segment, serialize, split_spans, Span};
use crate::render::escape_html;

/// Font size in points for display (`$$…$$`) expressions.
pub const DISPLAY_FONT_SIZE: u32 = 16;

/// Font size in points for inline (`$…$`) expressions.
pub const INLINE_FONT_SIZE: u32 = 12;

/// A backend that renders one LaTeX expression to an image reference.
///
/// The returned string must be self-contained (a data URI) so the
/// produced document has no external file dependencies, and the
/// backend must be deterministic for a given `(tex, font_size)` pair.
/// A failure aborts the whole conversion.
pub trait MathRenderer {
    /// Render `tex` at `font_size` points.
    fn render(&self, tex: &str, font_size: u32) -> Result<String>;
}

/// Cache of rendered expressions, keyed by `(expression, font size)`.
///
/// Constructed and owned by the caller. Passing the same cache to
/// several conversions shares renders across them; separate callers
/// keep separate caches.
#[derive(Debug, Default)]
pub struct MathCache {
    entries: HashMap<(String, u32), String>,
}

impl MathCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct rendered expressions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up `(tex, font_size)`, rendering and storing on a miss.
    ///
    /// The backend runs at most once per distinct key for the lifetime
    /// of the cache.
    pub fn render_cached(
        &mut self,
        renderer: &dyn MathRenderer,
        tex: &str,
        font_size: u32,
    ) -> Result<String> {
        let key = (tex.to_owned(), font_size);
        if let Some(src) = self.entries.get(&key) {
            return Ok(src.clone());
        }

        let src = renderer.render(tex, font_size)?;
        self.entries.insert(key, src.clone());
        Ok(src)
    }
}

/// Replace every math span in one prose run with image markup.
///
/// Display spans become a centered block container; inline spans stay
/// inline. The trimmed expression is carried in the `alt` attribute,
/// HTML-escaped.
pub fn substitute(
    text: &str,
    renderer: &dyn MathRenderer,
    cache: &mut MathCache,
) -> Result<String> {
    let mut out = String::with_capacity(text.len());

    for span in split_spans(text) {
        match span {
            Span::Text(t) => out.push_str(t),
            Span::Display(tex) => {
                let tex = tex.trim();
                let src = cache.render_cached(renderer, tex, DISPLAY_FONT_SIZE)?;
                // Line breaks around the container keep it a raw HTML
                // block for the downstream Markdown converter.
                out.push_str(&format!(
                    "\n<div class=\"math-block\"><img class=\"math-display\" src=\"{}\" alt=\"{}\"></div>\n",
                    src,
                    escape_html(tex)
                ));
            }
            Span::Inline(tex) => {
                let tex = tex.trim();
                let src = cache.render_cached(renderer, tex, INLINE_FONT_SIZE)?;
                out.push_str(&format!(
                    "<img class=\"math-inline\" src=\"{}\" alt=\"{}\">",
                    src,
                    escape_html(tex)
                ));
            }
        }
    }

    Ok(out)
}

/// Apply math substitution to the prose segments of a document body.
///
/// Code fences pass through untouched.
pub fn render_math_segments(
    segments: &[Segment],
    renderer: &dyn MathRenderer,
    cache: &mut MathCache,
) -> Result<Vec<Segment>> {
    let mut out = Vec::with_capacity(segments.len());

    for seg in segments {
        match seg {
            Segment::Text(text) => out.push(Segment::Text(substitute(text, renderer, cache)?)),
            Segment::CodeFence(raw) => out.push(Segment::CodeFence(raw.clone())),
        }
    }

    Ok(out)
}

/// Rewrite every math span in a Markdown body, leaving fenced code
/// untouched: segment, substitute prose, reassemble.
pub fn render_math(
    markdown: &str,
    renderer: &dyn MathRenderer,
    cache: &mut MathCache,
) -> Result<String> {
    let segments = render_math_segments(&segment(markdown), renderer, cache)?;
    Ok(serialize(&segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    /// Backend that counts invocations and echoes its arguments.
    struct CountingRenderer {
        calls: Cell<usize>,
    }

    impl CountingRenderer {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl MathRenderer for CountingRenderer {
        fn render(&self, tex: &str, font_size: u32) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok(format!("data:mock;{}@{}", tex, font_size))
        }
    }

    struct FailingRenderer;

    impl MathRenderer for FailingRenderer {
        fn render(&self, tex: &str, _font_size: u32) -> Result<String> {
            Err(MathError::Backend(format!("cannot render {}", tex)).into())
        }
    }

    #[test]
    fn test_inline_markup_shape() {
        let renderer = CountingRenderer::new();
        let mut cache = MathCache::new();
        let out = substitute("cost $x$ total", &renderer, &mut cache).unwrap();
        assert_eq!(
            out,
            "cost <img class=\"math-inline\" src=\"data:mock;x@12\" alt=\"x\"> total"
        );
    }

    #[test]
    fn test_display_markup_shape() {
        let renderer = CountingRenderer::new();
        let mut cache = MathCache::new();
        let out = substitute("$$E=mc^2$$", &renderer, &mut cache).unwrap();
        assert_eq!(
            out,
            "\n<div class=\"math-block\"><img class=\"math-display\" src=\"data:mock;E=mc^2@16\" alt=\"E=mc^2\"></div>\n"
        );
    }

    #[test]
    fn test_expression_is_trimmed_before_rendering() {
        let renderer = CountingRenderer::new();
        let mut cache = MathCache::new();
        let out = substitute("$$  a+b  $$", &renderer, &mut cache).unwrap();
        assert!(out.contains("src=\"data:mock;a+b@16\""));
        assert!(out.contains("alt=\"a+b\""));
    }

    #[test]
    fn test_multi_line_display_expression() {
        let renderer = CountingRenderer::new();
        let mut cache = MathCache::new();
        let out = substitute("$$\n\\sum_{i=1}^n i\n$$", &renderer, &mut cache).unwrap();
        assert!(out.contains("src=\"data:mock;\\sum_{i=1}^n i@16\""));
        assert_eq!(renderer.calls.get(), 1);
    }

    #[test]
    fn test_repeated_expression_renders_once() {
        let renderer = CountingRenderer::new();
        let mut cache = MathCache::new();
        let out = substitute("$x$ and $x$ and $x$", &renderer, &mut cache).unwrap();
        assert_eq!(renderer.calls.get(), 1);
        assert_eq!(out.matches("data:mock;x@12").count(), 3);
    }

    #[test]
    fn test_same_expression_at_both_sizes_renders_twice() {
        let renderer = CountingRenderer::new();
        let mut cache = MathCache::new();
        substitute("$$x$$ and $x$", &renderer, &mut cache).unwrap();
        assert_eq!(renderer.calls.get(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_is_shared_across_calls() {
        let renderer = CountingRenderer::new();
        let mut cache = MathCache::new();
        render_math("first $x$", &renderer, &mut cache).unwrap();
        render_math("second $x$", &renderer, &mut cache).unwrap();
        assert_eq!(renderer.calls.get(), 1);
    }

    #[test]
    fn test_alt_text_is_html_escaped() {
        let renderer = CountingRenderer::new();
        let mut cache = MathCache::new();
        let out = substitute("$a<b$", &renderer, &mut cache).unwrap();
        assert!(out.contains("alt=\"a&lt;b\""));
    }

    #[test]
    fn test_render_failure_aborts_the_conversion() {
        let mut cache = MathCache::new();
        assert!(substitute("$x$", &FailingRenderer, &mut cache).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_text_without_math_never_calls_the_backend() {
        let renderer = CountingRenderer::new();
        let mut cache = MathCache::new();
        let input = r"\$5 and \$10";
        let out = render_math(input, &renderer, &mut cache).unwrap();
        assert_eq!(out, input);
        assert_eq!(renderer.calls.get(), 0);
    }

    #[test]
    fn test_code_fence_is_immune() {
        let renderer = CountingRenderer::new();
        let mut cache = MathCache::new();
        let input = "```\nprice = \"$x$\"\n```\n";
        let out = render_math(input, &renderer, &mut cache).unwrap();
        assert_eq!(out, input);
        assert_eq!(renderer.calls.get(), 0);
    }

    #[test]
    fn test_block_precedence_over_inline() {
        let renderer = CountingRenderer::new();
        let mut cache = MathCache::new();
        let out = render_math("$$a+b$$", &renderer, &mut cache).unwrap();
        assert_eq!(out.matches("math-display").count(), 1);
        assert!(!out.contains("math-inline"));
        assert_eq!(renderer.calls.get(), 1);
    }

    #[test]
    fn test_unterminated_fence_is_treated_as_prose() {
        let renderer = CountingRenderer::new();
        let mut cache = MathCache::new();
        let out = render_math("```\n$x$\n", &renderer, &mut cache).unwrap();
        assert!(out.starts_with("```\n"));
        assert!(out.contains("math-inline"));
        assert_eq!(renderer.calls.get(), 1);
    }
}
