//! Fence-aware segmentation of a Markdown body.
//!
//! Splits a document into [`Segment`]s so that transformation passes
//! can rewrite prose while leaving fenced code blocks untouched. The
//! scan is line oriented: a fence opens on a line whose
//! leading-whitespace-stripped form starts with ``` or ~~~, and closes
//! on the next line starting with the same marker. Everything from the
//! opening line through the closing line, terminators included, is
//! captured verbatim in one [`Segment::CodeFence`].

use crate::ast::Segment;

/// Returns the fence marker a line opens with, if any.
fn fence_marker(line: &str) -> Option<&'static str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// Splits a Markdown body into prose and fenced-code segments.
///
/// A fence left open at end of input is not a fence: its lines flow
/// back into the trailing [`Segment::Text`] unchanged, so later passes
/// treat them as ordinary prose.
///
/// [`serialize`] is the exact inverse: concatenating the returned
/// segments reproduces `input` byte for byte.
pub fn segment(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    // (marker, buffered lines) while inside an open fence
    let mut fence: Option<(&'static str, String)> = None;

    for line in input.split_inclusive('\n') {
        if let Some((marker, buf)) = fence.as_mut() {
            buf.push_str(line);
            if line.trim_start().starts_with(*marker) {
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::CodeFence(std::mem::take(buf)));
                fence = None;
            }
        } else if let Some(marker) = fence_marker(line) {
            fence = Some((marker, line.to_string()));
        } else {
            text.push_str(line);
        }
    }

    if let Some((_, buf)) = fence {
        text.push_str(&buf);
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    segments
}

/// Concatenates segments back into a single body string.
pub fn serialize(segments: &[Segment]) -> String {
    let mut out = String::with_capacity(segments.iter().map(|s| s.as_str().len()).sum());
    for segment in segments {
        out.push_str(segment.as_str());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prose_only_is_one_text_segment() {
        let input = "Hello\n\nworld.\n";
        assert_eq!(segment(input), vec![Segment::Text(input.to_string())]);
    }

    #[test]
    fn test_fence_is_captured_verbatim() {
        let input = "before\n```rust\nlet x = 1;\n```\nafter\n";
        assert_eq!(
            segment(input),
            vec![
                Segment::Text("before\n".to_string()),
                Segment::CodeFence("```rust\nlet x = 1;\n```\n".to_string()),
                Segment::Text("after\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_round_trip_is_byte_exact() {
        let input = "# Title\n\n```py\nprint('$x$')\n```\n\ntext\n\n~~~\nmore\n~~~\nend";
        assert_eq!(serialize(&segment(input)), input);
    }

    #[test]
    fn test_tilde_fence_is_recognized() {
        let input = "~~~\ncode\n~~~\n";
        assert_eq!(
            segment(input),
            vec![Segment::CodeFence(input.to_string())]
        );
    }

    #[test]
    fn test_backtick_line_does_not_close_tilde_fence() {
        let input = "~~~\n```\nstill code\n~~~\n";
        assert_eq!(
            segment(input),
            vec![Segment::CodeFence(input.to_string())]
        );
    }

    #[test]
    fn test_indented_fence_is_recognized() {
        let input = "  ```\n  code\n  ```\n";
        assert_eq!(
            segment(input),
            vec![Segment::CodeFence(input.to_string())]
        );
    }

    #[test]
    fn test_unterminated_fence_stays_prose() {
        let input = "before\n```rust\nlet x = 1;\n";
        assert_eq!(segment(input), vec![Segment::Text(input.to_string())]);
    }

    #[test]
    fn test_fence_without_trailing_newline_still_closes() {
        let input = "```\ncode\n```";
        assert_eq!(
            segment(input),
            vec![Segment::CodeFence(input.to_string())]
        );
        assert_eq!(serialize(&segment(input)), input);
    }

    #[test]
    fn test_empty_input_yields_no_segments() {
        assert_eq!(segment(""), Vec::new());
        assert_eq!(serialize(&[]), "");
    }
}
