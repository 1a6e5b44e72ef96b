//! Math span scanning for prose text.
//!
//! Carves a text run into plain text and LaTeX math spans. Display
//! spans (`$$…$$`, may cross line breaks) are located first; inline
//! spans (`$…$`, single line) are then located in the remaining text.
//! Scanning never fails and allocates nothing: spans borrow from the
//! input.

/// One run of a prose segment, as carved up by the math scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span<'a> {
    /// Plain text, emitted unchanged
    Text(&'a str),
    /// A display expression from `$$…$$`, delimiters stripped
    Display(&'a str),
    /// An inline expression from `$…$`, delimiters stripped
    Inline(&'a str),
}

/// Finds the next `$$` at or after `from`.
fn find_double(text: &str, from: usize) -> Option<usize> {
    text.get(from..).and_then(|t| t.find("$$")).map(|i| from + i)
}

/// Splits a text run into [`Span`]s.
///
/// Display spans pair the leftmost `$$` with the nearest later `$$`
/// that leaves at least one character between them (shortest match).
/// A `$$` with no later pair is left to the inline pass, which never
/// opens a span at a `$` that is followed by another `$`.
///
/// An inline span opens at a `$` that is neither preceded by `\` nor
/// followed by another `$`, and closes at the nearest later `$` on
/// the same line that is neither preceded by `\` nor followed by
/// another `$`. A `$` that fails the closing rules does not end the
/// span; the scan continues past it.
pub fn split_spans(text: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(open) = find_double(text, cursor) {
        // Shortest non-empty body: skip a close that would sit flush
        // against the opener. The retry offset lands on the second of
        // two `$` bytes, so it is always a character boundary.
        let close = match find_double(text, open + 2) {
            Some(c) if c == open + 2 => find_double(text, open + 3),
            found => found,
        };
        let Some(close) = close else { break };
        scan_inline(&text[cursor..open], &mut spans);
        spans.push(Span::Display(&text[open + 2..close]));
        cursor = close + 2;
    }
    scan_inline(&text[cursor..], &mut spans);

    spans
}

/// Scans one display-free stretch for inline spans.
fn scan_inline<'a>(gap: &'a str, spans: &mut Vec<Span<'a>>) {
    let bytes = gap.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'$'
            && (i == 0 || bytes[i - 1] != b'\\')
            && bytes.get(i + 1) != Some(&b'$')
        {
            if let Some(close) = find_inline_close(bytes, i + 1) {
                if start < i {
                    spans.push(Span::Text(&gap[start..i]));
                }
                spans.push(Span::Inline(&gap[i + 1..close]));
                start = close + 1;
                i = close + 1;
                continue;
            }
        }
        i += 1;
    }

    if start < bytes.len() {
        spans.push(Span::Text(&gap[start..]));
    }
}

/// Finds the closing `$` for an inline span whose body starts at
/// `from`. Stops at the end of the line.
fn find_inline_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut j = from;
    while j < bytes.len() {
        match bytes[j] {
            b'\n' => return None,
            b'$' if j > from
                && bytes[j - 1] != b'\\'
                && bytes.get(j + 1) != Some(&b'$') =>
            {
                return Some(j);
            }
            _ => {}
        }
        j += 1;
    }
    None
}
