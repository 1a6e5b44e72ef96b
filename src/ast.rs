//! Document model: front matter metadata plus a fence-aware
//! segmentation of the body.

/// A complete parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Front matter metadata
    pub metadata: Metadata,
    /// Document body as an ordered sequence of segments
    pub segments: Vec<Segment>,
}

/// Document metadata from TOML front matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,
    /// Syntax-highlighting theme for fenced code blocks
    pub theme: Option<String>,
}

/// One region of the document body.
///
/// Fenced code blocks are carried verbatim so later passes can rewrite
/// prose without ever touching code. Concatenating the segments in
/// order reproduces the body byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Prose, subject to math substitution
    Text(String),
    /// A fenced code block, including both fence lines
    CodeFence(String),
}

impl Segment {
    /// The raw text of this segment.
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Text(s) | Segment::CodeFence(s) => s,
        }
    }
}
