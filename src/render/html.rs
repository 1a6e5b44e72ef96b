//! HTML renderer: Markdown body conversion, syntax highlighting, and
//! standalone page assembly.

use std::collections::HashSet;

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::ast::Metadata;
use crate::error::{RenderError, Result};
use crate::render::escape_html;

/// Syntax theme used when neither the config nor the front matter
/// names one.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Configuration for HTML rendering.
#[derive(Debug, Clone)]
pub struct HtmlConfig {
    /// Document title; falls back to front matter, then to "Document".
    pub title: Option<String>,
    /// Syntax theme name; falls back to front matter, then to
    /// [`DEFAULT_THEME`].
    pub theme: Option<String>,
    /// Language attribute for the `<html>` element.
    pub lang: String,
    /// Additional CSS appended after the built-in stylesheet.
    pub custom_css: Option<String>,
    /// Whether to generate a complete page or just the body content.
    pub standalone: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            title: None,
            theme: None,
            lang: "en".to_string(),
            custom_css: None,
            standalone: true,
        }
    }
}

/// Fenced-code highlighter backed by syntect's built-in syntax and
/// theme sets.
#[derive(Debug)]
pub struct SyntaxHighlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl SyntaxHighlighter {
    /// Load the default syntax set and the named theme.
    pub fn new(theme_name: &str) -> Result<Self> {
        let theme = ThemeSet::load_defaults()
            .themes
            .remove(theme_name)
            .ok_or_else(|| RenderError::UnknownTheme(theme_name.to_string()))?;

        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    /// Names of the built-in themes.
    pub fn theme_names() -> Vec<String> {
        ThemeSet::load_defaults().themes.keys().cloned().collect()
    }

    /// Highlight one code block as styled HTML.
    ///
    /// An unrecognized language falls back to plain text rather than
    /// guessing.
    pub fn highlight(&self, code: &str, language: &str) -> Result<String> {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(language)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        highlighted_html_for_string(code, &self.syntaxes, syntax, &self.theme)
            .map_err(|e| RenderError::Highlight(e.to_string()).into())
    }
}

/// Convert a Markdown body to HTML, highlighting fenced code blocks.
///
/// Tables, strikethrough, footnotes, and task lists are enabled.
/// Headings get slugified `id` anchors, and a paragraph holding only
/// `[TOC]` expands to a table of contents linking to them. Raw HTML in
/// the body (such as substituted math images) passes through
/// untouched.
pub fn markdown_to_html(markdown: &str, highlighter: &SyntaxHighlighter) -> Result<String> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut events = Vec::new();
    let mut code_lang: Option<String> = None;
    let mut code_buf = String::new();
    let mut in_code_block = false;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                code_buf.clear();
                code_lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(|s| s.to_string())
                    }
                    CodeBlockKind::Indented => None,
                };
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                let lang = code_lang.take().unwrap_or_default();
                let highlighted = highlighter.highlight(&code_buf, &lang)?;
                events.push(Event::Html(highlighted.into()));
            }
            Event::Text(text) if in_code_block => {
                code_buf.push_str(&text);
            }
            other => events.push(other),
        }
    }

    let headings = collect_headings(&events);

    let mut body_events = Vec::with_capacity(events.len());
    let mut next_heading = 0;
    let mut i = 0;
    while i < events.len() {
        if let Some(consumed) = toc_marker_at(&events[i..]) {
            body_events.push(Event::Html(render_toc(&headings).into()));
            i += consumed;
            continue;
        }
        match &events[i] {
            Event::Start(Tag::Heading { level, classes, attrs, .. }) => {
                body_events.push(Event::Start(Tag::Heading {
                    level: *level,
                    id: Some(headings[next_heading].id.clone().into()),
                    classes: classes.clone(),
                    attrs: attrs.clone(),
                }));
                next_heading += 1;
            }
            other => body_events.push(other.clone()),
        }
        i += 1;
    }

    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, body_events.into_iter());
    Ok(out)
}

/// A document heading, collected for anchor ids and the table of
/// contents.
struct Heading {
    level: u32,
    title: String,
    id: String,
}

/// Collect the headings of an event stream in order, assigning each a
/// unique anchor id from its text content.
fn collect_headings(events: &[Event]) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut current: Option<(u32, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((*level as u32, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current.take() {
                    headings.push(Heading {
                        level,
                        title,
                        id: String::new(),
                    });
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, title)) = current.as_mut() {
                    title.push_str(text);
                }
            }
            _ => {}
        }
    }

    let mut used = HashSet::new();
    for heading in &mut headings {
        heading.id = unique_id(&slugify(&heading.title), &mut used);
    }

    headings
}

/// Heading text to an anchor id: lowercased, punctuation dropped,
/// whitespace and hyphen runs collapsed to a single hyphen.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            slug.extend(c.to_lowercase());
        } else if (c.is_whitespace() || c == '-') && !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Disambiguate a repeated (or empty) anchor id with a numeric suffix.
fn unique_id(base: &str, used: &mut HashSet<String>) -> String {
    let mut id = base.to_string();
    let mut n = 0;
    while id.is_empty() || used.contains(&id) {
        n += 1;
        id = format!("{}_{}", base, n);
    }
    used.insert(id.clone());
    id
}

/// Detects a paragraph holding nothing but the `[TOC]` marker at the
/// start of `events`, returning how many events it spans.
fn toc_marker_at(events: &[Event]) -> Option<usize> {
    if !matches!(events.first(), Some(Event::Start(Tag::Paragraph))) {
        return None;
    }

    // The marker may arrive split across several text events.
    let mut text = String::new();
    for (i, event) in events.iter().enumerate().skip(1) {
        match event {
            Event::Text(t) => text.push_str(t),
            Event::End(TagEnd::Paragraph) => {
                return (text.trim() == "[TOC]").then_some(i + 1);
            }
            _ => return None,
        }
    }
    None
}

/// Render the collected headings as a nested list of anchor links.
fn render_toc(headings: &[Heading]) -> String {
    let mut out = String::from("<div class=\"toc\">\n");
    let mut current = 0;

    for heading in headings {
        while current < heading.level {
            out.push_str("<ul>\n");
            current += 1;
        }
        while current > heading.level {
            out.push_str("</ul>\n");
            current -= 1;
        }
        out.push_str(&format!(
            "<li><a href=\"#{}\">{}</a></li>\n",
            heading.id,
            escape_html(&heading.title)
        ));
    }

    while current > 0 {
        out.push_str("</ul>\n");
        current -= 1;
    }
    out.push_str("</div>\n");

    out
}

/// Render a Markdown body to HTML.
///
/// `metadata` supplies fallbacks for the title and theme from front
/// matter; `config` overrides both. With `standalone` set this
/// produces a complete printable page, otherwise just the body
/// fragment.
pub fn render_html(markdown: &str, metadata: &Metadata, config: &HtmlConfig) -> Result<String> {
    let theme = config
        .theme
        .as_deref()
        .or(metadata.theme.as_deref())
        .unwrap_or(DEFAULT_THEME);
    log::debug!("highlighting code with theme {}", theme);

    let highlighter = SyntaxHighlighter::new(theme)?;
    let body = markdown_to_html(markdown, &highlighter)?;

    if !config.standalone {
        return Ok(body);
    }

    let title = config
        .title
        .as_deref()
        .or(metadata.title.as_deref())
        .unwrap_or("Document");

    Ok(render_page(&body, title, &config.lang, config.custom_css.as_deref()))
}

/// Assemble a complete HTML page around a rendered body.
fn render_page(body: &str, title: &str, lang: &str, custom_css: Option<&str>) -> String {
    let mut out = String::with_capacity(body.len() + PAGE_STYLES.len() + 256);

    out.push_str("<!DOCTYPE html>\n");
    out.push_str(&format!("<html lang=\"{}\">\n<head>\n", escape_html(lang)));
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    out.push_str("<style>\n");
    out.push_str(PAGE_STYLES);
    out.push_str("</style>\n");
    if let Some(css) = custom_css {
        out.push_str("<style>\n");
        out.push_str(css);
        out.push_str("\n</style>\n");
    }
    out.push_str("</head>\n<body>\n");
    out.push_str(body);
    out.push_str("</body>\n</html>\n");

    out
}

/// Print stylesheet: A4 pages with page counters, GitHub-like
/// typography with a CJK-capable font stack, and non-clipping code
/// blocks.
const PAGE_STYLES: &str = r#"@page {
    size: A4;
    margin: 2cm;

    /* Page numbers */
    @bottom-left {
        content: counter(page) " / " counter(pages);
        font-family: -apple-system, system-ui, sans-serif;
        font-size: 9pt;
        color: #6e7781;
    }
}

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI",
                 "Noto Sans CJK SC", "PingFang SC", "Microsoft YaHei",
                 "WenQuanYi Micro Hei", Arial, sans-serif;
    font-size: 11pt;
    line-height: 1.6;
    color: #24292f;
}

h1 {
    font-size: 22pt;
    border-bottom: 2px solid #d0d7de;
    padding-bottom: 8px;
    margin-top: 28px;
}
h2 {
    font-size: 16pt;
    border-bottom: 1px solid #d0d7de;
    padding-bottom: 4px;
    margin-top: 22px;
}
h3 { font-size: 13pt; margin-top: 18px; }
h4 { font-size: 12pt; margin-top: 14px; }

/* Inline code */
code {
    font-family: ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, "Liberation Mono", "Courier New", monospace;
    font-size: 10pt;
    background: #f6f8fa;
    border: 1px solid #d0d7de;
    border-radius: 4px;
    padding: 0.1em 0.35em;
}

/* Code blocks; wrap instead of clipping at the page edge */
pre {
    margin: 14px 0;
    background: #f6f8fa;
    border: 1px solid #d0d7de;
    border-radius: 8px;
    padding: 12px 14px;
    white-space: pre-wrap;
    overflow-wrap: anywhere;
    word-break: break-word;
    line-height: 1.45;
    font-size: 9.5pt;
}

/* Math */
.math-block {
    text-align: center;
    margin: 10px 0 14px 0;
}
img.math-display {
    max-width: 100%;
    height: auto;
    display: inline-block;
    margin: 0;
}
img.math-inline {
    height: 1.15em;
    vertical-align: -0.15em;
    display: inline;
    margin: 0;
}

/* Tables */
table {
    border-collapse: collapse;
    width: 100%;
    margin: 16px 0;
}
th, td {
    border: 1px solid #d0d7de;
    padding: 8px 10px;
    text-align: left;
}
th {
    background: #f6f8fa;
    font-weight: 600;
}

img {
    max-width: 100%;
    height: auto;
    display: block;
    margin: 12px auto;
}

blockquote {
    border-left: 4px solid #d0d7de;
    margin: 12px 0;
    padding: 8px 12px;
    background: #f6f8fa;
    color: #57606a;
}

a { color: #0969da; text-decoration: none; }

/* Avoid ugly breaks */
pre, table, blockquote {
    break-inside: avoid;
}
"#;
