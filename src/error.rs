//! Error types for the mathpress library.

use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Math error: {0}")]
    Math(#[from] MathError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur during parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid front matter: {0}")]
    FrontMatter(String),
}

/// Errors that occur while rendering a math expression to an image.
#[derive(Debug, Error)]
pub enum MathError {
    #[error("Invalid LaTeX in `{expression}`: {message}")]
    InvalidLatex { expression: String, message: String },

    #[error("Math backend error: {0}")]
    Backend(String),
}

/// Errors that occur while producing HTML.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown syntax theme: {0}")]
    UnknownTheme(String),

    #[error("Syntax highlighting failed: {0}")]
    Highlight(String),
}

/// Errors from driving the external HTML-to-PDF engine.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF engine `{0}` not found on PATH")]
    EngineNotFound(String),

    #[error("PDF engine `{engine}` failed ({status}): {stderr}")]
    EngineFailed {
        engine: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Failed to run PDF engine: {0}")]
    Spawn(#[from] std::io::Error),
}
