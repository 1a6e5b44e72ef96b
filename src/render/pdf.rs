//! PDF output by driving an external HTML-to-PDF engine.
//!
//! Page layout, fonts, and pagination belong to the engine (WeasyPrint
//! by default); this module only locates the binary and feeds it HTML
//! on stdin.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{PdfError, Result};

/// Engine binary looked up on PATH when none is configured.
pub const DEFAULT_ENGINE: &str = "weasyprint";

/// Configuration for PDF generation.
#[derive(Debug, Clone, Default)]
pub struct PdfConfig {
    /// Engine binary; a bare name is looked up on PATH.
    pub engine: Option<PathBuf>,
    /// Base URL the engine resolves relative resources against,
    /// typically the input file's directory.
    pub base_url: Option<String>,
}

/// Locate the engine binary, honoring an explicit override.
fn find_engine(config: &PdfConfig) -> Result<PathBuf> {
    let engine = config
        .engine
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENGINE));

    match which::which(&engine) {
        Ok(path) => {
            log::info!("using PDF engine {}", path.display());
            Ok(path)
        }
        Err(_) => Err(PdfError::EngineNotFound(engine.to_string_lossy().into_owned()).into()),
    }
}

/// Feed `html` to the engine, writing its PDF to `out` ("-" for
/// stdout).
fn run_engine(html: &str, config: &PdfConfig, out: &Path) -> Result<Vec<u8>> {
    let engine = find_engine(config)?;

    let mut cmd = Command::new(&engine);
    cmd.arg("-").arg(out);
    if let Some(ref base) = config.base_url {
        cmd.arg("--base-url").arg(base);
    }
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(PdfError::Spawn)?;

    if let Some(mut stdin) = child.stdin.take() {
        // An engine that exits early closes the pipe; let the exit
        // status report the failure instead of the broken pipe.
        if let Err(e) = stdin.write_all(html.as_bytes()) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(PdfError::Spawn(e).into());
            }
        }
    }

    let output = child.wait_with_output().map_err(PdfError::Spawn)?;
    if !output.status.success() {
        return Err(PdfError::EngineFailed {
            engine: engine.to_string_lossy().into_owned(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
        .into());
    }

    Ok(output.stdout)
}

/// Convert rendered HTML to PDF bytes.
pub fn html_to_pdf(html: &str, config: &PdfConfig) -> Result<Vec<u8>> {
    run_engine(html, config, Path::new("-"))
}

/// Convert rendered HTML to a PDF file at `path`.
pub fn html_to_pdf_file(html: &str, config: &PdfConfig, path: impl AsRef<Path>) -> Result<()> {
    run_engine(html, config, path.as_ref())?;
    Ok(())
}
