// invoice-pdf-service/src/renderers/pdf.rs

use crate::config::PdfConfig;
use async_trait::async_trait;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::Command;
use tempfile::Builder;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Substrings an engine prints when its native runtime cannot be loaded.
///
/// Matching on free text is brittle. It only happens here, and callers see
/// `ConvertError::DependencyUnavailable` instead.
const MISSING_RUNTIME_MARKERS: &[&str] = &[
    "cannot load library",
    "DLL load failed",
    "error while loading shared libraries",
];

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("PDF engine dependency unavailable: {reason}")]
    DependencyUnavailable { reason: String, remediation: String },

    #[error("PDF conversion failed: {0}")]
    Failed(String),

    #[error("PDF conversion IO error: {0}")]
    Io(#[from] io::Error),
}

#[async_trait]
pub trait PdfConverter: Send + Sync {
    async fn convert(&self, html: &str) -> Result<Vec<u8>, ConvertError>;

    fn engine(&self) -> &str;
}

/// Drives the WeasyPrint command-line tool.
#[derive(Debug, Clone)]
pub struct WeasyPrintConverter {
    binary: String,
    extra_args: Vec<String>,
    runtime_path: Option<String>,
    search_path: Option<OsString>,
}

impl WeasyPrintConverter {
    pub fn new(config: &PdfConfig) -> Self {
        let search_path = config
            .runtime_path
            .as_deref()
            .and_then(prepend_to_search_path);

        Self {
            binary: config.binary.clone(),
            extra_args: config.extra_args.clone(),
            runtime_path: config.runtime_path.clone(),
            search_path,
        }
    }

    fn dependency_unavailable(&self, reason: impl Into<String>) -> ConvertError {
        let location = self
            .runtime_path
            .as_deref()
            .map(|p| format!("'{}'", p))
            .unwrap_or_else(|| "its runtime library directory".to_string());

        ConvertError::DependencyUnavailable {
            reason: reason.into(),
            remediation: format!(
                "The PDF engine '{}' or its native runtime (GTK+/Pango) failed to load. \
                 Install WeasyPrint with its GTK+ runtime and make sure {} exists and is \
                 configured as pdf.runtime_path (INVOICE__PDF__RUNTIME_PATH), e.g. C:\\msys64\\mingw64\\bin.",
                self.binary, location
            ),
        }
    }

    fn run_engine(&self, html: &str) -> Result<Vec<u8>, ConvertError> {
        let mut html_file = Builder::new().suffix(".html").tempfile()?;
        let pdf_file = Builder::new().suffix(".pdf").tempfile()?;

        html_file.write_all(html.as_bytes())?;
        html_file.flush()?;

        debug!("HTML written to: {:?}", html_file.path());

        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.extra_args)
            .arg(html_file.path())
            .arg(pdf_file.path());
        if let Some(path) = &self.search_path {
            cmd.env("PATH", path);
        }

        debug!("Running PDF engine: {:?}", cmd);

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(self.dependency_unavailable(format!(
                    "failed to start '{}': {}",
                    self.binary, e
                )));
            }
            Err(e) => return Err(e.into()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if indicates_missing_runtime(&stderr) {
                return Err(self.dependency_unavailable(stderr));
            }
            return Err(ConvertError::Failed(if stderr.is_empty() {
                format!("'{}' exited with {}", self.binary, output.status)
            } else {
                stderr
            }));
        }

        let pdf_bytes = std::fs::read(pdf_file.path())?;
        if pdf_bytes.is_empty() {
            return Err(ConvertError::Failed(format!(
                "'{}' produced an empty document",
                self.binary
            )));
        }

        Ok(pdf_bytes)
    }
}

#[async_trait]
impl PdfConverter for WeasyPrintConverter {
    async fn convert(&self, html: &str) -> Result<Vec<u8>, ConvertError> {
        let engine = self.clone();
        let html = html.to_owned();

        let pdf_bytes = tokio::task::spawn_blocking(move || engine.run_engine(&html))
            .await
            .map_err(|e| ConvertError::Failed(format!("PDF engine task aborted: {}", e)))??;

        info!(
            engine = %self.binary,
            size_kb = pdf_bytes.len() / 1024,
            "PDF generated successfully"
        );

        Ok(pdf_bytes)
    }

    fn engine(&self) -> &str {
        &self.binary
    }
}

fn indicates_missing_runtime(message: &str) -> bool {
    MISSING_RUNTIME_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Best-effort: a missing directory is logged and left for the first
/// conversion to trip over.
fn prepend_to_search_path(runtime_path: &str) -> Option<OsString> {
    let runtime_dir = PathBuf::from(runtime_path);
    if !runtime_dir.is_dir() {
        warn!(
            runtime_path,
            "PDF runtime directory not found, PDF conversion may fail"
        );
        return None;
    }

    let current = std::env::var_os("PATH").unwrap_or_default();
    let dirs = std::iter::once(runtime_dir).chain(std::env::split_paths(&current));

    match std::env::join_paths(dirs) {
        Ok(joined) => {
            info!(runtime_path, "PDF runtime directory prepended to engine PATH");
            Some(joined)
        }
        Err(e) => {
            warn!(runtime_path, error = %e, "Could not build engine PATH");
            None
        }
    }
}
