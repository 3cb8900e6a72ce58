//! HTML → PDF conversion through an external engine.
//!
//! `AppState` holds an `Arc<dyn PdfConverter>` picked at startup from
//! `PDF_CONVERTER`. Both backends hand back the whole file or an error;
//! a truncated or non-PDF output is rejected by [`ensure_pdf`].

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::PdfBackend;

const CONVERT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot run converter: {0}")]
    Io(#[from] std::io::Error),

    #[error("converter exited with {status}: {stderr}")]
    Process { status: String, stderr: String },

    #[error("converter timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("converter service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("converter output is not a complete PDF")]
    Malformed,
}

#[async_trait]
pub trait PdfConverter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Converts a full HTML page. `base_url` is absolute and ends with `/`.
    async fn convert(&self, html: &str, base_url: &str) -> Result<Vec<u8>, ConvertError>;
}

/// Checks the header and the end-of-file marker.
pub fn ensure_pdf(bytes: Vec<u8>) -> Result<Vec<u8>, ConvertError> {
    let tail_start = bytes.len().saturating_sub(1024);
    let has_eof = bytes[tail_start..].windows(5).any(|w| w == b"%%EOF");
    if bytes.starts_with(b"%PDF-") && has_eof {
        Ok(bytes)
    } else {
        Err(ConvertError::Malformed)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// WeasyPrint (local executable)
// ────────────────────────────────────────────────────────────────────────────

pub struct WeasyPrintConverter {
    bin: String,
}

impl WeasyPrintConverter {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl PdfConverter for WeasyPrintConverter {
    fn name(&self) -> &'static str {
        "weasyprint"
    }

    async fn convert(&self, html: &str, base_url: &str) -> Result<Vec<u8>, ConvertError> {
        // dropped (and removed) on every return path
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("document.html");
        let output = scratch.path().join("document.pdf");
        tokio::fs::write(&input, html).await?;

        let mut cmd = Command::new(&self.bin);
        cmd.arg("--base-url")
            .arg(base_url)
            .arg(&input)
            .arg(&output)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        debug!("Running {:?}", cmd);

        let result = tokio::time::timeout(CONVERT_TIMEOUT, cmd.output())
            .await
            .map_err(|_| ConvertError::Timeout(CONVERT_TIMEOUT))??;

        if !result.status.success() {
            return Err(ConvertError::Process {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        ensure_pdf(tokio::fs::read(&output).await?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Gotenberg (HTTP service)
// ────────────────────────────────────────────────────────────────────────────

pub struct GotenbergConverter {
    client: Client,
    endpoint: String,
}

impl GotenbergConverter {
    pub fn new(url: &str) -> Result<Self, ConvertError> {
        let client = Client::builder().timeout(CONVERT_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/forms/chromium/convert/html", url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl PdfConverter for GotenbergConverter {
    fn name(&self) -> &'static str {
        "gotenberg"
    }

    async fn convert(&self, html: &str, _base_url: &str) -> Result<Vec<u8>, ConvertError> {
        // The page already carries <base href>; Chromium resolves against it.
        let page = Part::text(html.to_string())
            .file_name("index.html")
            .mime_str("text/html")?;
        let form = Form::new().part("files", page);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ConvertError::Service {
                status: status.as_u16(),
                message,
            });
        }

        ensure_pdf(response.bytes().await?.to_vec())
    }
}

/// Picks the backend named in config.
pub fn build_converter(backend: &PdfBackend) -> Result<Arc<dyn PdfConverter>, ConvertError> {
    let converter: Arc<dyn PdfConverter> = match backend {
        PdfBackend::WeasyPrint { bin } => Arc::new(WeasyPrintConverter::new(bin.clone())),
        PdfBackend::Gotenberg { url } => Arc::new(GotenbergConverter::new(url)?),
    };
    info!("PDF converter: {}", converter.name());
    Ok(converter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_pdf_accepts_complete_file() {
        let bytes = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n%%EOF\n".to_vec();
        assert!(ensure_pdf(bytes).is_ok());
    }

    #[test]
    fn test_ensure_pdf_rejects_truncated_or_foreign_output() {
        assert!(matches!(
            ensure_pdf(b"%PDF-1.7\n1 0 obj".to_vec()),
            Err(ConvertError::Malformed)
        ));
        assert!(matches!(
            ensure_pdf(b"<html>%%EOF".to_vec()),
            Err(ConvertError::Malformed)
        ));
        assert!(matches!(ensure_pdf(Vec::new()), Err(ConvertError::Malformed)));
    }

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let converter = WeasyPrintConverter::new("/nonexistent/weasyprint-binary");
        let err = converter
            .convert("<html></html>", "http://localhost/")
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Io(_)), "got {err:?}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_binary_is_process_error() {
        let converter = WeasyPrintConverter::new("false");
        let err = converter
            .convert("<html></html>", "http://localhost/")
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Process { .. }), "got {err:?}");
    }

    #[test]
    fn test_gotenberg_endpoint_path() {
        let converter = GotenbergConverter::new("http://gotenberg:3000/").unwrap();
        assert_eq!(
            converter.endpoint,
            "http://gotenberg:3000/forms/chromium/convert/html"
        );
        assert_eq!(converter.name(), "gotenberg");
    }
}
