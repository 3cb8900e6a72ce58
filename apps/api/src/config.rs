use anyhow::{bail, Context, Result};

/// Which external program turns rendered HTML into PDF.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfBackend {
    /// Local `weasyprint` executable.
    WeasyPrint { bin: String },
    /// Gotenberg HTTP service.
    Gotenberg { url: String },
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Absolute URL the service is reachable at, always ending in `/`.
    /// Relative asset references in PDF exports resolve against it.
    pub public_base_url: String,
    pub pdf_backend: PdfBackend,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let public_base_url = normalize_base_url(
            &std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}/")),
        )?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            public_base_url,
            pdf_backend: pdf_backend_from_env()?,
        })
    }
}

fn pdf_backend_from_env() -> Result<PdfBackend> {
    let kind = std::env::var("PDF_CONVERTER").unwrap_or_else(|_| "weasyprint".to_string());
    match kind.to_ascii_lowercase().as_str() {
        "weasyprint" => Ok(PdfBackend::WeasyPrint {
            bin: std::env::var("WEASYPRINT_BIN").unwrap_or_else(|_| "weasyprint".to_string()),
        }),
        "gotenberg" => Ok(PdfBackend::Gotenberg {
            url: require_env("GOTENBERG_URL")?
                .trim_end_matches('/')
                .to_string(),
        }),
        other => bail!("PDF_CONVERTER must be 'weasyprint' or 'gotenberg', got '{other}'"),
    }
}

/// Requires an absolute http(s) URL and appends the trailing slash a
/// `<base href>` needs.
fn normalize_base_url(raw: &str) -> Result<String> {
    let url = reqwest::Url::parse(raw.trim())
        .with_context(|| format!("PUBLIC_BASE_URL '{raw}' is not an absolute URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("PUBLIC_BASE_URL must use http or https");
    }
    let mut out = url.to_string();
    if !out.ends_with('/') {
        out.push('/');
    }
    Ok(out)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
