//! Export encoders: plain text, Word-compatible HTML, and PDF.

pub mod handlers;
pub mod pdf;
pub mod text;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::info;

use crate::document::flatten::{flatten, FlatDocument};
use crate::document::view::DocumentView;
use crate::errors::AppError;
use crate::export::pdf::PdfConverter;
use crate::export::text::encode_text;
use crate::render::catalog::TemplateCatalog;
use crate::render::engine::TemplateEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Doc,
    Pdf,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "txt" => Ok(ExportFormat::Txt),
            "doc" => Ok(ExportFormat::Doc),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(AppError::Validation(format!(
                "Unsupported export format '{other}'; use txt, doc or pdf"
            ))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Doc => "doc",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain; charset=utf-8",
            ExportFormat::Doc => "application/msword",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

/// A finished download. Served as an attachment.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub content_type: &'static str,
    pub filename: String,
    pub body: Bytes,
}

impl IntoResponse for ExportedFile {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (header::CONTENT_DISPOSITION, content_disposition(&self.filename)),
            ],
            self.body,
        )
            .into_response()
    }
}

/// Shared services an export needs.
pub struct ExportContext<'a> {
    pub catalog: &'a TemplateCatalog,
    pub engine: &'a TemplateEngine,
    pub converter: &'a dyn PdfConverter,
    /// Absolute, ending in `/`.
    pub public_base_url: &'a str,
}

/// Encodes a document. The personal block is checked before anything is
/// rendered, so a PDF export of an incomplete document never reaches the
/// converter.
pub async fn export_document(
    view: &dyn DocumentView,
    format: ExportFormat,
    ctx: &ExportContext<'_>,
) -> Result<ExportedFile, AppError> {
    let flat = flatten(view)?;
    let template = ctx.catalog.resolve(view.template_name());

    let body = match format {
        ExportFormat::Txt => Bytes::from(encode_text(&flat)),
        ExportFormat::Doc => Bytes::from(ctx.engine.render(template, &flat, None)?),
        ExportFormat::Pdf => {
            let html = ctx
                .engine
                .render(template, &flat, Some(ctx.public_base_url))?;
            let pdf = ctx.converter.convert(&html, ctx.public_base_url).await?;
            Bytes::from(pdf)
        }
    };

    let filename = export_filename(&flat, format);
    info!(
        "Exported {filename} ({} bytes, template {})",
        body.len(),
        template.id
    );
    Ok(ExportedFile {
        content_type: format.content_type(),
        filename,
        body,
    })
}

/// `<full name, spaces as underscores>_<Resume|CV>.<ext>`, stripped of
/// characters that could break out of the header or name a path.
pub fn export_filename(doc: &FlatDocument, format: ExportFormat) -> String {
    let name: String = doc
        .personal
        .full_name
        .trim()
        .replace(' ', "_")
        .chars()
        .filter(|c| !matches!(c, '"' | '\\' | '/' | ';') && !c.is_control())
        .collect();
    let name = if name.is_empty() { "Document".to_string() } else { name };
    format!("{name}_{}.{}", doc.doc_label, format.extension())
}

/// Everything outside the RFC 3986 unreserved set is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// RFC 6266 value with an ASCII fallback and the UTF-8 name percent-encoded.
fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    if ascii == filename {
        return format!("attachment; filename=\"{filename}\"");
    }
    let encoded = utf8_percent_encode(filename, ATTR_CHAR);
    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}
