//! Collaborators the document generator hands work to.

use serde_json::Value;
use thiserror::Error;

use super::pdf_options::PdfOptions;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplatePathError {
    #[error("no template registered for '{0}'")]
    UnknownTemplate(String),

    #[error("template manifest error: {0}")]
    Manifest(String),
}

#[derive(Debug, Error)]
pub enum ViewRenderError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("unsupported template location: {0}")]
    UnsupportedLocation(String),

    #[error("failed to read template '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("template rendering failed: {0}")]
    Render(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdfRenderError {
    #[error("PDF generation failed: {0}")]
    Generation(String),
}

/// Maps a logical template name to a path that is appended to the caller's
/// base URI.
pub trait TemplatePathProvider: Send + Sync {
    fn resolve(&self, template_name: &str) -> Result<String, TemplatePathError>;
}

/// Turns a template location and a JSON model into HTML.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, path: &str, model: &Value) -> Result<String, ViewRenderError>;
}

/// Turns HTML into a binary PDF.
pub trait PdfRenderer: Send + Sync {
    fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, PdfRenderError>;
}
