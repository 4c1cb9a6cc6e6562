//! Document orchestration: lookup, projection, HTML rendering, PDF
//! conversion.

mod error;
mod generator;
pub mod pdf_options;
pub mod ports;

pub use error::{BuildError, DocumentError};
pub use generator::{DocumentGenerator, DocumentGeneratorBuilder};
pub use pdf_options::{DEFAULT_HEADER_HTML, HeaderOptions, HeaderRepeat, PageNumbers, PdfOptions};
pub use ports::{
    PdfRenderError, PdfRenderer, TemplatePathError, TemplatePathProvider, ViewRenderError,
    ViewRenderer,
};
