//! appdoc-render
//!
//! Concrete template path, HTML and PDF collaborators for
//! `appdoc_core::DocumentGenerator`.

pub mod html_text;
pub mod pdf;
pub mod template_paths;
pub mod views;

pub use pdf::{PageLayout, PrintPdfRenderer};
pub use template_paths::ManifestTemplatePaths;
pub use views::TeraViewRenderer;
