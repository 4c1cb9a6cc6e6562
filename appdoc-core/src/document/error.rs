use thiserror::Error;
use uuid::Uuid;

use super::ports::{PdfRenderError, TemplatePathError, ViewRenderError};
use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::models::ApplicationState;
use crate::projection::ProjectionError;

/// Why no document was produced.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("no application found for id {0}")]
    ApplicationNotFound(Uuid),

    #[error("application is in state {0} and no valid document can be generated")]
    UnsupportedState(ApplicationState),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    #[error("template path error: {0}")]
    TemplatePath(#[from] TemplatePathError),

    #[error("view rendering error: {0}")]
    ViewRender(#[from] ViewRenderError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("PDF rendering error: {0}")]
    PdfRender(#[from] PdfRenderError),
}

impl DocumentError {
    /// True for the outcomes that are expected in normal operation rather
    /// than faults.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::ApplicationNotFound(_) | Self::UnsupportedState(_)
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
