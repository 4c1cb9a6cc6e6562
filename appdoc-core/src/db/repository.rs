use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Application;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Read access to stored applications.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Load an application with its products, funds and current review.
    ///
    /// Returns [`RepositoryError::NotFound`] when no application has `id`.
    async fn get_application(&self, id: Uuid) -> Result<Application, RepositoryError>;
}
