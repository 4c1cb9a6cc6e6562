pub mod config;
pub mod db;
pub mod document;
pub mod models;
pub mod projection;

pub use config::{ConfigError, DocumentConfig, UnsupportedStatePolicy};
pub use db::repository::{ApplicationRepository, RepositoryError};
pub use document::{BuildError, DocumentError, DocumentGenerator};
pub use models::*;
