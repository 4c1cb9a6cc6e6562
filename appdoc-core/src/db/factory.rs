use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use super::repository::{ApplicationRepository, RepositoryError};

/// Which application store to open, and how.
///
/// Read from the `[database]` table of `appdoc.toml`; missing keys fall
/// back to [`DbConfig::default`].
///
/// | backend  | connection_string                                   |
/// |----------|-----------------------------------------------------|
/// | `sqlite` | file path, `sqlite://` URL or `:memory:`            |
/// | `memory` | JSON file of applications, or empty for a bare store |
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// Opens one kind of application store.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Name matched against [`DbConfig::backend`].
    fn backend_name(&self) -> &'static str;

    /// Open the store described by `config`. Must not modify stored
    /// applications.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn ApplicationRepository>, RepositoryError>;
}

/// Application store factories by backend name.
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: BTreeMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `factory`, replacing any earlier one with the same name.
    pub fn register(&mut self, factory: Box<dyn RepositoryFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Open the application store named by `config.backend`.
    ///
    /// # Errors
    /// * [`RepositoryError::Configuration`] if no such backend is
    ///   registered; the message lists the registered ones.
    /// * Whatever the backend's factory reports.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn ApplicationRepository>, RepositoryError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {}",
                config.backend,
                self.available_backends().join(", ")
            )));
        };

        factory.create(config).await
    }
}
