use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use super::factory::{DbConfig, RepositoryFactory};
use super::repository::{ApplicationRepository, RepositoryError};
use crate::models::Application;

/// Process-local store, used by tests and the `memory` backend.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    applications: RwLock<HashMap<Uuid, Application>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_applications(applications: impl IntoIterator<Item = Application>) -> Self {
        let repo = Self::new();
        for application in applications {
            repo.insert(application);
        }
        repo
    }

    /// Insert or replace an application, keyed by its id.
    pub fn insert(&self, application: Application) {
        self.applications
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(application.id, application);
    }

    pub fn len(&self) -> usize {
        self.applications
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ApplicationRepository for MemoryRepository {
    async fn get_application(&self, id: Uuid) -> Result<Application, RepositoryError> {
        self.applications
            .read()
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Box<Application>),
    Many(Vec<Application>),
}

/// Parse a JSON document holding either one application or an array of
/// them.
pub fn parse_applications(json: &str) -> Result<Vec<Application>, serde_json::Error> {
    Ok(match serde_json::from_str::<OneOrMany>(json)? {
        OneOrMany::One(application) => vec![*application],
        OneOrMany::Many(applications) => applications,
    })
}

/// [`RepositoryFactory`] for the `"memory"` backend.
///
/// The connection string names a JSON file in the `import` format whose
/// applications fill the store. Empty or `:memory:` opens an empty store.
pub struct MemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn ApplicationRepository>, RepositoryError> {
        let path = config.connection_string.trim();
        if path.is_empty() || path == ":memory:" {
            return Ok(Box::new(MemoryRepository::new()));
        }

        let json = std::fs::read_to_string(path)
            .map_err(|e| RepositoryError::Connection(format!("cannot read '{path}': {e}")))?;
        let applications = parse_applications(&json).map_err(|e| {
            RepositoryError::Database(format!("invalid applications in '{path}': {e}"))
        })?;

        let repo = MemoryRepository::with_applications(applications);
        debug!(path, count = repo.len(), "loaded applications");
        Ok(Box::new(repo))
    }
}
