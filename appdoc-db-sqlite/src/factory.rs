use std::path::PathBuf;

use async_trait::async_trait;

use appdoc_core::db::{ApplicationRepository, DbConfig, RepositoryError, RepositoryFactory};
use tracing::info;

use crate::repository::SqliteRepository;

/// Environment variable naming the seeds directory.
pub const SEEDS_DIR_ENV: &str = "APPDOC_SQLITE_SEEDS_DIR";

/// Seeds directory used by `import --seeds` when no directory is given.
///
/// Resolution order:
/// 1. **`APPDOC_SQLITE_SEEDS_DIR`** if set.
/// 2. **`./seeds`** if that directory exists.
/// 3. **`$CARGO_MANIFEST_DIR/seeds`** as a last resort.
pub fn default_seeds_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(SEEDS_DIR_ENV) {
        return PathBuf::from(dir);
    }
    let cwd_seeds = PathBuf::from("./seeds");
    if cwd_seeds.is_dir() {
        return cwd_seeds;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
}

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`appdoc_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use appdoc_core::db::RepositoryRegistry;
/// use appdoc_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database named by `config.connection_string` (a file path,
    /// a `sqlite://` URL or `:memory:`) and migrate it. Stored rows are left
    /// alone; seed data is only written by an explicit import.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn ApplicationRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        info!(database = %config.connection_string, "opened sqlite repository");

        Ok(Box::new(repo))
    }
}
