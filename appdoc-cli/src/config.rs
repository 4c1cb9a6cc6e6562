//! `appdoc.toml` loading.
//!
//! ```toml
//! [document]
//! support_email = "support@example.com"
//! signature = "The Onboarding Team"
//! tax_rate = "0.85"
//! unsupported_state = "render_empty"   # or "reject"
//!
//! [database]
//! backend = "sqlite"
//! connection_string = "appdoc.db"
//!
//! [templates]
//! PendingApplication = "/templates/pending_application.html"
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use appdoc_core::DocumentConfig;
use appdoc_core::db::DbConfig;
use appdoc_render::ManifestTemplatePaths;
use serde::Deserialize;

/// Environment variable overriding `[database] connection_string`.
pub const DB_ENV: &str = "APPDOC_DB";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub document: DocumentConfig,

    #[serde(default)]
    pub database: DbConfig,

    /// Template name → path. Falls back to the conventional layout when
    /// absent or empty.
    #[serde(default)]
    pub templates: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid configuration")?;
        config
            .document
            .validate()
            .context("Invalid [document] configuration")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))
    }

    /// Replace the connection string when `connection_string` is set.
    pub fn with_db_override(mut self, connection_string: Option<String>) -> Self {
        if let Some(connection_string) = connection_string.filter(|c| !c.trim().is_empty()) {
            self.database.connection_string = connection_string;
        }
        self
    }

    pub fn template_paths(&self) -> ManifestTemplatePaths {
        if self.templates.is_empty() {
            ManifestTemplatePaths::conventional()
        } else {
            ManifestTemplatePaths::new(self.templates.clone())
        }
    }
}
