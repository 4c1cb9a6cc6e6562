use std::collections::HashMap;
use std::path::Path;

use appdoc_core::document::{TemplatePathError, TemplatePathProvider};
use appdoc_core::projection::DocumentTemplate;
use serde::Deserialize;

/// Template name → path lookup backed by a fixed table.
///
/// Paths are stored with a leading `/` so they can be appended directly to
/// a base URI.
///
/// A manifest file carries a single `[templates]` table:
///
/// ```toml
/// [templates]
/// PendingApplication = "/templates/pending_application.html"
/// ActivatedApplication = "/templates/activated_application.html"
/// InReviewApplication = "/templates/in_review_application.html"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManifestTemplatePaths {
    paths: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    templates: HashMap<String, String>,
}

impl ManifestTemplatePaths {
    pub fn new(paths: HashMap<String, String>) -> Self {
        paths
            .into_iter()
            .fold(Self::default(), |manifest, (name, path)| {
                manifest.with_path(name, path)
            })
    }

    /// `/templates/<snake_case_name>.html` for every known template.
    pub fn conventional() -> Self {
        DocumentTemplate::ALL
            .iter()
            .fold(Self::default(), |manifest, template| {
                let file = match template {
                    DocumentTemplate::PendingApplication => "pending_application",
                    DocumentTemplate::ActivatedApplication => "activated_application",
                    DocumentTemplate::InReviewApplication => "in_review_application",
                };
                manifest.with_path(template.name(), format!("/templates/{file}.html"))
            })
    }

    pub fn from_toml_str(manifest: &str) -> Result<Self, TemplatePathError> {
        let manifest: Manifest =
            toml::from_str(manifest).map_err(|e| TemplatePathError::Manifest(e.to_string()))?;
        Ok(Self::new(manifest.templates))
    }

    pub fn from_file(path: &Path) -> Result<Self, TemplatePathError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TemplatePathError::Manifest(format!("cannot read '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Add or replace one entry.
    pub fn with_path(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        self.paths.insert(name.into(), path);
        self
    }

    /// Every known template name, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.paths.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl TemplatePathProvider for ManifestTemplatePaths {
    fn resolve(&self, template_name: &str) -> Result<String, TemplatePathError> {
        self.paths
            .get(template_name)
            .cloned()
            .ok_or_else(|| TemplatePathError::UnknownTemplate(template_name.to_string()))
    }
}
