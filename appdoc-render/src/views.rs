use std::collections::HashMap;
use std::error::Error;
use std::io::ErrorKind;

use appdoc_core::document::{ViewRenderError, ViewRenderer};
use serde_json::Value;
use tera::{Context, Tera};
use tracing::debug;

/// Renders Tera (Jinja2-style) templates with the JSON view model as
/// context. Autoescaping is on.
///
/// Templates are looked up by retrieval path: registered in-memory sources
/// first, then the local filesystem. `file://` locations are read from
/// disk; other schemes such as `https://` are not fetched.
#[derive(Debug, Clone, Default)]
pub struct TeraViewRenderer {
    sources: HashMap<String, String>,
}

impl TeraViewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for `path` without touching the filesystem.
    pub fn with_source(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.sources.insert(path.into(), content.into());
        self
    }

    fn load(&self, path: &str) -> Result<String, ViewRenderError> {
        if let Some(content) = self.sources.get(path) {
            return Ok(content.clone());
        }

        let location = match path.strip_prefix("file://") {
            Some(rest) => rest,
            None if path.contains("://") => {
                return Err(ViewRenderError::UnsupportedLocation(path.to_string()));
            }
            None => path,
        };

        debug!(location, "reading template from disk");
        std::fs::read_to_string(location).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ViewRenderError::TemplateNotFound(path.to_string()),
            _ => ViewRenderError::Io {
                path: path.to_string(),
                source,
            },
        })
    }
}

impl ViewRenderer for TeraViewRenderer {
    fn render(&self, path: &str, model: &Value) -> Result<String, ViewRenderError> {
        let template = self.load(path)?;

        let context = Context::from_value(model.clone())
            .map_err(|e| ViewRenderError::Render(describe(&e)))?;

        Tera::one_off(&template, &context, true).map_err(|e| ViewRenderError::Render(describe(&e)))
    }
}

/// Tera's top-level message only names the template; the cause is further
/// down the source chain.
fn describe(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
