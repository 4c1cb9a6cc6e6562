use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use super::error::{BuildError, DocumentError};
use super::pdf_options::PdfOptions;
use super::ports::{PdfRenderer, TemplatePathProvider, ViewRenderer};
use crate::config::{DocumentConfig, UnsupportedStatePolicy};
use crate::db::{ApplicationRepository, RepositoryError};
use crate::models::Application;
use crate::projection::{project, retrieval_path};

/// Produces the PDF document for an application.
///
/// Holds only shared, read-only collaborators, so one instance can serve
/// concurrent calls.
pub struct DocumentGenerator {
    repository: Arc<dyn ApplicationRepository>,
    template_paths: Arc<dyn TemplatePathProvider>,
    views: Arc<dyn ViewRenderer>,
    pdf: Arc<dyn PdfRenderer>,
    config: DocumentConfig,
}

impl DocumentGenerator {
    pub fn new(
        repository: Arc<dyn ApplicationRepository>,
        template_paths: Arc<dyn TemplatePathProvider>,
        views: Arc<dyn ViewRenderer>,
        config: DocumentConfig,
        pdf: Arc<dyn PdfRenderer>,
    ) -> Self {
        Self {
            repository,
            template_paths,
            views,
            pdf,
            config,
        }
    }

    pub fn builder() -> DocumentGeneratorBuilder {
        DocumentGeneratorBuilder::default()
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Generate the document for `application_id`, fetching templates
    /// relative to `base_uri`.
    ///
    /// Every error is logged once as a warning before it is returned.
    ///
    /// # Errors
    ///
    /// * [`DocumentError::ApplicationNotFound`]: no application has this id.
    /// * [`DocumentError::UnsupportedState`]: the state has no template and
    ///   the configured policy is [`UnsupportedStatePolicy::Reject`].
    /// * Any collaborator or projection failure, wrapped by cause.
    pub async fn generate(
        &self,
        application_id: Uuid,
        base_uri: &str,
    ) -> Result<Vec<u8>, DocumentError> {
        let result = self.try_generate(application_id, base_uri).await;

        match &result {
            Ok(bytes) => debug!(%application_id, bytes = bytes.len(), "generated application document"),
            Err(error) => warn!(%application_id, "{error}"),
        }

        result
    }

    async fn try_generate(
        &self,
        application_id: Uuid,
        base_uri: &str,
    ) -> Result<Vec<u8>, DocumentError> {
        let application = self
            .repository
            .get_application(application_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => DocumentError::ApplicationNotFound(application_id),
                other => DocumentError::Repository(other),
            })?;

        let html = self.render_view(&application, base_uri)?;

        let options = PdfOptions::application_document();
        Ok(self.pdf.render(&html, &options)?)
    }

    fn render_view(
        &self,
        application: &Application,
        base_uri: &str,
    ) -> Result<String, DocumentError> {
        let Some(view) = project(application, &self.config)? else {
            let unsupported = DocumentError::UnsupportedState(application.state);
            return match self.config.unsupported_state {
                UnsupportedStatePolicy::RenderEmpty => {
                    warn!(application_id = %application.id, "{unsupported}");
                    Ok(String::new())
                }
                UnsupportedStatePolicy::Reject => Err(unsupported),
            };
        };

        let template = view.template();
        let template_path = self.template_paths.resolve(template.name())?;
        let path = retrieval_path(base_uri, &template_path);
        debug!(template = template.name(), %path, "rendering application view");

        let model = view.to_model()?;
        Ok(self.views.render(&path, &model)?)
    }
}

/// Assembles a [`DocumentGenerator`] from parts supplied one at a time,
/// failing with [`BuildError`] if anything is missing or invalid.
#[derive(Default)]
pub struct DocumentGeneratorBuilder {
    repository: Option<Arc<dyn ApplicationRepository>>,
    template_paths: Option<Arc<dyn TemplatePathProvider>>,
    views: Option<Arc<dyn ViewRenderer>>,
    pdf: Option<Arc<dyn PdfRenderer>>,
    config: Option<DocumentConfig>,
}

impl DocumentGeneratorBuilder {
    pub fn repository(mut self, repository: Arc<dyn ApplicationRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn template_paths(mut self, template_paths: Arc<dyn TemplatePathProvider>) -> Self {
        self.template_paths = Some(template_paths);
        self
    }

    pub fn views(mut self, views: Arc<dyn ViewRenderer>) -> Self {
        self.views = Some(views);
        self
    }

    pub fn pdf(mut self, pdf: Arc<dyn PdfRenderer>) -> Self {
        self.pdf = Some(pdf);
        self
    }

    pub fn config(mut self, config: DocumentConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<DocumentGenerator, BuildError> {
        let repository = require(self.repository, "repository")?;
        let template_paths = require(self.template_paths, "template_paths")?;
        let views = require(self.views, "views")?;
        let pdf = require(self.pdf, "pdf")?;
        let config = require(self.config, "config")?;

        if let Err(error) = config.validate() {
            warn!("document generator configuration rejected: {error}");
            return Err(error.into());
        }

        Ok(DocumentGenerator::new(
            repository,
            template_paths,
            views,
            config,
            pdf,
        ))
    }
}

fn require<T>(value: Option<T>, name: &'static str) -> Result<T, BuildError> {
    value.ok_or_else(|| {
        warn!(collaborator = name, "document generator is missing a required collaborator");
        BuildError::MissingCollaborator(name)
    })
}
