//! State-dependent view model projection.
//!
//! Maps an [`Application`] to the template that documents it and the model
//! that template is rendered with.
//!
//! | State       | Template               | Extra fields                                   |
//! |-------------|------------------------|------------------------------------------------|
//! | `Pending`   | `PendingApplication`   | none                                           |
//! | `Activated` | `ActivatedApplication` | legal entity, portfolio funds, portfolio total |
//! | `InReview`  | `InReviewApplication`  | as `Activated`, plus review message and review |
//! | `Closed`    | none                   | no document                                    |

pub mod portfolio;
pub mod review_message;
mod view_model;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::DocumentConfig;
use crate::models::{Application, ApplicationState};

pub use portfolio::{flatten_funds, portfolio_total};
pub use review_message::{IN_REVIEW_PREFIX, in_review_message};
pub use view_model::{ApplicationViewModel, InReviewApplicationViewModel};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("application {0} is in review but has no current review")]
    MissingReview(Uuid),

    #[error("portfolio total overflowed at fund '{0}'")]
    PortfolioOverflow(String),
}

/// Logical template names, resolved to paths by a
/// [`crate::document::TemplatePathProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentTemplate {
    PendingApplication,
    ActivatedApplication,
    InReviewApplication,
}

impl DocumentTemplate {
    pub const ALL: [DocumentTemplate; 3] = [
        Self::PendingApplication,
        Self::ActivatedApplication,
        Self::InReviewApplication,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::PendingApplication => "PendingApplication",
            Self::ActivatedApplication => "ActivatedApplication",
            Self::InReviewApplication => "InReviewApplication",
        }
    }
}

/// A view model together with the state it was projected for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProjectedView {
    Pending(ApplicationViewModel),
    Activated(ApplicationViewModel),
    InReview(InReviewApplicationViewModel),
}

impl ProjectedView {
    pub fn template(&self) -> DocumentTemplate {
        match self {
            Self::Pending(_) => DocumentTemplate::PendingApplication,
            Self::Activated(_) => DocumentTemplate::ActivatedApplication,
            Self::InReview(_) => DocumentTemplate::InReviewApplication,
        }
    }

    /// The model as handed to the HTML renderer.
    pub fn to_model(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Project `application` into its document view.
///
/// Returns `Ok(None)` for states that have no document.
///
/// # Errors
///
/// * [`ProjectionError::MissingReview`]: the application is `InReview` but
///   carries no review record.
/// * [`ProjectionError::PortfolioOverflow`]: the portfolio total does not
///   fit in a decimal.
pub fn project(
    application: &Application,
    config: &DocumentConfig,
) -> Result<Option<ProjectedView>, ProjectionError> {
    let view = match application.state {
        ApplicationState::Pending => ProjectedView::Pending(common_fields(application, config)),
        ApplicationState::Activated => {
            ProjectedView::Activated(with_portfolio(application, config)?)
        }
        ApplicationState::InReview => {
            let review = application
                .current_review
                .as_ref()
                .ok_or(ProjectionError::MissingReview(application.id))?;

            ProjectedView::InReview(InReviewApplicationViewModel {
                application: with_portfolio(application, config)?,
                in_review_message: in_review_message(&review.reason),
                in_review_information: review.clone(),
            })
        }
        ApplicationState::Closed => return Ok(None),
    };

    Ok(Some(view))
}

/// Join a base URI and a template path, dropping one trailing `/` from the
/// base so `"https://x/"` and `"https://x"` resolve identically.
pub fn retrieval_path(base_uri: &str, template_path: &str) -> String {
    let base = base_uri.strip_suffix('/').unwrap_or(base_uri);
    format!("{base}{template_path}")
}

fn common_fields(application: &Application, config: &DocumentConfig) -> ApplicationViewModel {
    ApplicationViewModel {
        reference_number: application.reference_number.clone(),
        state: application.state.description().to_string(),
        full_name: application.person.full_name(),
        applied_on: application.date,
        support_email: config.support_email.clone(),
        signature: config.signature.clone(),
        legal_entity: None,
        portfolio_funds: None,
        portfolio_total_amount: None,
    }
}

fn with_portfolio(
    application: &Application,
    config: &DocumentConfig,
) -> Result<ApplicationViewModel, ProjectionError> {
    let funds = flatten_funds(&application.products);
    let total = portfolio_total(&funds, config.tax_rate)?;

    let legal_entity = if application.is_legal_entity {
        application.legal_entity.clone()
    } else {
        None
    };

    Ok(ApplicationViewModel {
        legal_entity,
        portfolio_funds: Some(funds),
        portfolio_total_amount: Some(total),
        ..common_fields(application, config)
    })
}
