//! Fake collaborators and log capture shared by the integration tests.
#![allow(dead_code)]

use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;
use uuid::Uuid;

use appdoc_core::document::{
    PdfOptions, PdfRenderError, PdfRenderer, TemplatePathError, TemplatePathProvider,
    ViewRenderError, ViewRenderer,
};
use appdoc_core::{
    Application, ApplicationRepository, ApplicationState, DocumentConfig, Fund, LegalEntity,
    Person, Product, RepositoryError, Review, ReviewReason, UnsupportedStatePolicy,
};

// ── log capture ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<(Level, String)>>>);

impl CapturedLogs {
    pub fn warnings(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == Level::WARN)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

struct CaptureLayer(CapturedLogs);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        (self.0).0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// Route this thread's tracing events into a buffer until the guard drops.
/// `#[tokio::test]` runs on a single thread, so async code is covered too.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(logs.clone()));
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

// ── fake collaborators ───────────────────────────────────────────────────

/// Maps `Name` to `/templates/Name.html`.
pub struct FixedPaths;

impl TemplatePathProvider for FixedPaths {
    fn resolve(&self, template_name: &str) -> Result<String, TemplatePathError> {
        Ok(format!("/templates/{template_name}.html"))
    }
}

#[derive(Default)]
pub struct RecordingViews {
    pub calls: Mutex<Vec<(String, Value)>>,
}

impl RecordingViews {
    pub fn paths(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn last_model(&self) -> Option<Value> {
        self.calls.lock().unwrap().last().map(|(_, model)| model.clone())
    }
}

impl ViewRenderer for RecordingViews {
    fn render(&self, path: &str, model: &Value) -> Result<String, ViewRenderError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), model.clone()));
        Ok(format!("<p>{path}</p><pre>{model}</pre>"))
    }
}

pub struct FailingViews;

impl ViewRenderer for FailingViews {
    fn render(&self, path: &str, _model: &Value) -> Result<String, ViewRenderError> {
        Err(ViewRenderError::TemplateNotFound(path.to_string()))
    }
}

/// Returns the HTML it was given, prefixed with a fake PDF marker.
#[derive(Default)]
pub struct RecordingPdf {
    pub calls: Mutex<Vec<(String, PdfOptions)>>,
}

impl RecordingPdf {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<(String, PdfOptions)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

impl PdfRenderer for RecordingPdf {
    fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, PdfRenderError> {
        self.calls
            .lock()
            .unwrap()
            .push((html.to_string(), options.clone()));
        Ok(format!("%PDF-fake\n{html}").into_bytes())
    }
}

pub struct FailingPdf;

impl PdfRenderer for FailingPdf {
    fn render(&self, _html: &str, _options: &PdfOptions) -> Result<Vec<u8>, PdfRenderError> {
        Err(PdfRenderError::Generation("renderer offline".to_string()))
    }
}

pub struct BrokenRepository;

#[async_trait]
impl ApplicationRepository for BrokenRepository {
    async fn get_application(&self, _id: Uuid) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Connection("database is down".to_string()))
    }
}

// ── fixtures ─────────────────────────────────────────────────────────────

pub fn config() -> DocumentConfig {
    DocumentConfig {
        support_email: "support@example.com".to_string(),
        signature: "The Onboarding Team".to_string(),
        tax_rate: dec!(0.5),
        unsupported_state: UnsupportedStatePolicy::RenderEmpty,
    }
}

pub fn application(state: ApplicationState) -> Application {
    Application {
        id: Uuid::new_v4(),
        state,
        reference_number: "APP-1001".to_string(),
        person: Person {
            first_name: "Naledi".to_string(),
            surname: "Mokoena".to_string(),
        },
        date: NaiveDate::from_ymd_opt(2025, 2, 17).unwrap(),
        is_legal_entity: false,
        legal_entity: Some(LegalEntity {
            name: "Mokoena Trading CC".to_string(),
            registration_number: "2011/000123/23".to_string(),
        }),
        products: vec![
            Product {
                name: "Living Annuity".to_string(),
                funds: vec![Fund {
                    name: "Global Equity".to_string(),
                    amount: dec!(100),
                    fees: dec!(10),
                }],
            },
            Product {
                name: "Unit Trust".to_string(),
                funds: vec![Fund {
                    name: "Stable Income".to_string(),
                    amount: dec!(200),
                    fees: dec!(20),
                }],
            },
        ],
        current_review: match state {
            ApplicationState::InReview => Some(Review::new(ReviewReason::Address)),
            _ => None,
        },
    }
}
