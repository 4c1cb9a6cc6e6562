//! The templates under `assets/` rendered through the real collaborators.

use std::path::PathBuf;
use std::sync::Arc;

use appdoc_core::db::MemoryRepository;
use appdoc_core::document::{DocumentGenerator, TemplatePathProvider, ViewRenderer};
use appdoc_core::projection::{project, retrieval_path};
use appdoc_core::{
    Application, ApplicationState, DocumentConfig, Fund, LegalEntity, Person, Product, Review,
    ReviewReason, UnsupportedStatePolicy,
};
use appdoc_render::html_text::extract_lines;
use appdoc_render::{ManifestTemplatePaths, PrintPdfRenderer, TeraViewRenderer};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn assets_uri() -> String {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../assets");
    format!("file://{}", dir.display())
}

fn config() -> DocumentConfig {
    DocumentConfig {
        support_email: "help@example.com".to_string(),
        signature: "Client Services".to_string(),
        tax_rate: dec!(0.15),
        unsupported_state: UnsupportedStatePolicy::RenderEmpty,
    }
}

fn application(state: ApplicationState) -> Application {
    Application {
        id: Uuid::new_v4(),
        state,
        reference_number: "APP-2040".to_string(),
        person: Person {
            first_name: "Sipho".to_string(),
            surname: "Dlamini".to_string(),
        },
        date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
        is_legal_entity: true,
        legal_entity: Some(LegalEntity {
            name: "Dlamini & Daughters".to_string(),
            registration_number: "2019/555001/07".to_string(),
        }),
        products: vec![Product {
            name: "Retirement Annuity".to_string(),
            funds: vec![
                Fund {
                    name: "Balanced".to_string(),
                    amount: dec!(1000),
                    fees: dec!(10),
                },
                Fund {
                    name: "Money Market".to_string(),
                    amount: dec!(250.50),
                    fees: dec!(0.50),
                },
            ],
        }],
        current_review: (state == ApplicationState::InReview)
            .then(|| Review::new(ReviewReason::Bank)),
    }
}

fn render_lines(state: ApplicationState) -> Vec<String> {
    let app = application(state);
    let view = project(&app, &config()).unwrap().expect("handled state");
    let template_path = ManifestTemplatePaths::conventional()
        .resolve(view.template().name())
        .unwrap();
    let html = TeraViewRenderer::new()
        .render(&retrieval_path(&assets_uri(), &template_path), &view.to_model().unwrap())
        .unwrap();
    extract_lines(&html)
}

#[test]
fn pending_template_greets_the_applicant() {
    let lines = render_lines(ApplicationState::Pending);

    assert!(lines.contains(&"Application APP-2040".to_string()), "{lines:?}");
    assert!(lines.contains(&"Status: Pending".to_string()));
    assert!(lines.contains(&"Dear Sipho Dlamini,".to_string()));
    assert!(!lines.iter().any(|l| l.starts_with("Portfolio")));
}

#[test]
fn activated_template_lists_portfolio() {
    let lines = render_lines(ApplicationState::Activated);

    assert!(lines.contains(&"Dlamini & Daughters (registration 2019/555001/07)".to_string()), "{lines:?}");
    assert!(lines.contains(&"Balanced 1000 10".to_string()), "{lines:?}");
    // (1000 - 10) * 0.15 + (250.50 - 0.50) * 0.15
    assert!(lines.contains(&"Total after fees and tax: 186.0000".to_string()), "{lines:?}");
}

#[test]
fn in_review_template_explains_the_review() {
    let lines = render_lines(ApplicationState::InReview);

    assert!(lines.contains(&"Status: In Review".to_string()));
    assert!(lines.contains(
        &"Your application has been placed in review pending outstanding bank account verification."
            .to_string()
    ));
}

#[tokio::test]
async fn generator_produces_a_pdf_from_shipped_templates() {
    let app = application(ApplicationState::Activated);
    let generator = DocumentGenerator::new(
        Arc::new(MemoryRepository::with_applications([app.clone()])),
        Arc::new(ManifestTemplatePaths::conventional()),
        Arc::new(TeraViewRenderer::new()),
        config(),
        Arc::new(PrintPdfRenderer::new("Application APP-2040")),
    );

    let with_slash = generator
        .generate(app.id, &format!("{}/", assets_uri()))
        .await
        .unwrap();
    let without_slash = generator.generate(app.id, &assets_uri()).await.unwrap();

    assert!(with_slash.starts_with(b"%PDF"));
    assert!(without_slash.starts_with(b"%PDF"));
}

#[tokio::test]
async fn closed_application_still_yields_a_blank_pdf() {
    let app = application(ApplicationState::Closed);
    let generator = DocumentGenerator::new(
        Arc::new(MemoryRepository::with_applications([app.clone()])),
        Arc::new(ManifestTemplatePaths::conventional()),
        Arc::new(TeraViewRenderer::new()),
        config(),
        Arc::new(PrintPdfRenderer::new("closed")),
    );

    let bytes = generator.generate(app.id, &assets_uri()).await.unwrap();

    assert!(bytes.starts_with(b"%PDF"));
}
