use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Fund, LegalEntity, Review};

/// Rendering input shared by every document template.
///
/// The optional fields are only set for states that show a portfolio and
/// are left out of the serialised model otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationViewModel {
    pub reference_number: String,
    pub state: String,
    pub full_name: String,
    pub applied_on: NaiveDate,
    pub support_email: String,
    pub signature: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_entity: Option<LegalEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_funds: Option<Vec<Fund>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_total_amount: Option<Decimal>,
}

/// Rendering input for the in-review template: the full application model
/// plus the review message and the raw review record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InReviewApplicationViewModel {
    #[serde(flatten)]
    pub application: ApplicationViewModel,
    pub in_review_message: String,
    pub in_review_information: Review,
}
