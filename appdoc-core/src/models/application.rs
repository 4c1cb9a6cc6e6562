use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Product, Review};

/// Lifecycle state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationState {
    Pending,
    Activated,
    InReview,
    Closed,
}

impl ApplicationState {
    /// Storage code, as written to the `applications.state` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Activated => "activated",
            Self::InReview => "in_review",
            Self::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "activated" => Some(Self::Activated),
            "in_review" => Some(Self::InReview),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Human-readable status text shown on generated documents.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Activated => "Activated",
            Self::InReview => "In Review",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Activated => "Activated",
            Self::InReview => "InReview",
            Self::Closed => "Closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub surname: String,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalEntity {
    pub name: String,
    pub registration_number: String,
}

/// An onboarding/account application as held by the data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub state: ApplicationState,
    pub reference_number: String,
    pub person: Person,
    pub date: NaiveDate,
    pub is_legal_entity: bool,
    pub legal_entity: Option<LegalEntity>,

    /// Ordered; portfolio flattening follows this order.
    pub products: Vec<Product>,

    /// Only meaningful while the application is in review.
    pub current_review: Option<Review>,
}
