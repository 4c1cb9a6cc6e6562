mod application;
mod product;
mod review;

pub use application::{Application, ApplicationState, LegalEntity, Person};
pub use product::{Fund, Product};
pub use review::{Review, ReviewReason};
