//! SQLite storage for applications.

pub mod decimal;
pub mod factory;
pub mod repository;

pub use factory::{SqliteRepositoryFactory, default_seeds_dir};
pub use repository::SqliteRepository;
