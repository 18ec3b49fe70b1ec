//! # Gradebook - school records over SQLite
//!
//! Gradebook provides:
//! - A relational schema for groups, students, teachers, subjects and grades
//! - A SQLite-backed persistence gateway with scoped units of work
//! - Embedded, versioned schema migrations
//! - A seeder producing random but relationally consistent sample data
//! - A catalog of ten read-only reporting queries

pub mod model;
pub mod storage;
pub mod seed;
pub mod query;
pub mod ui;
pub mod config;


// Re-exports for convenient access
pub use model::{Grade, Group, Student, Subject, Teacher};
pub use storage::{Session, SqliteStore, UnitOfWork};
pub use seed::{SeedPlan, Seeder};
pub use query::QueryCatalog;

/// Result type alias for Gradebook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Gradebook operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Migration {id} failed: {message}")]
    Migration { id: String, message: String },

    #[error("Seed error: {0}")]
    Seed(String),

    #[error("Config error: {0}")]
    Config(String),
}
