//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - groups(group_id, name)
//! - students(student_id, name, group_id)
//! - teachers(teacher_id, name)
//! - subjects(subject_id, name, teacher_id)
//! - grades(grade_id, student_id, subject_id, score, date_received)
//! - schema_version(migration_id, applied_at)

pub mod migrations;
pub mod schema;
pub mod session;
pub mod sqlite;

pub use session::Session;
pub use sqlite::{DbStats, SqliteStore, UnitOfWork};
