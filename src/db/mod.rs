//! Persistence layer.
//!
//! Accounts and templates live in SQLite behind a `sqlx` pool. Every
//! operation is a single-row statement; uniqueness of account emails is
//! enforced by the schema.

pub mod models;
pub mod operations;

pub use models::{Account, NewAccount, Template, TemplateFields};
pub use operations::DbOperations;
