/*!
 * Database module for the translation queue.
 *
 * This module provides SQLite-based persistence for:
 * - Translation requests queued per (locale, slug)
 * - Vendor jobs and the batch attached to each job
 * - Links between translation requests and the job that carries them
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{JobFilter, JobRecord, TranslationFilter, TranslationJobRecord, TranslationRecord, TranslationStatus};
pub use repository::Repository;
