/*!
 * # doc-translation-queue
 *
 * Submits queued documentation pages to a translation vendor and tracks the
 * resulting jobs locally.
 *
 * ## Features
 *
 * - Persistent translation queue (SQLite) with PENDING / IN_PROGRESS /
 *   COMPLETE / FAILED statuses
 * - Per-locale vendor jobs and batches, created concurrently
 * - Concurrent file uploads; one rejected file never blocks the rest
 * - Visual context upload from the live documentation site
 * - Bounded exponential retry on HTTP 429
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: SQLite persistence for translations, jobs and their links
 * - `content`: Loading and HTML rendering of queued documents
 * - `vendor`: Vendor API gateway:
 *   - `vendor::http`: 429 retry policy
 *   - `vendor::envelope`: Response envelope decoding
 *   - `vendor::client`: reqwest implementation of `VendorApi`
 * - `pipeline`: Submission orchestration and status reconciliation
 * - `file_utils`: File system operations and upload artifacts
 * - `language_utils`: Internal to vendor locale mapping
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod content;
pub mod database;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod pipeline;
pub mod vendor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use content::{ContentLoader, HtmlRenderer, MdxRenderer, Page};
pub use database::{Repository, TranslationStatus};
pub use errors::{AppError, ConfigError, LoadError, ReconcileError, VendorError};
pub use language_utils::LocaleTable;
pub use pipeline::{StatusReconciler, SubmissionOrchestrator, SubmissionReport};
pub use vendor::{UploadCode, UploadOutcome, VendorApi, VendorClient};
