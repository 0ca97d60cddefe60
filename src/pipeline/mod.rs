/*!
 * The submission pipeline.
 *
 * - `orchestrator`: sequences load, job, batch and upload stages per locale
 * - `reconciler`: maps accepted uploads back to local records
 * - `report`: per-run outcomes, failures and exit code
 */

pub mod orchestrator;
pub mod reconciler;
pub mod report;

pub use orchestrator::{SubmissionOrchestrator, group_by_locale};
pub use reconciler::{ReconcileSummary, StatusReconciler};
pub use report::{LocaleFailure, SubmissionReport, SubmissionStage};
