use log::{error, info, warn};
use std::fmt;
use std::time::Duration;

use crate::pipeline::reconciler::ReconcileSummary;
use crate::vendor::UploadOutcome;

/// Stage of a locale's pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    /// Reading and rendering the locale's documents
    Load,
    /// Creating the vendor job
    CreateJob,
    /// Creating the vendor batch
    CreateBatch,
    /// Writing job or link records
    Store,
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionStage::Load => "load",
            SubmissionStage::CreateJob => "create job",
            SubmissionStage::CreateBatch => "create batch",
            SubmissionStage::Store => "store",
        };
        f.write_str(name)
    }
}

/// A locale whose pipeline stopped before its uploads
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleFailure {
    pub locale: String,
    pub stage: SubmissionStage,
    pub message: String,
}

impl LocaleFailure {
    pub fn new(locale: &str, stage: SubmissionStage, error: impl fmt::Display) -> Self {
        Self {
            locale: locale.to_string(),
            stage,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for LocaleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed at {}: {}", self.locale, self.stage, self.message)
    }
}

/// Everything a submission run produced
#[derive(Debug, Default)]
pub struct SubmissionReport {
    /// One outcome per attempted upload
    pub outcomes: Vec<UploadOutcome>,
    /// Locales that never reached the upload stage
    pub locale_failures: Vec<LocaleFailure>,
    /// Result of moving accepted uploads forward
    pub reconcile: ReconcileSummary,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl SubmissionReport {
    pub fn accepted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_accepted()).count()
    }

    /// Uploads with any code other than ACCEPTED
    pub fn failed_uploads(&self) -> Vec<&UploadOutcome> {
        self.outcomes.iter().filter(|o| !o.is_accepted()).collect()
    }

    /// Whether every upload was accepted and nothing else went wrong
    pub fn is_success(&self) -> bool {
        self.failed_uploads().is_empty() && self.locale_failures.is_empty() && self.reconcile.is_clean()
    }

    /// Process exit code for the run
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} / {} files uploaded successfully in {:.2}s",
            self.accepted(),
            self.outcomes.len(),
            self.duration.as_secs_f32()
        )
    }

    /// Log the summary, each failed upload and each failed locale
    pub fn log_summary(&self) {
        info!("{}", self.summary());

        let failed = self.failed_uploads();
        if !failed.is_empty() {
            error!("{} files failed to upload:", failed.len());
            for outcome in failed {
                error!("  {} ({}): {}", outcome.slug, outcome.locale, outcome.code);
            }
        }

        for failure in &self.locale_failures {
            error!("Locale {}", failure);
        }

        if !self.reconcile.is_clean() {
            warn!(
                "{} accepted uploads could not be matched to local records",
                self.reconcile.failures.len()
            );
        }
    }
}
