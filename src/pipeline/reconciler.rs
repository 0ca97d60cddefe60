/*!
 * Status reconciliation.
 *
 * Maps vendor batch identifiers from upload outcomes back to the local job
 * and translation records and moves both forward. Status only ever moves one
 * step forward, so replaying the same outcomes is a no-op.
 */

use log::{debug, error, info};

use crate::database::{JobFilter, JobRecord, Repository, TranslationRecord, TranslationStatus};
use crate::errors::ReconcileError;
use crate::vendor::UploadOutcome;

/// What a reconciliation pass did
#[derive(Debug, Default)]
pub struct ReconcileSummary {
    /// Translations moved to the new status
    pub advanced: usize,
    /// Translations already at or past the new status
    pub unchanged: usize,
    /// Outcomes that could not be reconciled
    pub failures: Vec<ReconcileError>,
}

impl ReconcileSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Advances local records from vendor outcomes
#[derive(Clone)]
pub struct StatusReconciler {
    repository: Repository,
}

impl StatusReconciler {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Move the job and translation behind every accepted outcome to
    /// `new_status`. Non-accepted outcomes are ignored. An outcome that
    /// cannot be resolved is logged and collected; the pass keeps going.
    pub async fn advance(&self, outcomes: &[UploadOutcome], new_status: TranslationStatus) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        for outcome in outcomes.iter().filter(|o| o.is_accepted()) {
            match self.advance_one(outcome, new_status).await {
                Ok(true) => summary.advanced += 1,
                Ok(false) => summary.unchanged += 1,
                Err(e) => {
                    error!("{}", e);
                    summary.failures.push(e);
                }
            }
        }

        info!(
            "Reconciled to {}: {} advanced, {} unchanged, {} failed",
            new_status,
            summary.advanced,
            summary.unchanged,
            summary.failures.len()
        );
        summary
    }

    async fn advance_one(&self, outcome: &UploadOutcome, new_status: TranslationStatus) -> Result<bool, ReconcileError> {
        let job = self.find_job(outcome).await?;
        let translation = self.find_translation(&job, outcome).await?;

        if job.status.can_transition_to(new_status) {
            self.repository.update_job(job.id, new_status).await?;
            debug!("Job {} ({}) -> {}", job.job_uid, job.locale, new_status);
        }

        if !translation.status.can_transition_to(new_status) {
            debug!(
                "Translation {} ({}) stays {}",
                translation.slug, translation.locale, translation.status
            );
            return Ok(false);
        }

        self.repository.update_translation(translation.id, new_status).await?;
        debug!("Translation {} ({}) -> {}", translation.slug, translation.locale, new_status);
        Ok(true)
    }

    async fn find_job(&self, outcome: &UploadOutcome) -> Result<JobRecord, ReconcileError> {
        self.repository
            .get_jobs(JobFilter::batch_uid(&outcome.batch_uid))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| inconsistent(outcome))
    }

    async fn find_translation(&self, job: &JobRecord, outcome: &UploadOutcome) -> Result<TranslationRecord, ReconcileError> {
        let links = self.repository.get_translations_jobs_records(job.id).await?;

        for link in links {
            if let Some(translation) = self.repository.get_translation(link.translation_id).await? {
                if translation.slug == outcome.slug && translation.locale == outcome.locale {
                    return Ok(translation);
                }
            }
        }

        Err(inconsistent(outcome))
    }
}

fn inconsistent(outcome: &UploadOutcome) -> ReconcileError {
    ReconcileError::DataConsistency {
        batch_uid: outcome.batch_uid.clone(),
        slug: outcome.slug.clone(),
    }
}
