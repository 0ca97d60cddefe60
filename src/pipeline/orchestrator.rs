/*!
 * Submission orchestrator.
 *
 * One run takes every PENDING translation through the vendor:
 * 1. Load: group the queue by locale, drop missing files, render the rest
 * 2. Authenticate once for the whole run
 * 3. Per locale, concurrently: create job, record it, create batch, record it
 * 4. Upload every page of every batch concurrently
 * 5. Move accepted uploads to IN_PROGRESS
 *
 * A locale whose job or batch cannot be created is reported and skipped;
 * the other locales carry on. A rejected upload never stops its siblings.
 */

use futures::future::join_all;
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::content::{ContentLoader, LocaleQueue, Page};
use crate::database::{Repository, TranslationFilter, TranslationRecord, TranslationStatus};
use crate::errors::AppError;
use crate::file_utils::UploadArtifacts;
use crate::pipeline::reconciler::StatusReconciler;
use crate::pipeline::report::{LocaleFailure, SubmissionReport, SubmissionStage};
use crate::vendor::{AccessToken, UploadCode, UploadOutcome, VendorApi};

/// Drives a submission run
pub struct SubmissionOrchestrator {
    repository: Repository,
    vendor: Arc<dyn VendorApi>,
    loader: ContentLoader,
    reconciler: StatusReconciler,
}

/// Group translations by locale, keeping store order within each locale
pub fn group_by_locale(translations: &[TranslationRecord]) -> LocaleQueue {
    let mut queue = LocaleQueue::new();
    for translation in translations {
        queue
            .entry(translation.locale.clone())
            .or_default()
            .push(translation.slug.clone());
    }
    queue
}

impl SubmissionOrchestrator {
    pub fn new(repository: Repository, vendor: Arc<dyn VendorApi>, loader: ContentLoader) -> Self {
        let reconciler = StatusReconciler::new(repository.clone());
        Self {
            repository,
            vendor,
            loader,
            reconciler,
        }
    }

    /// Submit every pending translation
    ///
    /// Returns `Err` only when nothing can be submitted at all (store
    /// unreadable, authentication refused). Everything else ends up in the
    /// report.
    pub async fn run(&self) -> Result<SubmissionReport, AppError> {
        let start_time = Instant::now();
        let mut report = SubmissionReport::default();

        let pending = self
            .repository
            .get_translations(TranslationFilter::status(TranslationStatus::Pending))
            .await?;
        let queue = group_by_locale(&pending);
        info!("{} pending translations across {} locales", pending.len(), queue.len());

        let mut pages_by_locale: BTreeMap<String, Vec<Page>> = BTreeMap::new();
        for (locale, loaded) in self.loader.load(&queue).await {
            match loaded {
                Ok(pages) if pages.is_empty() => debug!("Nothing to submit for {}", locale),
                Ok(pages) => {
                    pages_by_locale.insert(locale, pages);
                }
                Err(e) => report
                    .locale_failures
                    .push(LocaleFailure::new(&locale, SubmissionStage::Load, e)),
            }
        }

        if pages_by_locale.is_empty() {
            info!("No pages to submit");
            report.duration = start_time.elapsed();
            return Ok(report);
        }

        let token = self.vendor.authenticate().await?;
        let artifacts = UploadArtifacts::new()?;

        let submissions = pages_by_locale.iter().map(|(locale, pages)| {
            self.submit_locale(&token, &artifacts, locale, pages, &pending)
        });

        for result in join_all(submissions).await {
            match result {
                Ok(outcomes) => report.outcomes.extend(outcomes),
                Err(failure) => report.locale_failures.push(failure),
            }
        }

        report.reconcile = self
            .reconciler
            .advance(&report.outcomes, TranslationStatus::InProgress)
            .await;
        report.duration = start_time.elapsed();

        Ok(report)
    }

    /// Job, batch and uploads for one locale
    async fn submit_locale(
        &self,
        token: &AccessToken,
        artifacts: &UploadArtifacts,
        locale: &str,
        pages: &[Page],
        pending: &[TranslationRecord],
    ) -> Result<Vec<UploadOutcome>, LocaleFailure> {
        let fail = |stage: SubmissionStage| move |e: anyhow::Error| LocaleFailure::new(locale, stage, e);

        let job_uid = self
            .vendor
            .create_job(token, locale)
            .await
            .map_err(|e| LocaleFailure::new(locale, SubmissionStage::CreateJob, e))?;
        let job = self
            .repository
            .add_job(&job_uid, None, locale, TranslationStatus::Pending)
            .await
            .map_err(fail(SubmissionStage::Store))?;

        let translation_ids: Vec<i64> = pending
            .iter()
            .filter(|t| t.locale == locale && pages.iter().any(|p| p.file == t.slug))
            .map(|t| t.id)
            .collect();
        let links = self
            .repository
            .add_translations_jobs_records(job.id, translation_ids)
            .await
            .map_err(fail(SubmissionStage::Store))?;

        let file_uris: Vec<String> = pages.iter().map(|p| p.file.clone()).collect();
        let batch_uid = self
            .vendor
            .create_batch(token, &job_uid, &file_uris)
            .await
            .map_err(|e| LocaleFailure::new(locale, SubmissionStage::CreateBatch, e))?;
        let job = self
            .repository
            .attach_batch(&job_uid, &batch_uid)
            .await
            .map_err(fail(SubmissionStage::Store))?;

        info!(
            "Recorded job {} / batch {} for {} with {} translations",
            job.job_uid,
            job.batch_uid.as_deref().unwrap_or(&batch_uid),
            job.locale,
            links.len()
        );

        let uploads = pages
            .iter()
            .map(|page| self.upload_page(token, artifacts, locale, &batch_uid, page));
        Ok(join_all(uploads).await)
    }

    async fn upload_page(
        &self,
        token: &AccessToken,
        artifacts: &UploadArtifacts,
        locale: &str,
        batch_uid: &str,
        page: &Page,
    ) -> UploadOutcome {
        match artifacts.write(locale, &page.file, &page.html).await {
            Ok(artifact) => {
                self.vendor
                    .upload_file(token, locale, batch_uid, page, &artifact)
                    .await
            }
            Err(e) => UploadOutcome {
                locale: locale.to_string(),
                batch_uid: batch_uid.to_string(),
                slug: page.file.clone(),
                code: UploadCode::Error(e.to_string()),
            },
        }
    }
}
