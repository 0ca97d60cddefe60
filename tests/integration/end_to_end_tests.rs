/*!
 * End-to-end submission runs: real vendor client, wiremock vendor, SQLite store
 */

use anyhow::Result;
use std::sync::Arc;
use wiremock::MockServer;

use doc_translation_queue::content::ContentLoader;
use doc_translation_queue::database::{JobFilter, TranslationStatus};
use doc_translation_queue::pipeline::SubmissionOrchestrator;
use doc_translation_queue::vendor::{UploadCode, VendorClient};

use crate::common::vendor_server::*;
use crate::common::{create_source_file, create_temp_dir, sample_mdx, seeded_repository, test_config};

const PAGE_A: &str = "src/content/docs/a.mdx";
const PAGE_MISSING: &str = "src/content/docs/missing.mdx";

async fn mount_vendor(server: &MockServer, upload_code: &str) {
    mount_auth(server).await;
    mount_create_job(server, "job-1").await;
    mount_create_batch(server, "job-1", "batch-1").await;
    mount_upload(server, "batch-1", upload_code).await;
    mount_live_page(server, "/docs/a", "<html>live a</html>").await;
    mount_context(server).await;
}

#[tokio::test]
async fn test_submit_withAcceptedUpload_shouldExitZeroAndMarkInProgress() -> Result<()> {
    let server = MockServer::start().await;
    mount_vendor(&server, "ACCEPTED").await;

    let dir = create_temp_dir()?;
    create_source_file(dir.path(), PAGE_A, &sample_mdx("Page A"))?;
    let (repository, records) = seeded_repository(&[("jp", PAGE_A), ("jp", PAGE_MISSING)]).await?;

    let config = test_config(&server.uri(), dir.path());
    config.validate()?;
    let vendor = Arc::new(VendorClient::from_config(&config)?);
    let orchestrator = SubmissionOrchestrator::new(repository.clone(), vendor, ContentLoader::new(dir.path()));

    let report = orchestrator.run().await?;

    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].code, UploadCode::Accepted);

    assert_eq!(requests_to(&server, AUTH_PATH).await.len(), 1);
    assert_eq!(requests_to(&server, JOBS_PATH).await.len(), 1);
    let batch = json_body(&requests_to(&server, BATCHES_PATH).await[0]);
    assert_eq!(batch["fileUris"], serde_json::json!([PAGE_A]));
    assert_eq!(requests_to(&server, &upload_path("batch-1")).await.len(), 1);
    assert_eq!(requests_to(&server, CONTEXT_PATH).await.len(), 1);

    let jobs = repository.get_jobs(JobFilter::batch_uid("batch-1")).await?;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].job_uid, "job-1");
    assert_eq!(jobs[0].status, TranslationStatus::InProgress);

    let a = repository.get_translation(records[0].id).await?.unwrap();
    assert_eq!(a.status, TranslationStatus::InProgress);

    // Nothing sent to the vendor mentions the missing page
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.iter().all(|r| !text_body(r).contains("missing.mdx")));
    Ok(())
}

#[tokio::test]
async fn test_submit_withRejectedUpload_shouldExitOneAndLeavePending() -> Result<()> {
    let server = MockServer::start().await;
    mount_vendor(&server, "REJECTED").await;

    let dir = create_temp_dir()?;
    create_source_file(dir.path(), PAGE_A, &sample_mdx("Page A"))?;
    let (repository, records) = seeded_repository(&[("jp", PAGE_A)]).await?;

    let config = test_config(&server.uri(), dir.path());
    let vendor = Arc::new(VendorClient::from_config(&config)?);
    let report = SubmissionOrchestrator::new(repository.clone(), vendor, ContentLoader::new(dir.path()))
        .run()
        .await?;

    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.failed_uploads().len(), 1);
    assert_eq!(report.failed_uploads()[0].code.as_code(), "REJECTED");
    assert!(requests_to(&server, CONTEXT_PATH).await.is_empty());

    let a = repository.get_translation(records[0].id).await?.unwrap();
    assert_eq!(a.status, TranslationStatus::Pending);

    // The job and batch were still recorded
    let jobs = repository.get_jobs(JobFilter::job_uid("job-1")).await?;
    assert_eq!(jobs[0].batch_uid.as_deref(), Some("batch-1"));
    assert_eq!(jobs[0].status, TranslationStatus::Pending);
    Ok(())
}
