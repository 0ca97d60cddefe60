/*!
 * HTTP-level tests of the vendor client against a wiremock server
 */

use serde_json::json;
use std::path::PathBuf;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doc_translation_queue::content::Page;
use doc_translation_queue::errors::VendorError;
use doc_translation_queue::file_utils::UploadArtifacts;
use doc_translation_queue::vendor::{AccessToken, UploadCode, VendorApi, VendorClient};

use crate::common::create_temp_dir;
use crate::common::vendor_server::*;

fn client_for(server: &MockServer) -> VendorClient {
    let dir = create_temp_dir().unwrap();
    let config = crate::common::test_config(&server.uri(), dir.path());
    VendorClient::from_config(&config).unwrap()
}

fn token() -> AccessToken {
    AccessToken::new(ACCESS_TOKEN)
}

async fn artifact_for(artifacts: &UploadArtifacts, page: &Page) -> PathBuf {
    artifacts.write("jp", &page.file, &page.html).await.unwrap()
}

#[tokio::test]
async fn test_authenticate_withSuccess_shouldSendCredentialsAndReturnToken() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    let token = client_for(&server).authenticate().await.unwrap();

    assert_eq!(token.as_str(), ACCESS_TOKEN);
    let requests = requests_to(&server, AUTH_PATH).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(
        json_body(&requests[0]),
        json!({ "userIdentifier": "test-user", "userSecret": "test-secret" })
    );
}

#[tokio::test]
async fn test_authenticate_withFailureCode_shouldBeProtocolError() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(envelope("AUTHENTICATION_ERROR", json!(null))),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).authenticate().await.unwrap_err();

    match err {
        VendorError::Protocol { endpoint, code, raw } => {
            assert_eq!(endpoint, AUTH_PATH);
            assert_eq!(code, "AUTHENTICATION_ERROR");
            assert!(raw.contains("AUTHENTICATION_ERROR"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_createJob_shouldMapLocaleAndNameJob() {
    let server = MockServer::start().await;
    mount_create_job(&server, "job-1").await;

    let job_uid = client_for(&server).create_job(&token(), "jp").await.unwrap();

    assert_eq!(job_uid, "job-1");
    let body = json_body(&requests_to(&server, JOBS_PATH).await[0]);
    assert_eq!(body["targetLocaleIds"], json!(["ja-JP"]));
    assert!(
        body["jobName"]
            .as_str()
            .unwrap()
            .starts_with("Gatsby Translation Queue (jp) ")
    );
}

#[tokio::test]
async fn test_createJob_withUnmappedLocale_shouldFailWithoutRequest() {
    let server = MockServer::start().await;
    mount_create_job(&server, "job-1").await;

    let err = client_for(&server).create_job(&token(), "kr").await.unwrap_err();

    assert!(matches!(err, VendorError::UnknownLocale(ref locale) if locale == "kr"));
    assert!(requests_to(&server, JOBS_PATH).await.is_empty());
}

#[tokio::test]
async fn test_createBatch_shouldSendExactFileUrisUnauthorized() {
    let server = MockServer::start().await;
    mount_create_batch(&server, "job-1", "batch-1").await;
    let uris = vec![
        "src/content/docs/b.mdx".to_string(),
        "src/content/docs/a.mdx".to_string(),
    ];

    let batch_uid = client_for(&server)
        .create_batch(&token(), "job-1", &uris)
        .await
        .unwrap();

    assert_eq!(batch_uid, "batch-1");
    assert_eq!(
        json_body(&requests_to(&server, BATCHES_PATH).await[0]),
        json!({
            "authorize": false,
            "translationJobUid": "job-1",
            "fileUris": ["src/content/docs/b.mdx", "src/content/docs/a.mdx"]
        })
    );
}

#[tokio::test]
async fn test_createJob_withTransient429_shouldRetryAndSucceed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(JOBS_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_create_job(&server, "job-after-retry").await;

    let job_uid = client_for(&server).create_job(&token(), "jp").await.unwrap();

    assert_eq!(job_uid, "job-after-retry");
    assert_eq!(requests_to(&server, JOBS_PATH).await.len(), 3);
}

#[tokio::test]
async fn test_createJob_withPersistent429_shouldStopAfterThreeAttempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(JOBS_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .mount(&server)
        .await;

    let err = client_for(&server).create_job(&token(), "jp").await.unwrap_err();

    assert!(matches!(err, VendorError::Http { status: 429, .. }));
    assert_eq!(requests_to(&server, JOBS_PATH).await.len(), 3);
}

#[tokio::test]
async fn test_createBatch_withServerError_shouldNotRetry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BATCHES_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_batch(&token(), "job-1", &["a.mdx".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, VendorError::Http { status: 500, .. }));
    assert_eq!(requests_to(&server, BATCHES_PATH).await.len(), 1);
}

#[tokio::test]
async fn test_uploadFile_withAccepted_shouldSendFormAndPushLiveContext() {
    let server = MockServer::start().await;
    mount_upload(&server, "batch-1", "ACCEPTED").await;
    mount_live_page(&server, "/docs/a", "<html>live page</html>").await;
    mount_context(&server).await;

    let artifacts = UploadArtifacts::new().unwrap();
    let page = Page::new("src/content/docs/a.mdx", "<p>rendered</p>");
    let artifact = artifact_for(&artifacts, &page).await;

    let outcome = client_for(&server)
        .upload_file(&token(), "jp", "batch-1", &page, &artifact)
        .await;

    assert_eq!(outcome.code, UploadCode::Accepted);
    assert_eq!(outcome.batch_uid, "batch-1");
    assert_eq!(outcome.slug, "src/content/docs/a.mdx");

    let upload = text_body(&requests_to(&server, &upload_path("batch-1")).await[0]);
    assert!(upload.contains("name=\"fileType\"\r\n\r\nhtml"));
    assert!(upload.contains("name=\"localeIdsToAuthorize[]\"\r\n\r\nja-JP"));
    assert!(upload.contains("name=\"fileUri\"\r\n\r\nsrc/content/docs/a.mdx"));
    assert!(upload.contains("<p>rendered</p>"));

    let contexts = requests_to(&server, CONTEXT_PATH).await;
    assert_eq!(contexts.len(), 1);
    let context = text_body(&contexts[0]);
    assert!(context.contains("<html>live page</html>"));
    assert!(context.contains("filename=\"src/content/docs/a.mdx\""));
    assert!(context.contains(&format!("{}/docs/a", server.uri())));
}

#[tokio::test]
async fn test_uploadFile_withRejected_shouldReturnCodeAndSkipContext() {
    let server = MockServer::start().await;
    mount_upload(&server, "batch-1", "REJECTED").await;
    mount_context(&server).await;

    let artifacts = UploadArtifacts::new().unwrap();
    let page = Page::new("src/content/docs/a.mdx", "<p>x</p>");
    let artifact = artifact_for(&artifacts, &page).await;

    let outcome = client_for(&server)
        .upload_file(&token(), "jp", "batch-1", &page, &artifact)
        .await;

    assert_eq!(outcome.code, UploadCode::Rejected("REJECTED".to_string()));
    assert!(requests_to(&server, CONTEXT_PATH).await.is_empty());
}

#[tokio::test]
async fn test_uploadFile_withAcceptedCodeOnErrorStatus_shouldNotBeAccepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(upload_path("batch-1").as_str()))
        .respond_with(ResponseTemplate::new(500).set_body_json(envelope("ACCEPTED", json!({}))))
        .mount(&server)
        .await;

    let artifacts = UploadArtifacts::new().unwrap();
    let page = Page::new("a.mdx", "<p>x</p>");
    let artifact = artifact_for(&artifacts, &page).await;

    let outcome = client_for(&server)
        .upload_file(&token(), "jp", "batch-1", &page, &artifact)
        .await;

    assert!(matches!(outcome.code, UploadCode::Error(_)));
}

#[tokio::test]
async fn test_uploadFile_withContextFailure_shouldStayAccepted() {
    let server = MockServer::start().await;
    mount_upload(&server, "batch-1", "ACCEPTED").await;
    mount_live_page(&server, "/docs/a", "<html>live</html>").await;
    Mock::given(method("POST"))
        .and(path(CONTEXT_PATH))
        .respond_with(envelope_response("VALIDATION_ERROR", json!(null)))
        .mount(&server)
        .await;

    let artifacts = UploadArtifacts::new().unwrap();
    let page = Page::new("src/content/docs/a.mdx", "<p>x</p>");
    let artifact = artifact_for(&artifacts, &page).await;

    let outcome = client_for(&server)
        .upload_file(&token(), "jp", "batch-1", &page, &artifact)
        .await;

    assert_eq!(outcome.code, UploadCode::Accepted);
    assert_eq!(requests_to(&server, CONTEXT_PATH).await.len(), 1);
}

#[tokio::test]
async fn test_uploadFile_withLivePageMissing_shouldSkipContext() {
    let server = MockServer::start().await;
    mount_upload(&server, "batch-1", "ACCEPTED").await;
    mount_context(&server).await;

    let artifacts = UploadArtifacts::new().unwrap();
    let page = Page::new("src/content/docs/new-page.mdx", "<p>x</p>");
    let artifact = artifact_for(&artifacts, &page).await;

    let outcome = client_for(&server)
        .upload_file(&token(), "jp", "batch-1", &page, &artifact)
        .await;

    assert_eq!(outcome.code, UploadCode::Accepted);
    assert!(requests_to(&server, CONTEXT_PATH).await.is_empty());
}

#[tokio::test]
async fn test_uploadContext_shouldUseSuccessAsAcceptedCode() {
    let server = MockServer::start().await;
    mount_context(&server).await;

    let code = client_for(&server)
        .upload_context(&token(), "src/content/docs/a.mdx", "<html></html>")
        .await;

    assert_eq!(code, UploadCode::Accepted);
    let body = text_body(&requests_to(&server, CONTEXT_PATH).await[0]);
    assert!(body.contains("name=\"name\""));
    assert!(body.contains("content-type: text/html") || body.contains("Content-Type: text/html"));
}
