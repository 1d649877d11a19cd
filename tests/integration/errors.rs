use compozip::composer::ToolStep;
use reqwest::StatusCode;
use reqwest::header;

use crate::common::{ACME_WIDGET, FakeComposer, TestServer};

async fn assert_rejected(response: reqwest::Response, status: StatusCode, message: &str) {
    assert_eq!(response.status(), status);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    assert_eq!(response.text().await.unwrap(), message);
}

#[tokio::test]
async fn test_unknown_format_is_rejected_before_staging() {
    let server = TestServer::start().await;

    let response = server.vendor("rar", "composer.json", ACME_WIDGET).await;

    assert_rejected(
        response,
        StatusCode::BAD_REQUEST,
        "Please specify valid archive type, either 'zip' or 'tar'",
    )
    .await;
    assert!(server.staging_dirs().is_empty());
    assert!(server.tool.steps().is_empty());
}

#[tokio::test]
async fn test_missing_composer_part() {
    let server = TestServer::start().await;

    let response = server.upload("zip", "manifest", "composer.json", ACME_WIDGET).await;

    assert_rejected(
        response,
        StatusCode::BAD_REQUEST,
        "Please provide 'composer' file in the form-data",
    )
    .await;
    assert!(server.staging_dirs().is_empty());
}

#[tokio::test]
async fn test_composer_text_field_is_not_a_file() {
    let server = TestServer::start().await;

    let form = reqwest::multipart::Form::new().text("composer", "{}");
    let response = reqwest::Client::new()
        .post(server.url("/vendor/zip"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_rejected(
        response,
        StatusCode::BAD_REQUEST,
        "Please provide 'composer' file in the form-data",
    )
    .await;
    assert!(server.staging_dirs().is_empty());
}

#[tokio::test]
async fn test_non_multipart_body() {
    let server = TestServer::start().await;

    let response = reqwest::Client::new()
        .post(server.url("/vendor/zip"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(ACME_WIDGET)
        .send()
        .await
        .unwrap();

    assert_rejected(response, StatusCode::BAD_REQUEST, "File could not be read in request").await;
    assert!(server.staging_dirs().is_empty());
}

#[tokio::test]
async fn test_invalid_json_manifest() {
    let server = TestServer::start().await;

    let response = server.vendor("zip", "composer.json", b"{ not json").await;

    assert_rejected(response, StatusCode::BAD_REQUEST, "File could not be read in request").await;
    assert!(server.staging_dirs().is_empty());
    assert!(server.tool.steps().is_empty());
}

#[tokio::test]
async fn test_validate_failure_is_client_error() {
    let server = TestServer::start_with(FakeComposer::failing_at(ToolStep::Validate)).await;

    let response = server.vendor("zip", "composer.json", ACME_WIDGET).await;

    assert_rejected(
        response,
        StatusCode::BAD_REQUEST,
        "Failed to validate Composer file - please submit a valid composer.json or composer.lock file",
    )
    .await;
    assert_eq!(server.tool.steps(), vec![ToolStep::Validate]);
}

#[tokio::test]
async fn test_install_failure_produces_no_archive() {
    let server = TestServer::start_with(FakeComposer::failing_at(ToolStep::Install)).await;

    let response = server.vendor("zip", "composer.json", ACME_WIDGET).await;

    assert_rejected(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to download Composer dependencies",
    )
    .await;
    assert_eq!(server.tool.steps(), vec![ToolStep::Validate, ToolStep::Install]);

    // The staging directory is left behind, without an archive.
    let staging = server.single_staging_dir();
    assert!(staging.join("composer.json").exists());
    assert!(!staging.join("vendor.zip").exists());
}

#[tokio::test]
async fn test_archive_failure() {
    let server = TestServer::start_with(FakeComposer::failing_at(ToolStep::Archive)).await;

    let response = server.vendor("tar", "composer.lock", ACME_WIDGET).await;

    assert_rejected(response, StatusCode::INTERNAL_SERVER_ERROR, "Failed to create Composer archive").await;
    assert_eq!(server.tool.steps(), vec![ToolStep::Install, ToolStep::Archive]);
}

#[tokio::test]
async fn test_missing_archive_file() {
    let server = TestServer::start_with(FakeComposer::without_archive_file()).await;

    let response = server.vendor("zip", "composer.json", ACME_WIDGET).await;

    assert_rejected(response, StatusCode::INTERNAL_SERVER_ERROR, "Failed to create Composer archive").await;
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let server = TestServer::start().await;
    let body = vec![b' '; compozip::constants::MAX_UPLOAD_BYTES + 1024 * 1024];

    let response = server.vendor("zip", "composer.json", &body).await;

    assert_rejected(response, StatusCode::BAD_REQUEST, "File could not be read in request").await;
    assert!(server.staging_dirs().is_empty());
    assert!(server.tool.steps().is_empty());
}

#[tokio::test]
async fn test_null_manifest_is_left_to_composer_validate() {
    let server = TestServer::start_with(FakeComposer::failing_at(ToolStep::Validate)).await;

    let response = server.vendor("zip", "composer.json", b"null").await;

    assert_rejected(
        response,
        StatusCode::BAD_REQUEST,
        "Failed to validate Composer file - please submit a valid composer.json or composer.lock file",
    )
    .await;
    let staging = server.single_staging_dir();
    assert_eq!(std::fs::read(staging.join("composer.json")).unwrap(), b"null");
}

#[tokio::test]
async fn test_other_methods_and_paths() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/vendor/zip")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = client.post(server.url("/archive/zip")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
