use compozip::composer::ToolStep;
use compozip::constants::STUB_MANIFEST;
use compozip::models::ArchiveFormat;
use reqwest::StatusCode;
use reqwest::header;

use crate::common::{ACME_LOCK, ACME_WIDGET, TestServer, fake_archive_bytes, post_file};

#[tokio::test]
async fn test_vendor_zip_from_composer_json() {
    let server = TestServer::start().await;

    let response = server.vendor("zip", "composer.json", ACME_WIDGET).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"vendor.zip\""
    );
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/octet-stream");
    assert_eq!(response.headers()["content-description"], "File Transfer");
    assert_eq!(response.bytes().await.unwrap(), fake_archive_bytes(ArchiveFormat::Zip));

    assert_eq!(server.tool.steps(), vec![ToolStep::Validate, ToolStep::Install, ToolStep::Archive]);

    let staging = server.single_staging_dir();
    assert_eq!(std::fs::read(staging.join("composer.json")).unwrap(), ACME_WIDGET);
    assert!(!staging.join("composer.lock").exists());
}

#[tokio::test]
async fn test_steps_run_in_the_staging_directory() {
    let server = TestServer::start().await;

    server.vendor("tar", "composer.json", ACME_WIDGET).await;

    let staging = server.single_staging_dir();
    assert!(staging.starts_with(server.uploads.path()));
    assert!(
        staging.file_name().unwrap().to_string_lossy().starts_with("vendor"),
        "unexpected staging name {}",
        staging.display()
    );
    for recorded in server.tool.recorded() {
        assert_eq!(recorded.dir.canonicalize().unwrap(), staging.canonicalize().unwrap());
    }
}

#[tokio::test]
async fn test_vendor_tar_from_composer_lock() {
    let server = TestServer::start().await;

    let response = server.vendor("tar", "composer.lock", ACME_LOCK).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"vendor.tar\""
    );
    assert_eq!(response.bytes().await.unwrap(), fake_archive_bytes(ArchiveFormat::Tar));

    // validate would only check the stub, so it is skipped
    assert_eq!(server.tool.steps(), vec![ToolStep::Install, ToolStep::Archive]);

    let staging = server.single_staging_dir();
    assert_eq!(std::fs::read_to_string(staging.join("composer.json")).unwrap(), STUB_MANIFEST);
    assert_eq!(std::fs::read(staging.join("composer.lock")).unwrap(), ACME_LOCK);
}

#[tokio::test]
async fn test_lock_variant_follows_file_name_not_content() {
    let server = TestServer::start().await;

    // A primary manifest uploaded under a .lock name is still treated as a lock file.
    let response = server.vendor("zip", "project.lock", ACME_WIDGET).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(server.tool.steps(), vec![ToolStep::Install, ToolStep::Archive]);
    let staging = server.single_staging_dir();
    assert_eq!(std::fs::read(staging.join("composer.lock")).unwrap(), ACME_WIDGET);
}

#[tokio::test]
async fn test_format_is_case_insensitive() {
    let server = TestServer::start().await;

    let response = server.vendor("ZIP", "composer.json", ACME_WIDGET).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"vendor.zip\""
    );
}

#[tokio::test]
async fn test_repeated_request_gets_fresh_directory() {
    let server = TestServer::start().await;

    let first = server.vendor("zip", "composer.json", ACME_WIDGET).await.bytes().await.unwrap();
    let second = server.vendor("zip", "composer.json", ACME_WIDGET).await.bytes().await.unwrap();

    assert_eq!(first, second);
    let dirs = server.staging_dirs();
    assert_eq!(dirs.len(), 2);
    assert_ne!(dirs[0], dirs[1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_are_isolated() {
    let server = TestServer::start().await;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let format = if i % 2 == 0 { "zip" } else { "tar" };
            let url = server.url(&format!("/vendor/{format}"));
            tokio::spawn(async move { post_file(&url, "composer", "composer.json", ACME_WIDGET).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().status(), StatusCode::OK);
    }
    assert_eq!(server.staging_dirs().len(), 8);
    assert_eq!(server.tool.steps().len(), 24);
}
