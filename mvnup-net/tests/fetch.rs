use httpmock::prelude::*;
use mvnup_common::error::InstallError;
use mvnup_common::model::ChecksumAlgorithm;
use mvnup_net::{build_http_client, compute_digest, download, fetch_text, verify_checksum};

#[tokio::test]
async fn download_writes_body_and_reports_size() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/dist/tool.tar.gz");
            then.status(200).body("archive-bytes");
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("nested").join("tool.tar.gz");
    let client = build_http_client().unwrap();
    let archive = download(&client, &server.url("/dist/tool.tar.gz"), &dest)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(archive.local_path, dest);
    assert_eq!(archive.size_bytes, 13);
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "archive-bytes");
    assert!(!dir.path().join("nested").join("tool.tar.gz.part").exists());
}

#[tokio::test]
async fn not_found_is_a_network_error_and_leaves_nothing() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/missing.tar.gz");
            then.status(404);
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("missing.tar.gz");
    let client = build_http_client().unwrap();
    let err = download(&client, &server.url("/missing.tar.gz"), &dest)
        .await
        .unwrap_err();

    match err {
        InstallError::Network { url, reason } => {
            assert!(url.ends_with("/missing.tar.gz"));
            assert!(reason.contains("404"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dest.exists());
    assert!(!dir.path().join("missing.tar.gz.part").exists());
}

#[tokio::test]
async fn fetch_text_returns_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/x.sha256.txt");
            then.status(200).body("deadbeef  x.tar.gz\n");
        })
        .await;

    let client = build_http_client().unwrap();
    let body = fetch_text(&client, &server.url("/x.sha256.txt")).await.unwrap();
    assert_eq!(body, "deadbeef  x.tar.gz\n");
}

#[tokio::test]
async fn verify_checksum_against_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("payload.tar.gz");
    std::fs::write(&file, b"payload").unwrap();
    let digest = compute_digest(&file, ChecksumAlgorithm::Sha512).unwrap();

    let server = MockServer::start_async().await;
    let sidecar = format!("{}  payload.tar.gz\n", digest.to_uppercase());
    server
        .mock_async(move |when, then| {
            when.method(GET).path("/payload.tar.gz.sha512");
            then.status(200).body(sidecar.clone());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/bad.sha512");
            then.status(200).body(format!("{}\n", "0".repeat(128)));
        })
        .await;

    let client = build_http_client().unwrap();
    let record = verify_checksum(
        &client,
        &file,
        &server.url("/payload.tar.gz.sha512"),
        ChecksumAlgorithm::Sha512,
        Some(128),
    )
    .await
    .unwrap();
    assert!(record.matches());
    assert_eq!(record.expected_hex, digest);

    let err = verify_checksum(
        &client,
        &file,
        &server.url("/bad.sha512"),
        ChecksumAlgorithm::Sha512,
        Some(128),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, InstallError::ChecksumMismatch { .. }));
}

#[tokio::test]
async fn short_sidecar_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("payload");
    std::fs::write(&file, b"payload").unwrap();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/short.sha256.txt");
            then.status(200).body("abc123");
        })
        .await;

    let client = build_http_client().unwrap();
    let err = verify_checksum(
        &client,
        &file,
        &server.url("/short.sha256.txt"),
        ChecksumAlgorithm::Sha256,
        Some(64),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, InstallError::Format { .. }));
}
