//! Runtime lifecycle and persistence tests
//!
//! Run with: cargo test -p integration-tests --test bridge_tests

use std::sync::Arc;

use guildlink_core::{PlayerId, RemotePlatform, Snowflake};
use guildlink_service::LinkService;
use guildlink_store::{FileBlobStore, LinkStore};
use integration_tests::*;
use reqwest::StatusCode;
use serde_json::json;

fn file_config(dir: &std::path::Path) -> guildlink_common::AppConfig {
    let mut config = base_config();
    config.storage.in_memory = false;
    config.storage.data_dir = dir.to_path_buf();
    config.bug_report.enabled = true;
    config
}

#[tokio::test]
async fn test_runtime_starts_offline_without_bot() {
    let server = TestServer::start(base_config()).await.unwrap();
    let runtime = server.runtime().expect("runtime");

    assert!(!runtime.remote().is_ready());
    assert_eq!(runtime.remote().listener_count(), 0);
    server.shutdown().await;
}

#[tokio::test]
async fn test_reload_swaps_config_and_keeps_state() {
    let server = TestServer::start(base_config()).await.unwrap();
    let player = PlayerId::random();

    let response = server
        .post_auth(
            &format!("/api/v1/players/{player}/link-code"),
            API_TOKEN,
            &json!({"player_name": "Steve"}),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let mut reloaded = base_config();
    reloaded.api.auth_token = Some("rotated".to_string());
    server.runtime().unwrap().reload(reloaded).await.unwrap();

    let response = server.get_auth("/api/v1/links", API_TOKEN).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth("/api/v1/links", "rotated").await.unwrap();
    let list: LinkList = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.pending, 1);
    assert_eq!(list.codes_generated, 1);

    server.shutdown().await;
}

#[tokio::test]
async fn test_links_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(dir.path());
    let player = PlayerId::random();

    {
        let store = LinkStore::open(Arc::new(FileBlobStore::new(config.storage.links_path())));
        let bridge = TestBridge::with_store(config.clone(), &["AB12CD"], store);
        let service = LinkService::new(&bridge.ctx);
        service.issue_code(player, "Steve");
        assert!(service
            .verify_code("AB12CD", Snowflake::new(4242), "steve")
            .is_accepted());
    }

    assert!(config.storage.links_path().exists());

    let server = TestServer::start(config).await.unwrap();
    let response = server
        .get_auth(&format!("/api/v1/players/{player}/link"), API_TOKEN)
        .await
        .unwrap();
    let link: Link = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(link.remote_id, Snowflake::new(4242));
    assert_eq!(link.remote_name, "steve");

    let response = server.get("/health/ready").await.unwrap();
    let ready: Readiness = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(ready.checks.storage, "file");

    server.shutdown().await;
}

#[tokio::test]
async fn test_bug_report_ids_continue_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let body = json!({"title": "Lag", "message": "Spikes at spawn", "player_name": "Alex"});

    let server = TestServer::start(file_config(dir.path())).await.unwrap();
    for expected in 1..=2 {
        let response = server.post_auth("/api/v1/bug-reports", API_TOKEN, &body).await.unwrap();
        let report: BugReport = assert_json(response, StatusCode::CREATED).await.unwrap();
        assert_eq!(report.id, expected);
    }
    server.shutdown().await;

    let server = TestServer::start(file_config(dir.path())).await.unwrap();
    let response = server.post_auth("/api/v1/bug-reports", API_TOKEN, &body).await.unwrap();
    let report: BugReport = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(report.id, 3);

    // reports themselves are not persisted
    let response = server.get_auth("/api/v1/bug-reports/1", API_TOKEN).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    server.shutdown().await;
}

#[tokio::test]
async fn test_corrupt_link_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(dir.path());
    std::fs::write(config.storage.links_path(), "{not json").unwrap();

    let server = TestServer::start(config).await.unwrap();
    let response = server.get_auth("/api/v1/links", API_TOKEN).await.unwrap();
    let list: LinkList = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.total, 0);

    server.shutdown().await;
}
