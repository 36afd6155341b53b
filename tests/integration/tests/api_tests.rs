//! API integration tests
//!
//! Every test runs against an in-memory bridge; nothing outside the process
//! is required.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use guildlink_core::{PlayerId, Snowflake};
use guildlink_service::{
    ConsoleBridge, ConsoleDecision, LinkService, VerificationHandler, VerifyOutcome,
};
use integration_tests::*;
use reqwest::StatusCode;
use serde_json::{json, Value};

const MEMBER: Snowflake = Snowflake::new(4242);

fn player_path(player: PlayerId, tail: &str) -> String {
    format!("/api/v1/players/{player}/{tail}")
}

/// Link `player` to `MEMBER` through the service, using the first scripted code
fn link_directly(bridge: &TestBridge, player: PlayerId, name: &str) {
    let service = LinkService::new(&bridge.ctx);
    let issued = service.issue_code(player, name);
    assert!(service.verify_code(&issued.code, MEMBER, "member").is_accepted());
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start(base_config()).await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
    server.shutdown().await;
}

#[tokio::test]
async fn test_health_ready_with_bot_disabled() {
    let server = TestServer::start(base_config()).await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let ready: Readiness = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(ready.status, "ready");
    assert_eq!(ready.checks.remote, "disabled");
    assert_eq!(ready.checks.storage, "memory");
    server.shutdown().await;
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_missing_token_rejected() {
    let server = TestServer::start(base_config()).await.unwrap();
    let response = server.get("/api/v1/links").await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "MISSING_AUTHORIZATION");
    server.shutdown().await;
}

#[tokio::test]
async fn test_wrong_token_rejected() {
    let server = TestServer::start(base_config()).await.unwrap();
    let response = server.get_auth("/api/v1/links", "nope").await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "INVALID_TOKEN");
    server.shutdown().await;
}

#[tokio::test]
async fn test_no_token_configured_allows_all() {
    let mut config = base_config();
    config.api.auth_token = None;
    let server = TestServer::start(config).await.unwrap();

    let response = server.get("/api/v1/links").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
    server.shutdown().await;
}

// ============================================================================
// Input Tests
// ============================================================================

#[tokio::test]
async fn test_invalid_player_id() {
    let server = TestServer::start(base_config()).await.unwrap();
    let response = server
        .post_auth("/api/v1/players/Notch/link-code", API_TOKEN, &json!({"player_name": "Notch"}))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_PATH_PARAMETER");
    server.shutdown().await;
}

#[tokio::test]
async fn test_blank_player_name() {
    let server = TestServer::start(base_config()).await.unwrap();
    let path = player_path(PlayerId::random(), "link-code");
    let response = server.post_auth(&path, API_TOKEN, &json!({"player_name": ""})).await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");
    server.shutdown().await;
}

#[tokio::test]
async fn test_malformed_body() {
    let server = TestServer::start(base_config()).await.unwrap();
    let path = player_path(PlayerId::random(), "link-code");
    let response = server.post_auth(&path, API_TOKEN, &json!({"name": 5})).await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_BODY");
    server.shutdown().await;
}

// ============================================================================
// Link Tests
// ============================================================================

#[tokio::test]
async fn test_link_code_issued_then_reused() {
    let bridge = TestBridge::new(base_config(), &["AB12CD", "ZZ99ZZ"]);
    let server = TestServer::with_bridge(&bridge).await.unwrap();
    let path = player_path(PlayerId::random(), "link-code");

    let response = server.post_auth(&path, API_TOKEN, &json!({"player_name": "Steve"})).await.unwrap();
    let first: IssuedCode = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(first.code, "AB12CD");
    assert!(!first.reused);
    assert!(first.message.contains("AB12CD"));

    let response = server.post_auth(&path, API_TOKEN, &json!({"player_name": "Steve"})).await.unwrap();
    let second: IssuedCode = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(second.code, "AB12CD");
    assert!(second.reused);
    assert_eq!(second.expires_at, first.expires_at);
}

#[tokio::test]
async fn test_verification_links_account() {
    let bridge = TestBridge::new(base_config(), &["AB12CD"]);
    let server = TestServer::with_bridge(&bridge).await.unwrap();
    let player = PlayerId::random();

    let response = server
        .post_auth(&player_path(player, "link-code"), API_TOKEN, &json!({"player_name": "Steve"}))
        .await
        .unwrap();
    let issued: IssuedCode = assert_json(response, StatusCode::OK).await.unwrap();

    let handler = VerificationHandler::new(bridge.ctx.clone());
    let attempt = member_message(55, VERIFY_CHANNEL, MEMBER, vec![], &issued.code.to_lowercase());
    let outcome = handler.handle_message(&attempt).await.expect("code attempt");
    assert!(outcome.is_accepted());
    assert_eq!(bridge.remote.reactions_on(Snowflake::new(55)), vec!["✅".to_string()]);

    let response = server.get_auth(&player_path(player, "link"), API_TOKEN).await.unwrap();
    let link: Link = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(link.player_id, player);
    assert_eq!(link.player_name, "Steve");
    assert_eq!(link.remote_id, MEMBER);
    assert_eq!(link.remote_name, "user4242");

    let response = server.get_auth("/api/v1/links", API_TOKEN).await.unwrap();
    let list: LinkList = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.total, 1);
    assert_eq!(list.pending, 0);
    assert_eq!(list.codes_generated, 1);
    assert_eq!(list.links[0].player_id, player);
}

#[tokio::test]
async fn test_unknown_code_is_rejected() {
    let bridge = TestBridge::new(base_config(), &["AB12CD"]);
    let handler = VerificationHandler::new(bridge.ctx.clone());

    let attempt = member_message(56, VERIFY_CHANNEL, MEMBER, vec![], "QQQQQQ");
    let outcome = handler.handle_message(&attempt).await.expect("code attempt");

    assert!(!outcome.is_accepted());
    assert_eq!(bridge.remote.reactions_on(Snowflake::new(56)), vec!["❌".to_string()]);
    assert_eq!(bridge.links.len(), 0);
}

#[tokio::test]
async fn test_expired_code_is_rejected() {
    let bridge = TestBridge::new(base_config(), &["AB12CD"]);
    let player = PlayerId::random();
    LinkService::new(&bridge.ctx).issue_code(player, "Steve");

    bridge.clock.advance(chrono::Duration::minutes(11));

    let handler = VerificationHandler::new(bridge.ctx.clone());
    let attempt = member_message(57, VERIFY_CHANNEL, MEMBER, vec![], "AB12CD");
    let outcome = handler.handle_message(&attempt).await.expect("code attempt");

    assert!(!outcome.is_accepted());
    assert!(bridge.links.find_link(player).is_none());
}

#[tokio::test]
async fn test_linked_player_code_is_refused_at_verification() {
    let bridge = TestBridge::new(base_config(), &["AB12CD", "EF34GH"]);
    let server = TestServer::with_bridge(&bridge).await.unwrap();
    let player = PlayerId::random();
    link_directly(&bridge, player, "Steve");

    let response = server
        .post_auth(&player_path(player, "link-code"), API_TOKEN, &json!({"player_name": "Steve"}))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["code"], "EF34GH");

    let handler = VerificationHandler::new(bridge.ctx.clone());
    let attempt = member_message(58, VERIFY_CHANNEL, Snowflake::new(5151), vec![], "EF34GH");
    let outcome = handler.handle_message(&attempt).await.expect("code attempt");

    assert_eq!(outcome, VerifyOutcome::AlreadyLinked);
    assert_eq!(bridge.links.find_link(player).unwrap().remote_id, MEMBER);
    assert!(bridge.links.find_pending("EF34GH").is_none());
}

#[tokio::test]
async fn test_unlink() {
    let bridge = TestBridge::new(base_config(), &["AB12CD"]);
    let server = TestServer::with_bridge(&bridge).await.unwrap();
    let player = PlayerId::random();
    link_directly(&bridge, player, "Steve");

    let response = server.delete_auth(&player_path(player, "link"), API_TOKEN).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.delete_auth(&player_path(player, "link"), API_TOKEN).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server.get_auth(&player_path(player, "link"), API_TOKEN).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Presence and Role Sync Tests
// ============================================================================

#[tokio::test]
async fn test_join_syncs_roles() {
    let bridge = TestBridge::new(base_config(), &["AB12CD"]);
    bridge.remote.add_member(MEMBER, "member", vec![]);
    let server = TestServer::with_bridge(&bridge).await.unwrap();
    let player = PlayerId::random();
    link_directly(&bridge, player, "Alex");

    let response = server
        .post_auth(
            &player_path(player, "join"),
            API_TOKEN,
            &json!({"player_name": "Alex", "groups": ["vip"]}),
        )
        .await
        .unwrap();
    let presence: Presence = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(presence.online);
    assert!(presence.linked);
    assert!(presence.sync_scheduled);

    let remote = bridge.remote.clone();
    assert!(wait_until(|| {
        let remote = remote.clone();
        async move { remote.member_roles(MEMBER) == vec![VIP_ROLE] }
    })
    .await);

    // first mapping wins: moderator replaces vip
    let response = server
        .put_auth(&player_path(player, "groups"), API_TOKEN, &json!({"groups": ["vip", "moderator"]}))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    assert!(wait_until(|| {
        let remote = remote.clone();
        async move { remote.member_roles(MEMBER) == vec![MOD_ROLE] }
    })
    .await);

    let links = bridge.links.clone();
    assert!(wait_until(|| {
        let links = links.clone();
        async move { links.find_link(player).is_some_and(|l| l.roles == vec![MOD_ROLE]) }
    })
    .await);

    let response = server.post_empty_auth(&player_path(player, "sync-roles"), API_TOKEN).await.unwrap();
    let outcome: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outcome["status"], "unchanged");
}

#[tokio::test]
async fn test_join_unlinked_player() {
    let bridge = TestBridge::new(base_config(), &[]);
    let server = TestServer::with_bridge(&bridge).await.unwrap();
    let player = PlayerId::random();

    let response = server
        .post_auth(&player_path(player, "join"), API_TOKEN, &json!({"player_name": "Alex"}))
        .await
        .unwrap();
    let presence: Presence = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(presence.online);
    assert!(!presence.linked);
    assert!(!presence.sync_scheduled);

    let response = server.post_empty_auth(&player_path(player, "sync-roles"), API_TOKEN).await.unwrap();
    let outcome: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outcome, json!({"status": "skipped", "reason": "not_linked"}));
}

#[tokio::test]
async fn test_sync_skipped_while_remote_down() {
    let bridge = TestBridge::new(base_config(), &["AB12CD"]);
    bridge.remote.add_member(MEMBER, "member", vec![]);
    let server = TestServer::with_bridge(&bridge).await.unwrap();
    let player = PlayerId::random();
    link_directly(&bridge, player, "Alex");

    bridge.remote.set_ready(false);

    let response = server.post_empty_auth(&player_path(player, "sync-roles"), API_TOKEN).await.unwrap();
    let outcome: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outcome, json!({"status": "skipped", "reason": "remote_unavailable"}));
    assert!(bridge.remote.modifications.lock().is_empty());
}

#[tokio::test]
async fn test_quit_then_groups_update_is_not_found() {
    let bridge = TestBridge::new(base_config(), &[]);
    let server = TestServer::with_bridge(&bridge).await.unwrap();
    let player = PlayerId::random();

    server
        .post_auth(&player_path(player, "join"), API_TOKEN, &json!({"player_name": "Alex"}))
        .await
        .unwrap();

    let response = server.post_empty_auth(&player_path(player, "quit"), API_TOKEN).await.unwrap();
    let presence: Presence = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!presence.online);
    assert_eq!(bridge.presence.online_count(), 0);

    let response = server
        .put_auth(&player_path(player, "groups"), API_TOKEN, &json!({"groups": ["vip"]}))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Relay Tests
// ============================================================================

#[tokio::test]
async fn test_chat_relay_disabled() {
    let bridge = TestBridge::new(base_config(), &[]);
    let server = TestServer::with_bridge(&bridge).await.unwrap();

    let body = json!({
        "player_id": PlayerId::random(),
        "player_name": "Alex",
        "message": "hello",
    });
    let response = server.post_auth("/api/v1/chat", API_TOKEN, &body).await.unwrap();
    let relay: Relay = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!relay.relayed);
}

#[tokio::test]
async fn test_bug_reports_disabled() {
    let bridge = TestBridge::new(base_config(), &[]);
    let server = TestServer::with_bridge(&bridge).await.unwrap();

    let body = json!({"title": "Lag", "message": "Spikes at spawn", "player_name": "Alex"});
    let response = server.post_auth("/api/v1/bug-reports", API_TOKEN, &body).await.unwrap();
    assert_status(response, StatusCode::SERVICE_UNAVAILABLE).await.unwrap();
}

#[tokio::test]
async fn test_bug_report_filed_and_fetched() {
    let mut config = base_config();
    config.bug_report.enabled = true;
    let bridge = TestBridge::new(config, &[]);
    let server = TestServer::with_bridge(&bridge).await.unwrap();

    let body = json!({"title": "Lag", "message": "Spikes at spawn", "player_name": "Alex"});
    let response = server.post_auth("/api/v1/bug-reports", API_TOKEN, &body).await.unwrap();
    let created: BugReport = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.category, "general");
    assert_eq!(created.status, "open");

    let response = server.get_auth("/api/v1/bug-reports/1", API_TOKEN).await.unwrap();
    let fetched: BugReport = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.title, "Lag");
    assert_eq!(fetched.player_name, "Alex");

    let response = server.get_auth("/api/v1/bug-reports/99", API_TOKEN).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let unknown = json!({"title": "Lag", "message": "x", "player_name": "Alex", "category": "crash"});
    let response = server.post_auth("/api/v1/bug-reports", API_TOKEN, &unknown).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Console Bridge Tests
// ============================================================================

#[tokio::test]
async fn test_console_command_reaches_local_actions() {
    let mut config = base_config();
    config.console = vec![guildlink_common::ConsoleChannelConfig {
        channel_id: CONSOLE_CHANNEL.to_string(),
        log_commands: false,
        ..Default::default()
    }];
    let console = config.console[0].clone();
    let bridge = TestBridge::new(config, &[]);
    let server = TestServer::with_bridge(&bridge).await.unwrap();

    let console = ConsoleBridge::new(bridge.ctx.clone(), console);
    let run = member_message(60, CONSOLE_CHANNEL, MEMBER, vec![], "say hello");
    assert_eq!(console.handle_message(&run).await, ConsoleDecision::Run("say hello".to_string()));

    let blocked = member_message(61, CONSOLE_CHANNEL, MEMBER, vec![], "stop");
    assert_eq!(
        console.handle_message(&blocked).await,
        ConsoleDecision::RejectCommand("stop".to_string())
    );
    bridge.main_loop.flush().await;

    let response = server.get_auth("/api/v1/local/actions", API_TOKEN).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let actions = body["actions"].as_array().unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0]["type"], "CONSOLE_COMMAND");
    assert_eq!(actions[0]["command"], "say hello");
    assert_eq!(actions[0]["source"], "user4242");

    // drained
    let response = server.get_auth("/api/v1/local/actions", API_TOKEN).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body["actions"].as_array().unwrap().is_empty());
}
