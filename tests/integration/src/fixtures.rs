//! Test fixtures: a fake remote platform, scripted codes, and the response
//! shapes the API returns.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guildlink_common::AppConfig;
use guildlink_core::{
    CodeGenerator, ManualClock, PartialMember, PlayerId, RemoteError, RemoteMember, RemoteMessage,
    RemotePlatform, RemoteResult, RemoteRole, RemoteUser, RoleDelta, RoleMapping, Snowflake,
};
use guildlink_service::{LocalOutbox, MainLoop, PresenceRegistry, ServiceContext, ServiceContextBuilder};
use guildlink_store::{BugReportStore, LinkStore, SequenceStore};
use parking_lot::Mutex;
use serde::Deserialize;

pub const GUILD: Snowflake = Snowflake::new(900);
pub const BOT_USER: Snowflake = Snowflake::new(1);
pub const VERIFY_CHANNEL: Snowflake = Snowflake::new(300);
pub const CONSOLE_CHANNEL: Snowflake = Snowflake::new(301);
pub const VIP_ROLE: Snowflake = Snowflake::new(7001);
pub const MOD_ROLE: Snowflake = Snowflake::new(7002);
pub const API_TOKEN: &str = "integration-token";

// ============================================================================
// Fake remote platform
// ============================================================================

/// Remote platform held entirely in memory; records what was asked of it
pub struct FakeRemote {
    ready: AtomicBool,
    members: Mutex<HashMap<Snowflake, RemoteMember>>,
    roles: Mutex<Vec<RemoteRole>>,
    pub modifications: Mutex<Vec<RoleDelta>>,
    pub sent: Mutex<Vec<(Snowflake, String)>>,
    pub reactions: Mutex<Vec<(Snowflake, String)>>,
    pub deleted: Mutex<Vec<Snowflake>>,
    next_message_id: AtomicU64,
}

impl FakeRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            ready: AtomicBool::new(true),
            members: Mutex::default(),
            roles: Mutex::default(),
            modifications: Mutex::default(),
            sent: Mutex::default(),
            reactions: Mutex::default(),
            deleted: Mutex::default(),
            next_message_id: AtomicU64::new(10_000),
        })
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn add_member(&self, id: Snowflake, name: &str, roles: Vec<Snowflake>) {
        self.members.lock().insert(
            id,
            RemoteMember {
                user: remote_user(id, name),
                roles,
                nick: None,
            },
        );
    }

    pub fn add_role(&self, id: Snowflake, name: &str) {
        self.roles.lock().push(RemoteRole {
            id,
            name: name.to_string(),
            position: 1,
        });
    }

    pub fn member_roles(&self, id: Snowflake) -> Vec<Snowflake> {
        self.members.lock().get(&id).map(|m| m.roles.clone()).unwrap_or_default()
    }

    pub fn reactions_on(&self, message: Snowflake) -> Vec<String> {
        self.reactions
            .lock()
            .iter()
            .filter(|(id, _)| *id == message)
            .map(|(_, emoji)| emoji.clone())
            .collect()
    }
}

#[async_trait]
impl RemotePlatform for FakeRemote {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn guild_id(&self) -> Option<Snowflake> {
        Some(GUILD)
    }

    fn self_user_id(&self) -> Option<Snowflake> {
        Some(BOT_USER)
    }

    async fn fetch_member(&self, _guild_id: Snowflake, user_id: Snowflake) -> RemoteResult<RemoteMember> {
        self.members.lock().get(&user_id).cloned().ok_or(RemoteError::Http {
            status: 404,
            message: "Unknown Member".to_string(),
        })
    }

    async fn guild_roles(&self, _guild_id: Snowflake) -> RemoteResult<Vec<RemoteRole>> {
        Ok(self.roles.lock().clone())
    }

    async fn modify_member_roles(
        &self,
        _guild_id: Snowflake,
        member: &RemoteMember,
        delta: &RoleDelta,
    ) -> RemoteResult<Vec<Snowflake>> {
        self.modifications.lock().push(delta.clone());
        let mut members = self.members.lock();
        let entry = members
            .get_mut(&member.user.id)
            .ok_or_else(|| RemoteError::Transport("member left the guild".to_string()))?;
        entry.roles = delta.apply(&entry.roles);
        Ok(entry.roles.clone())
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> RemoteResult<RemoteMessage> {
        self.sent.lock().push((channel_id, content.to_string()));
        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        Ok(posted_message(
            Snowflake::from(i64::try_from(id).unwrap_or_default()),
            channel_id,
            remote_user(BOT_USER, "bridge"),
            content,
        ))
    }

    async fn add_reaction(&self, _channel_id: Snowflake, message_id: Snowflake, emoji: &str) -> RemoteResult<()> {
        self.reactions.lock().push((message_id, emoji.to_string()));
        Ok(())
    }

    async fn delete_message(&self, _channel_id: Snowflake, message_id: Snowflake) -> RemoteResult<()> {
        self.deleted.lock().push(message_id);
        Ok(())
    }
}

/// Hands out the given codes in order
pub struct ScriptedCodes {
    codes: Mutex<VecDeque<String>>,
}

impl ScriptedCodes {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| (*c).to_string()).collect()),
        }
    }
}

impl CodeGenerator for ScriptedCodes {
    fn generate(&self, length: usize) -> String {
        self.codes.lock().pop_front().unwrap_or_else(|| "Z".repeat(length))
    }
}

pub fn remote_user(id: Snowflake, name: &str) -> RemoteUser {
    RemoteUser {
        id,
        username: name.to_string(),
        discriminator: None,
        global_name: None,
        bot: false,
    }
}

pub fn posted_message(id: Snowflake, channel_id: Snowflake, author: RemoteUser, content: &str) -> RemoteMessage {
    RemoteMessage {
        id,
        channel_id,
        guild_id: Some(GUILD),
        author,
        member: None,
        content: content.to_string(),
        webhook_id: None,
    }
}

/// A message from a guild member holding `roles`
pub fn member_message(id: i64, channel_id: Snowflake, author: Snowflake, roles: Vec<Snowflake>, content: &str) -> RemoteMessage {
    let mut message = posted_message(
        Snowflake::new(id),
        channel_id,
        remote_user(author, &format!("user{author}")),
        content,
    );
    message.member = Some(PartialMember { roles, nick: None });
    message
}

// ============================================================================
// Bridge wiring
// ============================================================================

pub fn start_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
}

/// Configuration used by most tests: in memory, bot off, bearer token on
pub fn base_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.in_memory = true;
    config.api.auth_token = Some(API_TOKEN.to_string());
    config.bot.messages.reply_delete_after_secs = 0;
    config.link.verification_channel_id = VERIFY_CHANNEL.to_string();
    config.link.role_mappings = vec![
        RoleMapping::new("moderator", MOD_ROLE),
        RoleMapping::new("vip", VIP_ROLE),
    ];
    config
}

/// A service context over a fake remote, with every knob reachable
pub struct TestBridge {
    pub ctx: ServiceContext,
    pub remote: Arc<FakeRemote>,
    pub clock: Arc<ManualClock>,
    pub presence: Arc<PresenceRegistry>,
    pub outbox: Arc<LocalOutbox>,
    pub main_loop: MainLoop,
    pub links: Arc<LinkStore>,
}

impl TestBridge {
    pub fn new(config: AppConfig, codes: &[&str]) -> Self {
        Self::with_store(config, codes, LinkStore::in_memory())
    }

    pub fn with_store(config: AppConfig, codes: &[&str], links: LinkStore) -> Self {
        let remote = FakeRemote::new();
        remote.add_role(VIP_ROLE, "VIP");
        remote.add_role(MOD_ROLE, "Moderator");

        let clock = Arc::new(ManualClock::new(start_time()));
        let presence = Arc::new(PresenceRegistry::new());
        let outbox = Arc::new(LocalOutbox::new());
        let (main_loop, _task) = MainLoop::spawn();
        let links = Arc::new(links);

        let ctx = ServiceContextBuilder::new()
            .config(Arc::new(config))
            .link_store(Arc::clone(&links))
            .bug_reports(Arc::new(BugReportStore::new(SequenceStore::in_memory())))
            .remote(remote.clone())
            .directory(presence.clone())
            .main_thread(Arc::new(main_loop.clone()))
            .outbox(Arc::clone(&outbox))
            .clock(clock.clone())
            .codes(Arc::new(ScriptedCodes::new(codes)))
            .build()
            .expect("test context");

        Self {
            ctx,
            remote,
            clock,
            presence,
            outbox,
            main_loop,
            links,
        }
    }
}

// ============================================================================
// Response shapes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct IssuedCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub reused: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Link {
    pub player_id: PlayerId,
    pub player_name: String,
    pub remote_id: Snowflake,
    pub remote_name: String,
    pub roles: Vec<Snowflake>,
}

#[derive(Debug, Deserialize)]
pub struct LinkList {
    pub links: Vec<Link>,
    pub total: usize,
    pub pending: usize,
    pub codes_generated: u64,
}

#[derive(Debug, Deserialize)]
pub struct Presence {
    pub online: bool,
    pub linked: bool,
    pub sync_scheduled: bool,
}

#[derive(Debug, Deserialize)]
pub struct Relay {
    pub relayed: bool,
}

#[derive(Debug, Deserialize)]
pub struct BugReport {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub status: String,
    pub player_name: String,
}

#[derive(Debug, Deserialize)]
pub struct Readiness {
    pub status: String,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Deserialize)]
pub struct ReadinessChecks {
    pub remote: String,
    pub storage: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
