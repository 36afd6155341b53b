//! Fakes shared by the unit tests in this crate

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guildlink_common::AppConfig;
use guildlink_core::{
    CodeGenerator, ManualClock, RemoteError, RemoteMember, RemoteMessage, RemotePlatform,
    RemoteResult, RemoteRole, RemoteUser, RoleDelta, Snowflake,
};
use guildlink_store::{BugReportStore, LinkStore, SequenceStore};
use parking_lot::Mutex;

use crate::local::{LocalOutbox, MainLoop, PresenceRegistry};
use crate::services::{ServiceContext, ServiceContextBuilder};

pub const GUILD: Snowflake = Snowflake::new(900);

/// In-memory remote platform that records every call
pub struct FakeRemote {
    pub ready: AtomicBool,
    pub members: Mutex<HashMap<Snowflake, RemoteMember>>,
    pub roles: Mutex<Vec<RemoteRole>>,
    pub modifications: Mutex<Vec<RoleDelta>>,
    pub sent: Mutex<Vec<(Snowflake, String)>>,
    pub reactions: Mutex<Vec<(Snowflake, String)>>,
    pub deleted: Mutex<Vec<Snowflake>>,
    next_message_id: AtomicU64,
}

impl FakeRemote {
    pub fn ready() -> Arc<Self> {
        Arc::new(Self {
            ready: AtomicBool::new(true),
            members: Mutex::default(),
            roles: Mutex::default(),
            modifications: Mutex::default(),
            sent: Mutex::default(),
            reactions: Mutex::default(),
            deleted: Mutex::default(),
            next_message_id: AtomicU64::new(5000),
        })
    }

    pub fn add_member(&self, id: Snowflake, roles: Vec<Snowflake>) {
        self.members.lock().insert(
            id,
            RemoteMember {
                user: user(id, "member"),
                roles,
                nick: None,
            },
        );
    }

    pub fn add_role(&self, id: Snowflake) {
        self.roles.lock().push(RemoteRole {
            id,
            name: format!("role-{id}"),
            position: 0,
        });
    }

    pub fn member_roles(&self, id: Snowflake) -> Vec<Snowflake> {
        self.members.lock().get(&id).map(|m| m.roles.clone()).unwrap_or_default()
    }

    pub fn reaction_emojis(&self) -> Vec<String> {
        self.reactions.lock().iter().map(|(_, e)| e.clone()).collect()
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
        Some(Snowflake::new(1))
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
            .ok_or_else(|| RemoteError::Transport("member vanished".to_string()))?;
        entry.roles = delta.apply(&entry.roles);
        Ok(entry.roles.clone())
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> RemoteResult<RemoteMessage> {
        self.sent.lock().push((channel_id, content.to_string()));
        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        Ok(message(Snowflake::from(i64::try_from(id).unwrap_or(0)), channel_id, user(Snowflake::new(1), "bot"), content))
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

/// Hands out a fixed sequence of codes, then falls back to "ZZZZZZ"
#[derive(Default)]
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
    fn generate(&self, _length: usize) -> String {
        self.codes.lock().pop_front().unwrap_or_else(|| "ZZZZZZ".to_string())
    }
}

pub fn user(id: Snowflake, name: &str) -> RemoteUser {
    RemoteUser {
        id,
        username: name.to_string(),
        discriminator: None,
        global_name: None,
        bot: false,
    }
}

pub fn message(id: Snowflake, channel_id: Snowflake, author: RemoteUser, content: &str) -> RemoteMessage {
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

pub fn start_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// Everything a test needs to poke at besides the context itself
pub struct Harness {
    pub ctx: ServiceContext,
    pub remote: Arc<FakeRemote>,
    pub clock: Arc<ManualClock>,
    pub presence: Arc<PresenceRegistry>,
    pub outbox: Arc<LocalOutbox>,
    pub main_loop: MainLoop,
    pub store: Arc<LinkStore>,
}

pub fn harness(config: AppConfig, codes: &[&str]) -> Harness {
    let remote = FakeRemote::ready();
    let clock = Arc::new(ManualClock::new(start_time()));
    let presence = Arc::new(PresenceRegistry::new());
    let outbox = Arc::new(LocalOutbox::new());
    let (main_loop, _handle) = MainLoop::spawn();
    let store = Arc::new(LinkStore::in_memory());

    let ctx = ServiceContextBuilder::new()
        .config(Arc::new(config))
        .link_store(Arc::clone(&store))
        .bug_reports(Arc::new(BugReportStore::new(SequenceStore::in_memory())))
        .remote(remote.clone())
        .directory(presence.clone())
        .main_thread(Arc::new(main_loop.clone()))
        .outbox(Arc::clone(&outbox))
        .clock(clock.clone())
        .codes(Arc::new(ScriptedCodes::new(codes)))
        .build()
        .unwrap();

    Harness {
        ctx,
        remote,
        clock,
        presence,
        outbox,
        main_loop,
        store,
    }
}
