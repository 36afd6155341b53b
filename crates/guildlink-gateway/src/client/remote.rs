//! Remote platform client
//!
//! Owns the gateway session task and the REST client, routes inbound
//! messages to registered handlers, and implements [`RemotePlatform`] for
//! the service layer.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use guildlink_common::BotConfig;
use guildlink_core::{
    RemoteError, RemoteMember, RemoteMessage, RemotePlatform, RemoteResult, RemoteRole, RemoteUser, RoleDelta,
    Snowflake,
};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::events::{EventListener, GatewayEvent, ListenerId, MessageHandler};
use super::session::{self, SessionSettings};
use crate::error::GatewayError;
use crate::protocol::{GatewayMessage, Intents, ReadyPayload};
use crate::rest::RestClient;

/// How long `disconnect` waits for the session task to close the socket
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

struct SessionHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct Inner {
    ready: AtomicBool,
    self_user: RwLock<Option<RemoteUser>>,
    guild_id: RwLock<Option<Snowflake>>,
    rest: RwLock<Option<RestClient>>,
    channel_handlers: DashMap<ListenerId, (Snowflake, Arc<dyn MessageHandler>)>,
    listeners: DashMap<ListenerId, Arc<dyn EventListener>>,
    next_listener: AtomicU64,
    session: Mutex<Option<SessionHandle>>,
}

/// Cheap to clone; all clones share one session
#[derive(Clone, Default)]
pub struct RemoteClient {
    inner: Arc<Inner>,
}

impl RemoteClient {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// (Re)connect using `config`.
    ///
    /// An existing session is closed first, dropping its listeners. Listeners
    /// added before the first connect are kept. When the bot is disabled or has
    /// no token this returns `Ok` and the client stays not ready, which
    /// disables verification and role sync without failing startup.
    #[instrument(skip(self, config))]
    pub async fn connect(&self, config: &BotConfig) -> Result<(), GatewayError> {
        let previous = self.inner.session.lock().is_some();
        if previous {
            self.disconnect().await;
        }

        if !config.can_connect() {
            info!("Remote bot disabled or token missing, remote features are off");
            return Ok(());
        }

        let rest = RestClient::new(
            &config.api_base_url,
            config.token.trim(),
            Duration::from_secs(config.http_timeout_secs),
        )?;
        let guild_id = config.guild();

        let settings = SessionSettings {
            gateway_url: config.gateway_url.clone(),
            token: config.token.trim().to_string(),
            intents: Intents::default(),
            ready_timeout: Duration::from_secs(config.ready_timeout_secs),
            reconnect_delay: Duration::from_millis(config.reconnect_delay_ms),
        };
        let established = session::establish(&settings).await?;

        *self.inner.rest.write() = Some(rest.clone());
        *self.inner.guild_id.write() = guild_id;
        self.on_ready(&established.ready);

        match guild_id {
            Some(guild_id) => match rest.guild_name(guild_id).await {
                Ok(name) => info!(guild_id = %guild_id, guild = %name, "Guild reachable"),
                Err(err) => warn!(guild_id = %guild_id, error = %err, "Configured guild is not reachable"),
            },
            None => warn!("No guild configured, role sync is disabled"),
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(session::run(self.clone(), established, settings, shutdown_rx));
        *self.inner.session.lock() = Some(SessionHandle { shutdown, task });

        Ok(())
    }

    /// Close the session and drop every registered handler and listener.
    /// Safe to call when not connected.
    pub async fn disconnect(&self) {
        let handle = self.inner.session.lock().take();
        self.set_ready(false);
        self.clear_listeners();

        let Some(SessionHandle { shutdown, mut task }) = handle else {
            return;
        };
        let _ = shutdown.send(true);
        if tokio::time::timeout(SHUTDOWN_GRACE, &mut task).await.is_err() {
            warn!("Gateway session did not stop in time, aborting");
            task.abort();
        }
        *self.inner.rest.write() = None;
        info!("Remote session closed");
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    /// Deliver messages created in `channel_id` to `handler`.
    ///
    /// Registrations are additive and last until `disconnect`. Without a
    /// ready session, or for a zero channel id, nothing is registered.
    pub fn on_message_in_channel<H: MessageHandler>(&self, channel_id: Snowflake, handler: H) -> Option<ListenerId> {
        if channel_id.is_zero() || !self.is_ready() {
            debug!(channel_id = %channel_id, "Channel handler ignored, no session");
            return None;
        }
        let id = self.next_id();
        self.inner.channel_handlers.insert(id, (channel_id, Arc::new(handler)));
        debug!(channel_id = %channel_id, "Channel handler registered");
        Some(id)
    }

    /// Deliver every gateway event to `listener`
    pub fn add_event_listener<L: EventListener>(&self, listener: L) -> ListenerId {
        let id = self.next_id();
        self.inner.listeners.insert(id, Arc::new(listener));
        id
    }

    /// Unregister a channel handler or event listener
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.inner.channel_handlers.remove(&id).is_some() || self.inner.listeners.remove(&id).is_some()
    }

    pub fn clear_listeners(&self) {
        self.inner.channel_handlers.clear();
        self.inner.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.inner.channel_handlers.len() + self.inner.listeners.len()
    }

    fn next_id(&self) -> ListenerId {
        ListenerId(self.inner.next_listener.fetch_add(1, Ordering::Relaxed))
    }

    // ========================================================================
    // Outbound
    // ========================================================================

    /// Fire-and-forget message; failures are logged
    pub fn post_message(&self, channel_id: Snowflake, content: impl Into<String>) {
        let client = self.clone();
        let content = content.into();
        tokio::spawn(async move {
            if let Err(err) = client.send_message(channel_id, &content).await {
                warn!(channel_id = %channel_id, error = %err, "Failed to post message");
            }
        });
    }

    pub fn self_user(&self) -> Option<RemoteUser> {
        self.inner.self_user.read().clone()
    }

    fn rest(&self) -> RemoteResult<RestClient> {
        if !self.is_ready() {
            return Err(RemoteError::NotReady);
        }
        self.inner.rest.read().clone().ok_or(RemoteError::NotReady)
    }

    // ========================================================================
    // Session callbacks
    // ========================================================================

    pub(crate) fn set_ready(&self, ready: bool) {
        self.inner.ready.store(ready, Ordering::SeqCst);
    }

    pub(crate) fn on_ready(&self, ready: &ReadyPayload) {
        info!(user = %ready.user.tag(), user_id = %ready.user.id, "Remote session ready");
        *self.inner.self_user.write() = Some(ready.user.clone());
        self.set_ready(true);
        self.emit(GatewayEvent::Ready {
            user: ready.user.clone(),
            session_id: ready.session_id.clone(),
        });
    }

    /// Route a dispatch to channel handlers and event listeners.
    /// Every delivery runs on its own task so a slow handler never stalls
    /// the socket.
    pub(crate) fn dispatch(&self, message: GatewayMessage) {
        let Some(name) = message.t else {
            return;
        };
        self.emit(GatewayEvent::from_dispatch(name, message.d.unwrap_or(Value::Null)));
    }

    fn emit(&self, event: GatewayEvent) {
        if let GatewayEvent::MessageCreate(msg) = &event {
            let handlers: Vec<_> = self
                .inner
                .channel_handlers
                .iter()
                .filter(|entry| entry.value().0 == msg.channel_id)
                .map(|entry| entry.value().1.clone())
                .collect();
            for handler in handlers {
                let msg: RemoteMessage = msg.clone();
                tokio::spawn(async move { handler.on_message(msg).await });
            }
        }

        let event = Arc::new(event);
        let listeners: Vec<_> = self.inner.listeners.iter().map(|entry| entry.value().clone()).collect();
        for listener in listeners {
            let event = event.clone();
            tokio::spawn(async move { listener.on_event(event).await });
        }
    }
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient")
            .field("ready", &self.is_ready())
            .field("guild_id", &self.guild_id())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[async_trait]
impl RemotePlatform for RemoteClient {
    fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::SeqCst)
    }

    fn guild_id(&self) -> Option<Snowflake> {
        *self.inner.guild_id.read()
    }

    fn self_user_id(&self) -> Option<Snowflake> {
        self.inner.self_user.read().as_ref().map(|u| u.id)
    }

    async fn fetch_member(&self, guild_id: Snowflake, user_id: Snowflake) -> RemoteResult<RemoteMember> {
        self.rest()?.member(guild_id, user_id).await
    }

    async fn guild_roles(&self, guild_id: Snowflake) -> RemoteResult<Vec<RemoteRole>> {
        self.rest()?.roles(guild_id).await
    }

    async fn modify_member_roles(
        &self,
        guild_id: Snowflake,
        member: &RemoteMember,
        delta: &RoleDelta,
    ) -> RemoteResult<Vec<Snowflake>> {
        self.rest()?.modify_member_roles(guild_id, member, delta).await
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> RemoteResult<RemoteMessage> {
        self.rest()?.create_message(channel_id, content).await
    }

    async fn add_reaction(&self, channel_id: Snowflake, message_id: Snowflake, emoji: &str) -> RemoteResult<()> {
        self.rest()?.create_reaction(channel_id, message_id, emoji).await
    }

    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> RemoteResult<()> {
        self.rest()?.delete_message(channel_id, message_id).await
    }
}
