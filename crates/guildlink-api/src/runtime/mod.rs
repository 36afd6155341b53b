//! Bridge runtime
//!
//! Builds the stores, the service context and the remote client, connects,
//! and registers the verification-channel handler and console bridges.
//! `reload` applies a new configuration without dropping link state;
//! `shutdown` closes the remote session and stops the main loop.

use std::sync::Arc;

use guildlink_common::{AppConfig, AppError, AppResult};
use guildlink_core::{BlobStore, RemoteMessage, RemotePlatform};
use guildlink_gateway::{GatewayEvent, RemoteClient};
use guildlink_service::{
    ConsoleBridge, LocalOutbox, MainLoop, PresenceRegistry, ServiceContext, ServiceContextBuilder,
    VerificationHandler,
};
use guildlink_store::{BugReportStore, FileBlobStore, LinkStore, SequenceStore};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::state::AppState;

/// State that survives a reload
struct Shared {
    link_store: Arc<LinkStore>,
    bug_reports: Arc<BugReportStore>,
    outbox: Arc<LocalOutbox>,
    presence: Arc<PresenceRegistry>,
    main_loop: MainLoop,
}

pub struct BridgeRuntime {
    shared: Shared,
    remote: RemoteClient,
    state: AppState,
    main_task: JoinHandle<()>,
}

impl BridgeRuntime {
    /// Build everything and connect. A failed remote connection is logged
    /// and leaves remote features off; it never fails startup.
    pub async fn start(config: AppConfig) -> AppResult<Self> {
        let (link_store, bug_reports) = open_stores(&config);
        info!(
            links = link_store.len(),
            in_memory = config.storage.in_memory,
            "Link store loaded"
        );

        let (main_loop, main_task) = MainLoop::spawn();
        let shared = Shared {
            link_store: Arc::new(link_store),
            bug_reports: Arc::new(bug_reports),
            outbox: Arc::new(LocalOutbox::new()),
            presence: Arc::new(PresenceRegistry::new()),
            main_loop,
        };
        let remote = RemoteClient::new();

        let context = build_context(&shared, &remote, Arc::new(config))?;
        let state = AppState::new(context.clone(), shared.presence.clone());

        connect(&remote, &context).await;

        Ok(Self {
            shared,
            remote,
            state,
            main_task,
        })
    }

    /// Handle for the HTTP layer
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub fn remote(&self) -> &RemoteClient {
        &self.remote
    }

    /// Apply a new configuration. Links, pending codes, presence and the
    /// outbox are kept; storage settings take effect on the next start.
    pub async fn reload(&self, config: AppConfig) -> AppResult<()> {
        let context = build_context(&self.shared, &self.remote, Arc::new(config))?;
        self.state.replace_context(context.clone());

        self.remote.disconnect().await;
        connect(&self.remote, &context).await;

        info!("Configuration reloaded");
        Ok(())
    }

    /// Close the remote session and let queued main-loop work finish
    pub async fn shutdown(self) {
        self.remote.disconnect().await;
        self.shared.main_loop.flush().await;
        self.main_task.abort();
        info!("Bridge stopped");
    }
}

impl std::fmt::Debug for BridgeRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeRuntime")
            .field("remote", &self.remote)
            .field("links", &self.shared.link_store.len())
            .finish()
    }
}

fn open_stores(config: &AppConfig) -> (LinkStore, BugReportStore) {
    if config.storage.in_memory {
        return (LinkStore::in_memory(), BugReportStore::new(SequenceStore::in_memory()));
    }

    let links: Arc<dyn BlobStore> = Arc::new(FileBlobStore::new(config.storage.links_path()));
    let sequence: Arc<dyn BlobStore> = Arc::new(FileBlobStore::new(config.storage.bug_sequence_path()));
    (
        LinkStore::open(links),
        BugReportStore::new(SequenceStore::open(sequence)),
    )
}

fn build_context(shared: &Shared, remote: &RemoteClient, config: Arc<AppConfig>) -> AppResult<ServiceContext> {
    ServiceContextBuilder::new()
        .config(config)
        .link_store(shared.link_store.clone())
        .bug_reports(shared.bug_reports.clone())
        .remote(Arc::new(remote.clone()))
        .directory(shared.presence.clone())
        .main_thread(Arc::new(shared.main_loop.clone()))
        .outbox(shared.outbox.clone())
        .build()
        .map_err(AppError::from)
}

async fn connect(remote: &RemoteClient, ctx: &ServiceContext) {
    if let Err(err) = remote.connect(&ctx.config().bot).await {
        error!(error = %err, "Failed to connect to the remote platform, remote features are off");
        return;
    }
    if remote.is_ready() {
        register_handlers(remote, ctx);
    }
}

/// Verification channel handler plus one listener per console bridge
pub fn register_handlers(remote: &RemoteClient, ctx: &ServiceContext) {
    match ctx.config().link.verification_channel() {
        Some(channel) => {
            let handler = VerificationHandler::new(ctx.clone());
            remote.on_message_in_channel(channel, move |message: RemoteMessage| {
                let handler = handler.clone();
                async move {
                    handler.handle_message(&message).await;
                }
            });
            info!(channel_id = %channel, "Listening for verification codes");
        }
        None => warn!("No verification channel configured, codes cannot be redeemed"),
    }

    for console in &ctx.config().console {
        let bridge = Arc::new(ConsoleBridge::new(ctx.clone(), console.clone()));
        let Some(channel) = bridge.channel().filter(|_| console.enabled) else {
            continue;
        };

        remote.add_event_listener(move |event: Arc<GatewayEvent>| {
            let bridge = bridge.clone();
            async move {
                if let GatewayEvent::MessageCreate(message) = event.as_ref() {
                    bridge.handle_message(message).await;
                }
            }
        });
        info!(channel_id = %channel, "Console bridge active");
    }
}
