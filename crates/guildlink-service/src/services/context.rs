//! Service context - dependency container for services
//!
//! Built once at startup and cloned into every HTTP handler and gateway
//! listener. Nothing in this crate reaches for global state.

use std::sync::Arc;

use guildlink_common::AppConfig;
use guildlink_core::{
    Clock, CodeGenerator, LocalDirectory, MainThread, RandomCodeGenerator, RemotePlatform,
    SystemClock,
};
use guildlink_store::{BugReportStore, LinkStore};

use super::error::{ServiceError, ServiceResult};
use crate::local::LocalOutbox;
use crate::webhook::WebhookSender;

/// Service context containing all dependencies
///
/// It provides access to:
/// - Configuration
/// - The link and bug report stores
/// - The remote platform and the local game server ports
/// - The webhook sender
/// - Time and code generation (swappable for tests)
#[derive(Clone)]
pub struct ServiceContext {
    config: Arc<AppConfig>,

    // Stores
    link_store: Arc<LinkStore>,
    bug_reports: Arc<BugReportStore>,

    // Ports
    remote: Arc<dyn RemotePlatform>,
    directory: Arc<dyn LocalDirectory>,
    main_thread: Arc<dyn MainThread>,
    outbox: Arc<LocalOutbox>,

    // Outbound
    webhook: WebhookSender,

    clock: Arc<dyn Clock>,
    codes: Arc<dyn CodeGenerator>,
}

impl ServiceContext {
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_arc(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }

    // === Stores ===

    pub fn link_store(&self) -> &LinkStore {
        &self.link_store
    }

    pub fn bug_reports(&self) -> &BugReportStore {
        &self.bug_reports
    }

    // === Ports ===

    pub fn remote(&self) -> &dyn RemotePlatform {
        self.remote.as_ref()
    }

    pub fn directory(&self) -> &dyn LocalDirectory {
        self.directory.as_ref()
    }

    pub fn main_thread(&self) -> &dyn MainThread {
        self.main_thread.as_ref()
    }

    pub fn outbox(&self) -> &Arc<LocalOutbox> {
        &self.outbox
    }

    // === Outbound ===

    pub fn webhook(&self) -> &WebhookSender {
        &self.webhook
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn codes(&self) -> &dyn CodeGenerator {
        self.codes.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("link_store", &self.link_store)
            .field("remote_ready", &self.remote.is_ready())
            .field("ports", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
///
/// Clock, code generator and webhook sender have defaults; everything else
/// is required.
#[derive(Default)]
pub struct ServiceContextBuilder {
    config: Option<Arc<AppConfig>>,
    link_store: Option<Arc<LinkStore>>,
    bug_reports: Option<Arc<BugReportStore>>,
    remote: Option<Arc<dyn RemotePlatform>>,
    directory: Option<Arc<dyn LocalDirectory>>,
    main_thread: Option<Arc<dyn MainThread>>,
    outbox: Option<Arc<LocalOutbox>>,
    webhook: Option<WebhookSender>,
    clock: Option<Arc<dyn Clock>>,
    codes: Option<Arc<dyn CodeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: Arc<AppConfig>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn link_store(mut self, store: Arc<LinkStore>) -> Self {
        self.link_store = Some(store);
        self
    }

    pub fn bug_reports(mut self, store: Arc<BugReportStore>) -> Self {
        self.bug_reports = Some(store);
        self
    }

    pub fn remote(mut self, remote: Arc<dyn RemotePlatform>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn directory(mut self, directory: Arc<dyn LocalDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn main_thread(mut self, main_thread: Arc<dyn MainThread>) -> Self {
        self.main_thread = Some(main_thread);
        self
    }

    pub fn outbox(mut self, outbox: Arc<LocalOutbox>) -> Self {
        self.outbox = Some(outbox);
        self
    }

    pub fn webhook(mut self, webhook: WebhookSender) -> Self {
        self.webhook = Some(webhook);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn codes(mut self, codes: Arc<dyn CodeGenerator>) -> Self {
        self.codes = Some(codes);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let missing = |name: &str| ServiceError::validation(format!("{name} is required"));

        let webhook = match self.webhook {
            Some(webhook) => webhook,
            None => WebhookSender::new().map_err(|e| ServiceError::internal(e.to_string()))?,
        };

        Ok(ServiceContext {
            config: self.config.ok_or_else(|| missing("config"))?,
            link_store: self.link_store.ok_or_else(|| missing("link_store"))?,
            bug_reports: self.bug_reports.ok_or_else(|| missing("bug_reports"))?,
            remote: self.remote.ok_or_else(|| missing("remote"))?,
            directory: self.directory.ok_or_else(|| missing("directory"))?,
            main_thread: self.main_thread.ok_or_else(|| missing("main_thread"))?,
            outbox: self.outbox.ok_or_else(|| missing("outbox"))?,
            webhook,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            codes: self.codes.unwrap_or_else(|| Arc::new(RandomCodeGenerator)),
        })
    }
}
