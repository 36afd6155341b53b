//! Application state
//!
//! Shared by every handler. The service context sits behind a lock so a
//! config reload can swap it without rebuilding the router.

use std::sync::Arc;

use guildlink_common::AppConfig;
use guildlink_service::{PresenceRegistry, ServiceContext};
use parking_lot::RwLock;

#[derive(Clone)]
pub struct AppState {
    context: Arc<RwLock<ServiceContext>>,
    presence: Arc<PresenceRegistry>,
}

impl AppState {
    pub fn new(context: ServiceContext, presence: Arc<PresenceRegistry>) -> Self {
        Self {
            context: Arc::new(RwLock::new(context)),
            presence,
        }
    }

    /// Snapshot of the current service context (cheap, all fields are shared)
    pub fn service_context(&self) -> ServiceContext {
        self.context.read().clone()
    }

    pub fn config(&self) -> Arc<AppConfig> {
        self.context.read().config_arc()
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    /// Swap in a rebuilt context; requests already running keep the old one
    pub(crate) fn replace_context(&self, context: ServiceContext) {
        *self.context.write() = context;
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &*self.context.read())
            .field("online", &self.presence.online_count())
            .finish()
    }
}
