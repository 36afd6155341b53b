//! Inbound gateway events and the listener traits they are delivered to

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use guildlink_core::{RemoteMessage, RemoteUser};
use serde::Deserialize;
use serde_json::Value;

/// Event names
pub mod event_names {
    pub const READY: &str = "READY";
    pub const MESSAGE_CREATE: &str = "MESSAGE_CREATE";
}

/// A dispatch received from the gateway
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    Ready { user: RemoteUser, session_id: String },
    MessageCreate(RemoteMessage),
    /// Anything we do not decode
    Other { name: String, data: Value },
}

impl GatewayEvent {
    /// Decode a dispatch; payloads that fail to decode fall back to `Other`
    pub fn from_dispatch(name: String, data: Value) -> Self {
        if name == event_names::MESSAGE_CREATE {
            if let Ok(message) = RemoteMessage::deserialize(&data) {
                return Self::MessageCreate(message);
            }
        }
        Self::Other { name, data }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Ready { .. } => event_names::READY,
            Self::MessageCreate(_) => event_names::MESSAGE_CREATE,
            Self::Other { name, .. } => name,
        }
    }
}

/// Handle returned on registration, used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Receives messages created in one channel
#[async_trait]
pub trait MessageHandler: Send + Sync + 'static {
    async fn on_message(&self, message: RemoteMessage);
}

#[async_trait]
impl<F, Fut> MessageHandler for F
where
    F: Fn(RemoteMessage) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn on_message(&self, message: RemoteMessage) {
        (self)(message).await;
    }
}

/// Receives every dispatch
#[async_trait]
pub trait EventListener: Send + Sync + 'static {
    async fn on_event(&self, event: Arc<GatewayEvent>);
}

#[async_trait]
impl<F, Fut> EventListener for F
where
    F: Fn(Arc<GatewayEvent>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn on_event(&self, event: Arc<GatewayEvent>) {
        (self)(event).await;
    }
}
