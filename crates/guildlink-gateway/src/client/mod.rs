//! Gateway client: session lifecycle, event routing and the
//! [`RemotePlatform`](guildlink_core::RemotePlatform) implementation.

mod events;
mod remote;
mod session;

pub use events::{EventListener, GatewayEvent, ListenerId, MessageHandler};
pub use remote::RemoteClient;
