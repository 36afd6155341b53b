//! # guildlink-gateway
//!
//! Client for the remote chat platform: a WebSocket gateway session for
//! inbound events and a REST client for member, role and message operations.

pub mod client;
pub mod error;
pub mod protocol;
pub mod rest;

pub use client::{EventListener, GatewayEvent, ListenerId, MessageHandler, RemoteClient};
pub use error::GatewayError;
pub use protocol::{CloseCode, GatewayMessage, Intents, OpCode};
pub use rest::RestClient;
