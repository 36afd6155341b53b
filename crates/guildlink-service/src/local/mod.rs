//! Game server side of the bridge
//!
//! The game server talks to us over HTTP: it reports who is online and polls
//! the outbox for work it has to run itself.

mod main_loop;
mod outbox;
mod presence;

pub use main_loop::MainLoop;
pub use outbox::{LocalAction, LocalOutbox};
pub use presence::{OnlinePlayer, PresenceRegistry};
