//! Domain events

mod link_event;

pub use link_event::LinkEvent;
