//! HTTP request handlers

pub mod health;
pub mod links;
pub mod local;
pub mod players;
pub mod relay;
