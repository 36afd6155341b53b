//! REST side of the remote platform

mod client;

pub use client::RestClient;
