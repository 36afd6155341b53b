//! Domain and port error types

mod domain_error;
mod port_error;

pub use domain_error::DomainError;
pub use port_error::{BlobError, RemoteError, RemoteResult};
