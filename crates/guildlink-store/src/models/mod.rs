//! Persisted models

mod snapshot;

pub use snapshot::LinkSnapshot;
