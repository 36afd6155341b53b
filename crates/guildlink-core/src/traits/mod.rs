//! Ports - the interfaces the core needs from the outside world

mod clock;
mod codes;
mod ports;

pub use clock::{Clock, ManualClock, SystemClock};
pub use codes::{CodeGenerator, RandomCodeGenerator};
pub use ports::{BlobStore, LocalDirectory, MainTask, MainThread, RemotePlatform};
