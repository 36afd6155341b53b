//! Placeholder templates and human-readable formatting

mod duration;
mod template;

pub use duration::format_duration;
pub use template::Placeholders;
