//! Value objects - immutable types that represent domain concepts

mod link_code;
mod player_id;
mod snowflake;

pub use link_code::{generate_link_code, is_well_formed_code, normalize_code, CODE_CHARSET};
pub use player_id::{PlayerId, PlayerIdParseError};
pub use snowflake::{Snowflake, SnowflakeParseError};
