//! Link codes - short codes a player types into the verification channel

use rand::Rng;

/// Characters a generated code is drawn from
pub const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random code of `length` characters from [`CODE_CHARSET`]
pub fn generate_link_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

/// Lookup key for a code; codes are matched case-insensitively
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Whether a chat message could be a code at all.
///
/// Only messages of exactly `length` characters that are all ASCII alphanumeric
/// are treated as verification attempts; everything else is ignored silently.
pub fn is_well_formed_code(content: &str, length: usize) -> bool {
    let content = content.trim();
    content.len() == length && content.chars().all(|c| c.is_ascii_alphanumeric())
}
