//! Short code normalization and candidate generation.
//!
//! Codes are lowercase base-36 strings of 3 to 20 characters. The same
//! [`normalize_code`] is applied to freshly generated candidates and to codes
//! supplied by visitors, so both sides of the mapping agree on one form.

use crate::error::AppError;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Shortest code accepted after normalization.
pub const MIN_CODE_LENGTH: usize = 3;

/// Normalized codes are truncated to this length.
pub const MAX_CODE_LENGTH: usize = 20;

/// Length of candidates tried first by the allocator.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Length of the single longer candidate tried after repeated collisions.
pub const LONG_CODE_LENGTH: usize = 8;

/// Codes shadowed by static routes; never handed out by the allocator.
pub const RESERVED_CODES: &[&str] = &["api", "health", "redirect"];

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Characters outside the code alphabet.
static NON_CODE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]").expect("static regex is valid"));

/// Normalizes a raw short code.
///
/// Lowercases, trims, drops every character outside `[a-z0-9]` and truncates
/// to [`MAX_CODE_LENGTH`]. The result may be shorter than [`MIN_CODE_LENGTH`];
/// use [`parse_code`] when a usable code is required.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_code("My-Code_123!!"), "mycode123");
/// ```
pub fn normalize_code(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut code = NON_CODE_CHARS.replace_all(&lowered, "").into_owned();
    code.truncate(MAX_CODE_LENGTH);
    code
}

/// Normalizes a raw short code and rejects results that are too short.
///
/// # Errors
///
/// Returns [`AppError::InvalidCodeFormat`] if the normalized code has fewer
/// than [`MIN_CODE_LENGTH`] characters.
pub fn parse_code(raw: &str) -> Result<String, AppError> {
    let code = normalize_code(raw);

    if code.len() < MIN_CODE_LENGTH {
        return Err(AppError::InvalidCodeFormat);
    }

    Ok(code)
}

/// Returns `true` if `code` collides with a static route segment.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Generates a random base-36 candidate of `length` characters.
///
/// The candidate is passed through [`normalize_code`], so lengths above
/// [`MAX_CODE_LENGTH`] are truncated.
pub fn generate_candidate(length: usize) -> String {
    let mut rng = rand::rng();

    let raw: String = (0..length)
        .map(|_| {
            let idx = rng.random_range(0..BASE36_ALPHABET.len());
            BASE36_ALPHABET[idx] as char
        })
        .collect();

    normalize_code(&raw)
}

/// Builds the last-resort candidate from a millisecond timestamp.
///
/// The timestamp is rendered in base 36 and followed by two random base-36
/// characters.
pub fn timestamp_candidate(timestamp_millis: u64) -> String {
    let mut raw = to_base36(timestamp_millis);
    raw.push_str(&generate_candidate(2));
    normalize_code(&raw)
}

/// Renders an integer in lowercase base 36.
fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    String::from_utf8(digits).unwrap_or_default()
}
