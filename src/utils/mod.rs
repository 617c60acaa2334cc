pub mod ip;
pub mod url_validator;

/// URL-safe alphabet used for generated codes (same set nanoid draws from)
pub const CODE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// Codes that would be shadowed by other routes
pub const RESERVED_CODES: &[&str] = &["api"];

pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// 短码只允许 URL 安全字符，且不超过 `max_len`
pub fn is_valid_short_code(code: &str, max_len: usize) -> bool {
    !code.is_empty()
        && code.len() <= max_len
        && code.bytes().all(|b| CODE_ALPHABET.contains(&b))
}
