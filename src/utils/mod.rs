pub mod urls;

pub use urls::{UrlValidationError, extract_alias, validate_url};

/// Lowercase base-36 alphabet used for generated aliases.
pub const BASE36_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| BASE36_CHARS[rand::random_range(0..BASE36_CHARS.len())] as char)
        .take(length)
        .collect()
}
