//! Alias policy
//!
//! Aliases are case-sensitive, at most [`MAX_ALIAS_LEN`] characters and
//! unique across all owners. A missing alias is replaced by a random
//! lowercase base-36 string.

use crate::errors::{LeanurlsError, Result};
use crate::storage::SeaOrmStorage;
use crate::utils::generate_random_code;

pub const MAX_ALIAS_LEN: usize = 32;
pub const GENERATED_ALIAS_LEN: usize = 8;
/// Generated candidates tried before giving up, counting both the
/// pre-insert check and insert-time conflicts.
pub const MAX_GENERATION_ATTEMPTS: usize = 5;

pub const ALIAS_TAKEN_MESSAGE: &str = "The alias you provided for the link is already taken";

/// Characters that would break `/{alias}` routing or the resolve parser.
const RESERVED_CHARS: &[char] = &['/', '?', '#', '%'];

/// Checks the shape of a caller-supplied alias, without touching the store.
pub fn check_alias_format(alias: &str) -> Result<()> {
    if alias.is_empty() {
        return Err(LeanurlsError::validation("Alias cannot be empty"));
    }
    if alias.chars().count() > MAX_ALIAS_LEN {
        return Err(LeanurlsError::validation(format!(
            "Alias must be at most {} characters",
            MAX_ALIAS_LEN
        )));
    }
    if alias
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || RESERVED_CHARS.contains(&c))
    {
        return Err(LeanurlsError::validation(
            "Alias cannot contain whitespace, '/', '?', '#' or '%'",
        ));
    }
    Ok(())
}

pub fn generate_alias() -> String {
    generate_random_code(GENERATED_ALIAS_LEN)
}

/// Validates a requested alias and checks it is free.
///
/// The check is advisory; the unique index has the final word at insert.
pub async fn ensure_requested_alias(storage: &SeaOrmStorage, alias: &str) -> Result<()> {
    check_alias_format(alias)?;
    if storage.alias_exists(alias).await? {
        return Err(LeanurlsError::validation(ALIAS_TAKEN_MESSAGE));
    }
    Ok(())
}
