// Username normalization and validation.
//
// `validate` is the submit-time gate: nothing reaches the network unless it
// passes. `sanitize_live` is the advisory in-place cleanup applied while the
// user types.

use thiserror::Error;

pub const MIN_LEN: usize = 4;
pub const MAX_LEN: usize = 32;

/// A username that passed every check. Holds the normalized form (no `@`,
/// no surrounding whitespace).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a username was rejected. `Display` is the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a username")]
    Empty,
    #[error("Username must be at least 4 characters long")]
    TooShort,
    #[error("Username must be less than 32 characters")]
    TooLong,
    #[error("Username can only contain letters, numbers, and underscores")]
    InvalidCharacters,
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Trim and strip a single leading `@`.
pub fn normalize(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix('@').unwrap_or(trimmed)
}

/// Normalize `raw` and run the checks in order, stopping at the first failure.
pub fn validate(raw: &str) -> Result<Username, ValidationError> {
    let name = normalize(raw);
    let len = name.chars().count();

    if name.is_empty() {
        return Err(ValidationError::Empty);
    }
    if len < MIN_LEN {
        return Err(ValidationError::TooShort);
    }
    if len > MAX_LEN {
        return Err(ValidationError::TooLong);
    }
    if !name.chars().all(is_allowed) {
        return Err(ValidationError::InvalidCharacters);
    }

    Ok(Username(name.to_string()))
}

/// Live-typing cleanup: drops `@` and every character outside
/// `[A-Za-z0-9_]`, then clips to `MAX_LEN`.
pub fn sanitize_live(raw: &str) -> String {
    raw.chars().filter(|c| is_allowed(*c)).take(MAX_LEN).collect()
}

/// Soft visual hint shown on the input while typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputHint {
    #[default]
    Neutral,
    Warning,
    Valid,
}

impl InputHint {
    pub fn for_len(len: usize) -> Self {
        match len {
            0 => InputHint::Neutral,
            n if n < MIN_LEN => InputHint::Warning,
            _ => InputHint::Valid,
        }
    }
}
