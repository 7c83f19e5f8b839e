//! Normalized promo code value object.
//!
//! Codes are matched case-insensitively; the stored form is always uppercase.

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};

/// A normalized promo code string.
///
/// Construction trims surrounding whitespace and uppercases the input, so a
/// lookup key built from user input always matches the stored form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeKey(String);

impl CodeKey {
    /// Creates a normalized code key from a raw string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyField` if the input is empty or
    /// whitespace-only.
    pub fn try_new(code: &str) -> Result<Self, ValidationError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("code"));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Returns the normalized code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for CodeKey {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl TryFrom<String> for CodeKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(&value)
    }
}
