use std::fmt::Display;

use serde::Serialize;

use crate::error::ValidationError;

const MIN_LEN: usize = 10;

/// An ISBN as typed into the form, accepted by [`Isbn::parse`] and stored without hyphens.
///
/// Acceptance only looks at length and characters. The check digit is not enforced,
/// see [`Isbn::checksum_valid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Isbn(String);

impl Isbn {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.chars().count() < MIN_LEN {
            return Err(ValidationError::IsbnTooShort);
        }
        if !input
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, 'X' | 'x' | '-'))
        {
            return Err(ValidationError::IsbnInvalidCharacters);
        }
        Ok(Self(input.replace('-', "")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the digits form a real ISBN-10 or ISBN-13.
    pub fn checksum_valid(&self) -> bool {
        self.0.to_uppercase().parse::<isbn2::Isbn>().is_ok()
    }
}

impl Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
