use std::{fmt::Display, num::NonZeroU32, str::FromStr};

use crate::error::ValidationError;

/// Number of units attached to a relayed citation. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    pub fn new(n: u32) -> Result<Self, ValidationError> {
        NonZeroU32::new(n).map(Self).ok_or(ValidationError::Quantity)
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl FromStr for Quantity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::Quantity)?;
        Self::new(n)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
