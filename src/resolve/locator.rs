// src/resolve/locator.rs

use std::fmt;
use std::str::FromStr;

use crate::errors::{LOCATOR_PATTERN, RelaunchError, Result};

/// Separator between the unit and attribute halves of a locator.
pub const SEPARATOR: char = ':';

/// A validated `unit:attribute` string.
///
/// Exactly one separator, both halves non-empty. The original string is kept
/// verbatim so it can be forwarded to a child and quoted in errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    raw: String,
    split: usize,
}

impl Locator {
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || RelaunchError::InvalidLocatorFormat {
            locator: raw.to_string(),
            expected: LOCATOR_PATTERN,
        };

        let (unit, attribute) = raw.split_once(SEPARATOR).ok_or_else(invalid)?;
        if unit.is_empty() || attribute.is_empty() || attribute.contains(SEPARATOR) {
            return Err(invalid());
        }

        Ok(Self {
            raw: raw.to_string(),
            split: unit.len(),
        })
    }

    pub fn unit(&self) -> &str {
        &self.raw[..self.split]
    }

    pub fn attribute(&self) -> &str {
        &self.raw[self.split + SEPARATOR.len_utf8()..]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for Locator {
    type Err = RelaunchError;

    fn from_str(s: &str) -> Result<Self> {
        Locator::parse(s)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
