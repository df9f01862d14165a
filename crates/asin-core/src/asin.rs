//! Amazon Standard Identification Number
//!
//! An ASIN is exactly ten characters over `[A-Z0-9]`. Nothing else is
//! checked: no checksum, no catalog lookup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of every ASIN.
pub const ASIN_LEN: usize = 10;

/// Error type for ASIN validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AsinError {
    #[error("ASIN must be {ASIN_LEN} characters, got {0}")]
    InvalidLength(usize),
    #[error("Invalid ASIN character {ch:?} at index {index}")]
    InvalidChar { index: usize, ch: char },
}

/// A validated product identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Asin([u8; ASIN_LEN]);

/// Check if a byte belongs to the ASIN alphabet.
#[inline]
pub const fn is_asin_byte(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit()
}

impl Asin {
    /// Parse a full string as an ASIN.
    pub fn parse(s: &str) -> Result<Self, AsinError> {
        if s.len() != ASIN_LEN {
            return Err(AsinError::InvalidLength(s.chars().count()));
        }

        for (index, ch) in s.char_indices() {
            if !ch.is_ascii() || !is_asin_byte(ch as u8) {
                return Err(AsinError::InvalidChar { index, ch });
            }
        }

        let mut buf = [0u8; ASIN_LEN];
        buf.copy_from_slice(s.as_bytes());
        Ok(Self(buf))
    }

    /// Take an ASIN from the first ten bytes of `bytes`.
    /// Trailing bytes are ignored.
    #[inline]
    pub fn from_prefix(bytes: &[u8]) -> Option<Self> {
        let head = bytes.get(..ASIN_LEN)?;
        if !head.iter().all(|&b| is_asin_byte(b)) {
            return None;
        }

        let mut buf = [0u8; ASIN_LEN];
        buf.copy_from_slice(head);
        Some(Self(buf))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // Only ASCII bytes are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Asin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Asin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Asin({})", self.as_str())
    }
}

impl AsRef<str> for Asin {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Asin {
    type Err = AsinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Asin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Asin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
