//! Tags and sequence numbers as they appear on response lines.

use std::fmt;
use std::num::NonZeroU32;

use crate::{Error, Result};

/// Tag of a completion response, e.g. `A042` in `A042 OK done`.
///
/// Tags come off the wire as bytes; anything that is not UTF-8 is replaced
/// so the tag can still be compared against the one a client sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Builds a tag from the first word of a response line.
    #[must_use]
    pub fn from_bytes(word: &[u8]) -> Self {
        Self(String::from_utf8_lossy(word).into_owned())
    }

    /// Returns the tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `line` is a response carrying this tag.
    #[must_use]
    pub fn starts(&self, line: &[u8]) -> bool {
        line.strip_prefix(self.0.as_bytes())
            .is_some_and(|rest| rest.first() == Some(&b' '))
    }
}

impl From<&str> for Tag {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for Tag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Message sequence number from `* n EXPUNGE` or `* n FETCH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeqNum(NonZeroU32);

impl SeqNum {
    /// Returns the number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for SeqNum {
    type Error = Error;

    /// Fails for 0, which servers must never send as a sequence number.
    fn try_from(n: u32) -> Result<Self> {
        NonZeroU32::new(n)
            .map(Self)
            .ok_or_else(|| Error::parse("sequence number must be non-zero", "0"))
    }
}

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_from_wire_bytes() {
        assert_eq!(Tag::from_bytes(b"A042").as_str(), "A042");
        assert_eq!(Tag::from_bytes(b"x\xffy").as_str(), "x\u{fffd}y");
        assert_eq!(Tag::from("a1").to_string(), "a1");
    }

    #[test]
    fn test_tag_starts_line() {
        let tag = Tag::from("A1");
        assert!(tag.starts(b"A1 OK LOGIN completed"));
        assert!(!tag.starts(b"A10 OK other command"));
        assert!(!tag.starts(b"A1"));
        assert!(!tag.starts(b"* A1 OK"));
    }

    #[test]
    fn test_seq_num_rejects_zero() {
        let err = SeqNum::try_from(0).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(SeqNum::try_from(u32::MAX).unwrap().get(), u32::MAX);
        assert_eq!(SeqNum::try_from(17).unwrap().to_string(), "17");
    }
}
