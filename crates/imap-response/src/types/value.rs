//! The parsed value tree.

use chrono::{DateTime, FixedOffset};

use super::{Address, BodyData, Envelope};

/// A single node of a parsed response.
///
/// The generic grammar only produces [`Value::Int`], [`Value::Bytes`],
/// [`Value::Nil`], [`Value::List`] and [`Value::Section`]. The remaining
/// variants are produced by FETCH post-processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unquoted atom matching the integer grammar.
    Int(i64),
    /// Atom, quoted string or literal.
    Bytes(Vec<u8>),
    /// The `NIL` atom.
    Nil,
    /// Parenthesized list.
    List(Vec<Self>),
    /// Square-bracketed section, such as a response code or the section
    /// specifier of `BODY[1.2]`.
    Section(Vec<Self>),
    /// Message flags or Gmail labels, in server order.
    Flags(Vec<Vec<u8>>),
    /// Timestamp with the offset it was given in.
    DateTime(DateTime<FixedOffset>),
    /// Message envelope.
    Envelope(Box<Envelope>),
    /// Envelope address.
    Address(Address),
    /// Body structure.
    Body(Box<BodyData>),
}

impl Value {
    /// Returns true for `NIL`.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the byte string, if this is one.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the items of a parenthesized list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the flags, if this is a flag list.
    #[must_use]
    pub fn as_flags(&self) -> Option<&[Vec<u8>]> {
        match self {
            Self::Flags(flags) => Some(flags),
            _ => None,
        }
    }

    /// Converts a byte string or integer into bytes.
    ///
    /// Integers render back to the exact atom they were parsed from, since
    /// only canonical decimal atoms are read as integers.
    #[must_use]
    pub fn into_bytes_lossless(self) -> Option<Vec<u8>> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::Int(n) => Some(n.to_string().into_bytes()),
            _ => None,
        }
    }

    /// Short description of the variant used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Bytes(_) => "string",
            Self::Nil => "NIL",
            Self::List(_) => "list",
            Self::Section(_) => "section",
            Self::Flags(_) => "flags",
            Self::DateTime(_) => "datetime",
            Self::Envelope(_) => "envelope",
            Self::Address(_) => "address",
            Self::Body(_) => "body structure",
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Bytes(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

/// Parses an atom into its value: `NIL`, an integer, or a byte string.
///
/// Integers follow `-?[0-9]+` with no redundant leading zero and must fit in
/// an `i64`; everything else stays a byte string with its case preserved.
///
/// Digit runs such as `0123` or `-0` are therefore byte strings, not
/// integers, so that rendering an [`Value::Int`] back to text always gives
/// the original atom. Folder names like `007` keep their leading zeros.
///
/// ```
/// use imap_response::types::{Value, atom_value};
///
/// assert_eq!(atom_value(b"123"), Value::Int(123));
/// assert_eq!(atom_value(b"0123"), Value::Bytes(b"0123".to_vec()));
/// assert_eq!(atom_value(b"nil"), Value::Nil);
/// ```
#[must_use]
pub fn atom_value(atom: &[u8]) -> Value {
    if atom.eq_ignore_ascii_case(b"NIL") {
        return Value::Nil;
    }
    if is_canonical_integer(atom)
        && let Some(n) = std::str::from_utf8(atom).ok().and_then(|s| s.parse().ok())
    {
        return Value::Int(n);
    }
    Value::Bytes(atom.to_vec())
}

/// Returns true if the atom is a decimal integer without a redundant leading
/// zero or negative zero.
pub(crate) fn is_canonical_integer(atom: &[u8]) -> bool {
    let digits = atom.strip_prefix(b"-").unwrap_or(atom);
    let negative = digits.len() != atom.len();
    match digits {
        [] => false,
        [b'0'] => !negative,
        [b'0', ..] => false,
        _ => digits.iter().all(u8::is_ascii_digit),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_value() {
        assert_eq!(atom_value(b"45"), Value::Int(45));
        assert_eq!(atom_value(b"0"), Value::Int(0));
        assert_eq!(atom_value(b"-12"), Value::Int(-12));
        assert_eq!(atom_value(b"NIL"), Value::Nil);
        assert_eq!(atom_value(b"nil"), Value::Nil);
        assert_eq!(atom_value(b"FOO"), Value::from("FOO"));
        assert_eq!(atom_value(br"\Seen"), Value::from(r"\Seen"));
    }

    #[test]
    fn test_non_canonical_numbers_stay_bytes() {
        assert_eq!(atom_value(b"0123"), Value::from("0123"));
        assert_eq!(atom_value(b"-0"), Value::from("-0"));
        assert_eq!(atom_value(b"-"), Value::from("-"));
        assert_eq!(atom_value(b"12a"), Value::from("12a"));
        assert_eq!(
            atom_value(b"99999999999999999999"),
            Value::from("99999999999999999999")
        );
    }

    #[test]
    fn test_into_bytes_lossless() {
        assert_eq!(
            Value::Int(2000).into_bytes_lossless(),
            Some(b"2000".to_vec())
        );
        assert_eq!(Value::from("x").into_bytes_lossless(), Some(b"x".to_vec()));
        assert_eq!(Value::Nil.into_bytes_lossless(), None);
    }
}
