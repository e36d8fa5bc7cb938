//! Response chunks handed over by the transport.

/// One raw response line plus the literal announced at its end, if any.
///
/// The transport strips the CRLF from `line`. When the line ends with a
/// literal marker such as `{5}`, the transport reads exactly that many bytes
/// off the wire and stores them in `literal`; whatever the server sends after
/// the literal continues in the next chunk's `line`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseChunk {
    /// Line bytes without the trailing CRLF.
    pub line: Vec<u8>,
    /// Literal bytes announced by a marker at the end of `line`.
    pub literal: Option<Vec<u8>>,
}

impl ResponseChunk {
    /// Creates a chunk holding a plain line.
    #[must_use]
    pub fn line(line: impl Into<Vec<u8>>) -> Self {
        Self {
            line: line.into(),
            literal: None,
        }
    }

    /// Creates a chunk whose line ends with a literal marker.
    #[must_use]
    pub fn with_literal(line: impl Into<Vec<u8>>, literal: impl Into<Vec<u8>>) -> Self {
        Self {
            line: line.into(),
            literal: Some(literal.into()),
        }
    }
}

/// Strips the braces from a literal marker, returning the declared length
/// text. Accepts `{12}`, the non-synchronizing `{12+}` and the RFC 3516
/// `~{12}` form.
pub(crate) fn marker_digits(atom: &[u8]) -> Option<&[u8]> {
    let inner = atom
        .strip_prefix(b"~")
        .unwrap_or(atom)
        .strip_prefix(b"{")?
        .strip_suffix(b"}")?;
    Some(inner.strip_suffix(b"+").unwrap_or(inner))
}

/// Parses the digits of a literal marker.
pub(crate) fn parse_length(digits: &[u8]) -> Option<usize> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Returns the literal length announced at the end of a raw line.
///
/// The line must not include its CRLF. Lines that do not end with a
/// well-formed marker yield `None`.
#[must_use]
pub fn literal_length(line: &[u8]) -> Option<usize> {
    let end = line
        .iter()
        .rposition(|&b| !super::is_whitespace(b))
        .map_or(0, |i| i + 1);
    let trimmed = &line[..end];

    let mut start = trimmed.iter().rposition(|&b| b == b'{')?;
    if start > 0 && trimmed[start - 1] == b'~' {
        start -= 1;
    }
    if start > 0 && !super::is_delimiter(trimmed[start - 1]) {
        return None;
    }

    parse_length(marker_digits(&trimmed[start..])?)
}
