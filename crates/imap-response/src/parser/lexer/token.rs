//! IMAP token types.

/// Token types produced by the lexer.
///
/// Atoms and literals borrow from the response chunks; quoted strings are
/// unescaped into an owned buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Unquoted bareword, including numbers and `NIL`.
    Atom(&'a [u8]),
    /// Quoted string with escapes removed.
    QuotedString(Vec<u8>),
    /// Literal bytes announced by a `{n}` marker.
    Literal(&'a [u8]),
    /// Opening parenthesis.
    LParen,
    /// Closing parenthesis.
    RParen,
    /// Opening bracket.
    LBracket,
    /// Closing bracket.
    RBracket,
    /// End of input.
    Eof,
}

impl Token<'_> {
    /// Short description used in error messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Atom(_) => "atom",
            Self::QuotedString(_) => "quoted string",
            Self::Literal(_) => "literal",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Eof => "end of input",
        }
    }
}
