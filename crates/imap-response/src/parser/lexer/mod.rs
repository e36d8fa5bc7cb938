//! IMAP lexer for tokenizing server responses.
//!
//! The lexer walks a sequence of [`ResponseChunk`]s. Each chunk's line is
//! scanned for atoms, quoted strings and parenthesis/bracket tokens; a literal
//! marker at the end of a line yields the chunk's pre-read literal bytes as a
//! single token, after which scanning resumes on the next chunk.

#![allow(clippy::missing_errors_doc)]

mod chunk;
mod token;

pub use chunk::{ResponseChunk, literal_length};
pub use token::Token;

use crate::{Error, Result};

use chunk::{marker_digits, parse_length};

/// IMAP lexer state.
pub struct Lexer<'a> {
    chunks: &'a [ResponseChunk],
    chunk: usize,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over the given chunks.
    #[must_use]
    pub const fn new(chunks: &'a [ResponseChunk]) -> Self {
        Self::starting_at(chunks, 0)
    }

    /// Creates a lexer that skips the first `offset` bytes of the first line.
    #[must_use]
    pub const fn starting_at(chunks: &'a [ResponseChunk], offset: usize) -> Self {
        Self {
            chunks,
            chunk: 0,
            pos: offset,
        }
    }

    /// Returns the current position as (chunk index, byte offset).
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        (self.chunk, self.pos)
    }

    /// Returns true once every chunk has been consumed.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.chunk >= self.chunks.len()
    }

    /// Reads the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        let chunks = self.chunks;
        loop {
            let Some(chunk) = chunks.get(self.chunk) else {
                return Ok(Token::Eof);
            };
            let line = chunk.line.as_slice();

            while line.get(self.pos).copied().is_some_and(is_whitespace) {
                self.pos += 1;
            }

            let Some(&byte) = line.get(self.pos) else {
                if chunk.literal.is_some() {
                    return Err(self.error(self.pos, "literal supplied but line has no literal marker"));
                }
                self.next_chunk();
                continue;
            };

            return match byte {
                b'(' => self.single(Token::LParen),
                b')' => self.single(Token::RParen),
                b'[' => self.single(Token::LBracket),
                b']' => self.single(Token::RBracket),
                b'"' => self.read_quoted_string(line),
                _ => self.read_atom(chunk),
            };
        }
    }

    /// Consumes a single-byte token.
    #[allow(clippy::unnecessary_wraps)]
    fn single(&mut self, token: Token<'a>) -> Result<Token<'a>> {
        self.pos += 1;
        Ok(token)
    }

    /// Moves on to the start of the next chunk.
    fn next_chunk(&mut self) {
        self.chunk += 1;
        self.pos = 0;
    }

    /// Reads a quoted string token.
    ///
    /// `\"` and `\\` are unescaped; any other byte after a backslash is kept
    /// together with the backslash.
    fn read_quoted_string(&mut self, line: &'a [u8]) -> Result<Token<'a>> {
        let start = self.pos;
        self.pos += 1; // Skip opening quote

        let mut result = Vec::new();

        while let Some(&b) = line.get(self.pos) {
            self.pos += 1;
            match b {
                b'"' => return Ok(Token::QuotedString(result)),
                b'\\' => match line.get(self.pos) {
                    Some(&escaped @ (b'"' | b'\\')) => {
                        result.push(escaped);
                        self.pos += 1;
                    }
                    Some(_) => result.push(b'\\'),
                    None => break,
                },
                _ => result.push(b),
            }
        }

        Err(self.error(start, "unterminated quoted string"))
    }

    /// Reads an atom, or the literal it announces when the atom is a marker
    /// ending the line.
    fn read_atom(&mut self, chunk: &'a ResponseChunk) -> Result<Token<'a>> {
        let line = chunk.line.as_slice();
        let start = self.pos;

        while line.get(self.pos).is_some_and(|&b| !is_delimiter(b)) {
            self.pos += 1;
        }

        let atom = &line[start..self.pos];
        let at_line_end = line[self.pos..].iter().all(|&b| is_whitespace(b));

        if at_line_end && let Some(digits) = marker_digits(atom) {
            return self.read_literal(chunk, start, digits);
        }

        Ok(Token::Atom(atom))
    }

    /// Produces the literal token for a marker at the end of the current line.
    fn read_literal(
        &mut self,
        chunk: &'a ResponseChunk,
        start: usize,
        digits: &[u8],
    ) -> Result<Token<'a>> {
        let Some(size) = parse_length(digits) else {
            return Err(self.error(start, "invalid literal length"));
        };

        let Some(literal) = chunk.literal.as_deref() else {
            return Err(self.error(start, &format!("no literal supplied for marker of size {size}")));
        };

        if literal.len() != size {
            return Err(self.error(
                start,
                &format!("expecting literal of size {size}, got {}", literal.len()),
            ));
        }

        self.next_chunk();
        Ok(Token::Literal(literal))
    }

    /// Creates a lex error pointing into the current chunk.
    fn error(&self, position: usize, message: &str) -> Error {
        let line = self
            .chunks
            .get(self.chunk)
            .map(|c| c.line.escape_ascii().to_string())
            .unwrap_or_default();
        Error::Lex {
            chunk: self.chunk,
            position,
            message: message.to_string(),
            line,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Token::Eof) => None,
            other => Some(other),
        }
    }
}

/// Returns true for bytes that separate tokens without producing one.
#[must_use]
pub const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Returns true for bytes that end an atom.
#[must_use]
pub const fn is_delimiter(b: u8) -> bool {
    is_whitespace(b) || matches!(b, b'(' | b')' | b'[' | b']' | b'"')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tokens(chunks: &[ResponseChunk]) -> Vec<Token<'_>> {
        Lexer::new(chunks).collect::<Result<Vec<_>>>().unwrap()
    }

    fn lex_error(chunks: &[ResponseChunk]) -> Error {
        Lexer::new(chunks)
            .collect::<Result<Vec<_>>>()
            .unwrap_err()
    }

    #[test]
    fn test_simple_tokens() {
        let chunks = [ResponseChunk::line("abc 111 def")];
        assert_eq!(
            tokens(&chunks),
            vec![Token::Atom(b"abc"), Token::Atom(b"111"), Token::Atom(b"def")]
        );
    }

    #[test]
    fn test_multiple_chunks() {
        let chunks = [ResponseChunk::line("abc 111"), ResponseChunk::line("def 222")];
        assert_eq!(
            tokens(&chunks),
            vec![
                Token::Atom(b"abc"),
                Token::Atom(b"111"),
                Token::Atom(b"def"),
                Token::Atom(b"222")
            ]
        );
    }

    #[test]
    fn test_whitespace() {
        let chunks = [ResponseChunk::line("  abc \t\t\r\r\n\n  def  ")];
        assert_eq!(tokens(&chunks), vec![Token::Atom(b"abc"), Token::Atom(b"def")]);
    }

    #[test]
    fn test_quoted_strings() {
        let chunks = [ResponseChunk::line("111 \"abc def\" \"\" 222")];
        assert_eq!(
            tokens(&chunks),
            vec![
                Token::Atom(b"111"),
                Token::QuotedString(b"abc def".to_vec()),
                Token::QuotedString(Vec::new()),
                Token::Atom(b"222")
            ]
        );
    }

    #[test]
    fn test_escaping() {
        let chunks = [ResponseChunk::line(r#""aaa\\bbb \"\"" "aaa\Zbbb""#)];
        assert_eq!(
            tokens(&chunks),
            vec![
                Token::QuotedString(br#"aaa\bbb """#.to_vec()),
                Token::QuotedString(br"aaa\Zbbb".to_vec())
            ]
        );
    }

    #[test]
    fn test_eight_bit_quoted() {
        let chunks = [ResponseChunk::line(b"\"caf\xc3\xa9\"".to_vec())];
        assert_eq!(
            tokens(&chunks),
            vec![Token::QuotedString(b"caf\xc3\xa9".to_vec())]
        );
    }

    #[test]
    fn test_unterminated_strings() {
        for input in ["\"", "\"aaa bbb", "(FOO \"bar", "\"trailing\\"] {
            let err = lex_error(&[ResponseChunk::line(input)]);
            assert!(matches!(err, Error::Lex { .. }), "{input}: {err}");
            assert!(err.to_string().contains("unterminated quoted string"));
        }
    }

    #[test]
    fn test_lists() {
        let chunks = [ResponseChunk::line("(aaa (bbb ccc))()")];
        assert_eq!(
            tokens(&chunks),
            vec![
                Token::LParen,
                Token::Atom(b"aaa"),
                Token::LParen,
                Token::Atom(b"bbb"),
                Token::Atom(b"ccc"),
                Token::RParen,
                Token::RParen,
                Token::LParen,
                Token::RParen
            ]
        );
    }

    #[test]
    fn test_brackets_split_atoms() {
        let chunks = [ResponseChunk::line("BODY[HEADER.FIELDS (FROM)]<0>")];
        assert_eq!(
            tokens(&chunks),
            vec![
                Token::Atom(b"BODY"),
                Token::LBracket,
                Token::Atom(b"HEADER.FIELDS"),
                Token::LParen,
                Token::Atom(b"FROM"),
                Token::RParen,
                Token::RBracket,
                Token::Atom(b"<0>")
            ]
        );
    }

    #[test]
    fn test_flags_are_atoms() {
        let chunks = [ResponseChunk::line(r"(\Seen \* $Junk)")];
        assert_eq!(
            tokens(&chunks),
            vec![
                Token::LParen,
                Token::Atom(br"\Seen"),
                Token::Atom(br"\*"),
                Token::Atom(b"$Junk"),
                Token::RParen
            ]
        );
    }

    #[test]
    fn test_literal_resumes_on_next_chunk() {
        let chunks = [
            ResponseChunk::with_literal("X {5}", "hello"),
            ResponseChunk::line(" trailing text"),
        ];
        assert_eq!(
            tokens(&chunks),
            vec![
                Token::Atom(b"X"),
                Token::Literal(b"hello"),
                Token::Atom(b"trailing"),
                Token::Atom(b"text")
            ]
        );
    }

    #[test]
    fn test_literal_is_not_relexed() {
        let chunks = [
            ResponseChunk::with_literal("{9}", "(\"a) {3}\r"),
            ResponseChunk::line(")"),
        ];
        assert_eq!(
            tokens(&chunks),
            vec![Token::Literal(b"(\"a) {3}\r"), Token::RParen]
        );
    }

    #[test]
    fn test_consecutive_literals() {
        let chunks = [
            ResponseChunk::with_literal("abc {7}", "foo bar"),
            ResponseChunk::with_literal("{5}", "snafu"),
            ResponseChunk::line(")"),
        ];
        assert_eq!(
            tokens(&chunks),
            vec![
                Token::Atom(b"abc"),
                Token::Literal(b"foo bar"),
                Token::Literal(b"snafu"),
                Token::RParen
            ]
        );
    }

    #[test]
    fn test_literal_plus_and_binary_markers() {
        let chunks = [
            ResponseChunk::with_literal("A {3+}", "abc"),
            ResponseChunk::with_literal(" B ~{2}", "\0\x01"),
            ResponseChunk::line(""),
        ];
        assert_eq!(
            tokens(&chunks),
            vec![
                Token::Atom(b"A"),
                Token::Literal(b"abc"),
                Token::Atom(b"B"),
                Token::Literal(b"\0\x01")
            ]
        );
    }

    #[test]
    fn test_marker_mid_line_is_plain_atom() {
        let chunks = [ResponseChunk::line("{5} more")];
        assert_eq!(
            tokens(&chunks),
            vec![Token::Atom(b"{5}"), Token::Atom(b"more")]
        );
    }

    #[test]
    fn test_literal_length_mismatch() {
        let err = lex_error(&[ResponseChunk::with_literal("{99}", "abc")]);
        assert!(err.to_string().contains("expecting literal of size 99, got 3"));
    }

    #[test]
    fn test_bad_literal_length() {
        let err = lex_error(&[ResponseChunk::with_literal("BODY {1x}", "a")]);
        assert!(err.to_string().contains("invalid literal length"));
    }

    #[test]
    fn test_missing_literal() {
        let err = lex_error(&[ResponseChunk::line("BODY {4}")]);
        assert!(err.to_string().contains("no literal supplied"));
    }

    #[test]
    fn test_literal_without_marker() {
        let err = lex_error(&[ResponseChunk::with_literal("BODY", "data")]);
        assert!(err.to_string().contains("no literal marker"));
    }

    #[test]
    fn test_error_reports_position() {
        let err = lex_error(&[ResponseChunk::line("ok"), ResponseChunk::line("12 \"open")]);
        match err {
            Error::Lex {
                chunk,
                position,
                line,
                ..
            } => {
                assert_eq!(chunk, 1);
                assert_eq!(position, 3);
                assert_eq!(line, "12 \\\"open");
            }
            other => panic!("Expected lex error, got {other:?}"),
        }
    }

    #[test]
    fn test_starting_offset() {
        let chunks = [ResponseChunk::line("* 3 EXISTS")];
        let mut lexer = Lexer::starting_at(&chunks, 2);
        assert_eq!(lexer.next_token().unwrap(), Token::Atom(b"3"));
        assert_eq!(lexer.next_token().unwrap(), Token::Atom(b"EXISTS"));
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
        assert!(lexer.is_eof());
    }

    #[test]
    fn test_is_delimiter() {
        for b in *b" \t\r\n()[]\"" {
            assert!(is_delimiter(b));
        }
        for b in *b"A0\\{}*%<" {
            assert!(!is_delimiter(b));
        }
    }
}
