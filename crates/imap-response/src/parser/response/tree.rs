//! Generic recursive-descent parser producing the value tree.

use crate::parser::lexer::{Lexer, ResponseChunk, Token};
use crate::serialize::render;
use crate::types::{Value, atom_value};
use crate::{Error, Result};

/// Maximum nesting of lists and sections.
pub const MAX_DEPTH: usize = 256;

/// Parses a response into its top-level values.
///
/// Atoms become integers, `NIL` or byte strings; quoted strings and literals
/// become byte strings; `(...)` becomes [`Value::List`] and `[...]`
/// becomes [`Value::Section`].
///
/// # Errors
///
/// Returns [`Error::Lex`] for malformed tokens and [`Error::Parse`] for
/// unbalanced or mismatched parentheses and brackets.
pub fn parse_response(chunks: &[ResponseChunk]) -> Result<Vec<Value>> {
    parse_response_from(chunks, 0)
}

/// Parses a response, skipping the first `offset` bytes of its first line.
pub(crate) fn parse_response_from(chunks: &[ResponseChunk], offset: usize) -> Result<Vec<Value>> {
    TreeParser::new(Lexer::starting_at(chunks, offset)).parse_all()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    List,
    Section,
}

impl Group {
    const fn open(self) -> char {
        match self {
            Self::List => '(',
            Self::Section => '[',
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Section => "section",
        }
    }

    fn closes(self, token: &Token<'_>) -> bool {
        matches!(
            (self, token),
            (Self::List, Token::RParen) | (Self::Section, Token::RBracket)
        )
    }

    fn wrap(self, items: Vec<Value>) -> Value {
        match self {
            Self::List => Value::List(items),
            Self::Section => Value::Section(items),
        }
    }
}

struct TreeParser<'a> {
    lexer: Lexer<'a>,
    index: usize,
}

impl<'a> TreeParser<'a> {
    const fn new(lexer: Lexer<'a>) -> Self {
        Self { lexer, index: 0 }
    }

    fn next(&mut self) -> Result<Token<'a>> {
        let token = self.lexer.next_token()?;
        if token != Token::Eof {
            self.index += 1;
        }
        Ok(token)
    }

    fn parse_all(&mut self) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        loop {
            match self.next()? {
                Token::Eof => return Ok(values),
                token @ (Token::RParen | Token::RBracket) => {
                    return Err(self.error(
                        &format!("unexpected {}", token.describe()),
                        render(&values),
                    ));
                }
                token => values.push(self.parse_value(token, 0)?),
            }
        }
    }

    fn parse_value(&mut self, token: Token<'a>, depth: usize) -> Result<Value> {
        match token {
            Token::Atom(atom) => Ok(atom_value(atom)),
            Token::QuotedString(bytes) => Ok(Value::Bytes(bytes)),
            Token::Literal(bytes) => Ok(Value::Bytes(bytes.to_vec())),
            Token::LParen => self.parse_group(Group::List, depth + 1),
            Token::LBracket => self.parse_group(Group::Section, depth + 1),
            Token::RParen | Token::RBracket | Token::Eof => Err(self.error(
                &format!("unexpected {}", token.describe()),
                String::new(),
            )),
        }
    }

    fn parse_group(&mut self, group: Group, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep", String::new()));
        }

        let mut items = Vec::new();
        loop {
            let token = self.next()?;
            if group.closes(&token) {
                return Ok(group.wrap(items));
            }
            match token {
                Token::Eof => {
                    return Err(self.error(
                        &format!("unterminated {}", group.name()),
                        partial(group, &items),
                    ));
                }
                Token::RParen | Token::RBracket => {
                    return Err(self.error(
                        &format!("{} closes a {}", token.describe(), group.name()),
                        partial(group, &items),
                    ));
                }
                token => items.push(self.parse_value(token, depth)?),
            }
        }
    }

    fn error(&self, message: &str, context: String) -> Error {
        Error::Parse {
            position: self.index,
            message: message.to_string(),
            context,
        }
    }
}

/// Renders an unfinished group for diagnostics, e.g. `(1 2`.
fn partial(group: Group, items: &[Value]) -> String {
    format!("{}{}", group.open(), render(items))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Vec<Value> {
        parse_response(&[ResponseChunk::line(line)]).unwrap()
    }

    fn parse_err(line: &str) -> Error {
        parse_response(&[ResponseChunk::line(line)]).unwrap_err()
    }

    fn list(items: Vec<Value>) -> Value {
        Value::List(items)
    }

    #[test]
    fn test_unquoted() {
        assert_eq!(parse("FOO"), vec![Value::from("FOO")]);
        assert_eq!(parse("F.O:-O_0;"), vec![Value::from("F.O:-O_0;")]);
        assert_eq!(parse(r"\Seen"), vec![Value::from(r"\Seen")]);
    }

    #[test]
    fn test_string() {
        assert_eq!(parse(r#""TEST""#), vec![Value::from("TEST")]);
    }

    #[test]
    fn test_int() {
        assert_eq!(parse("45"), vec![Value::Int(45)]);
        assert_eq!(parse("-3"), vec![Value::Int(-3)]);
    }

    #[test]
    fn test_nil() {
        assert_eq!(parse("NIL"), vec![Value::Nil]);
        assert_eq!(parse("nil"), vec![Value::Nil]);
        assert_eq!(parse(r#""NIL""#), vec![Value::from("NIL")]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), Vec::<Value>::new());
        assert_eq!(parse_response(&[]).unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn test_mixed_types() {
        assert_eq!(
            parse(r#""TEST" 123 "ABC" NIL"#),
            vec![
                Value::from("TEST"),
                Value::Int(123),
                Value::from("ABC"),
                Value::Nil
            ]
        );
    }

    #[test]
    fn test_nested_lists() {
        assert_eq!(
            parse(r#"(1 2 (3 "x" (NIL)) ()) 4"#),
            vec![
                list(vec![
                    Value::Int(1),
                    Value::Int(2),
                    list(vec![Value::Int(3), Value::from("x"), list(vec![Value::Nil])]),
                    list(vec![]),
                ]),
                Value::Int(4),
            ]
        );
    }

    #[test]
    fn test_sections() {
        assert_eq!(
            parse("BODY[HEADER.FIELDS (FROM)]"),
            vec![
                Value::from("BODY"),
                Value::Section(vec![
                    Value::from("HEADER.FIELDS"),
                    list(vec![Value::from("FROM")]),
                ]),
            ]
        );
        assert_eq!(
            parse("[READ-WRITE]"),
            vec![Value::Section(vec![Value::from("READ-WRITE")])]
        );
    }

    #[test]
    fn test_literal_in_list() {
        let chunks = vec![
            ResponseChunk::with_literal(r#"(12 "foo" {5}"#, "hello"),
            ResponseChunk::line(" 34)"),
        ];
        assert_eq!(
            parse_response(&chunks).unwrap(),
            vec![list(vec![
                Value::Int(12),
                Value::from("foo"),
                Value::from("hello"),
                Value::Int(34),
            ])]
        );
    }

    #[test]
    fn test_literal_digits_stay_bytes() {
        let chunks = vec![ResponseChunk::with_literal("{4}", "2000")];
        assert_eq!(parse_response(&chunks).unwrap(), vec![Value::from("2000")]);
    }

    #[test]
    fn test_unterminated_list() {
        let err = parse_err("(1 2");
        match err {
            Error::Parse {
                message, context, ..
            } => {
                assert_eq!(message, "unterminated list");
                assert_eq!(context, "(1 2");
            }
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_stray_close() {
        assert!(matches!(parse_err("1 2)"), Error::Parse { position: 3, .. }));
        assert!(matches!(parse_err("]"), Error::Parse { .. }));
    }

    #[test]
    fn test_mismatched_close() {
        assert!(matches!(parse_err("(1 ]"), Error::Parse { .. }));
        assert!(matches!(parse_err("[1 )"), Error::Parse { .. }));
    }

    #[test]
    fn test_unterminated_quote_is_lex_error() {
        assert!(matches!(parse_err(r#"(FOO "bar"#), Error::Lex { .. }));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = "(".repeat(MAX_DEPTH + 1) + &")".repeat(MAX_DEPTH + 1);
        assert!(matches!(parse_err(&deep), Error::Parse { .. }));

        let ok = "(".repeat(MAX_DEPTH) + &")".repeat(MAX_DEPTH);
        assert_eq!(parse(&ok).len(), 1);
    }

    #[test]
    fn test_offset_skips_prefix() {
        let chunks = vec![ResponseChunk::line("* LIST (\\HasNoChildren) \"/\" 2000")];
        assert_eq!(
            parse_response_from(&chunks, 7).unwrap(),
            vec![
                list(vec![Value::from("\\HasNoChildren")]),
                Value::from("/"),
                Value::Int(2000),
            ]
        );
    }
}
