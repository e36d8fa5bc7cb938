//! IMAP response parser.
//!
//! [`parse_response`] turns any response into a generic value tree.
//! [`ResponseParser`] classifies a whole response as tagged, untagged or a
//! continuation and converts the common untagged forms into typed records.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::option_if_let_else)]

mod fetch;
mod helpers;
mod tree;
mod types;

pub use fetch::{
    parse_address_list, parse_body, parse_envelope, parse_fetch_items, parse_fetch_response,
};
pub use helpers::{
    parse_folder_list, parse_folder_status, parse_message_list, parse_namespace, parse_quota,
    parse_quota_root,
};
pub use tree::{MAX_DEPTH, parse_response};
pub use types::{ResponseCode, UntaggedResponse};

use tracing::trace;

use crate::config::ParseOptions;
use crate::parser::lexer::ResponseChunk;
use crate::types::{SeqNum, Status, Tag, Value, is_canonical_integer};
use crate::{Error, Result};

use helpers::{string, unexpected, upper};
use tree::parse_response_from;

/// A parsed IMAP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Tagged response (command completion).
    Tagged {
        /// The command tag.
        tag: Tag,
        /// Response status.
        status: Status,
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// Untagged response (server data).
    Untagged(UntaggedResponse),
    /// Continuation request.
    Continuation {
        /// Optional text/data.
        text: Option<String>,
    },
}

impl Response {
    /// Returns the leading identifier: the tag of a completion, the name of
    /// untagged data, or `+` for a continuation.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Tagged { tag, .. } => tag.as_str(),
            Self::Untagged(untagged) => untagged.name(),
            Self::Continuation { .. } => "+",
        }
    }

    /// Returns true if this is a tagged response carrying the given tag.
    #[must_use]
    pub fn is_tagged_with(&self, expected: &str) -> bool {
        matches!(self, Self::Tagged { tag, .. } if tag.as_str() == expected)
    }
}

/// Response parser.
///
/// Parsing is stateless; one parser can be reused for any number of
/// responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser {
    options: ParseOptions,
}

impl ResponseParser {
    /// Creates a parser with the given options.
    #[must_use]
    pub const fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Returns the options in use.
    #[must_use]
    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses one logical response.
    pub fn parse(&self, chunks: &[ResponseChunk]) -> Result<Response> {
        let Some(first) = chunks.first() else {
            return Err(Error::parse("empty response", ""));
        };
        let line = first.line.as_slice();

        let (word, pos) = next_word(line, 0);
        let response = match word {
            [] => return Err(Error::parse("empty response", "")),
            [b'+', ..] => {
                ensure_single_chunk(chunks)?;
                let text = text_after(line, 1);
                Response::Continuation {
                    text: (!text.is_empty()).then_some(text),
                }
            }
            b"*" => Response::Untagged(self.parse_untagged(chunks, line, pos)?),
            tag => {
                ensure_single_chunk(chunks)?;
                Self::parse_tagged(tag, line, pos)?
            }
        };

        trace!(name = response.name(), chunks = chunks.len(), "Parsed response");
        Ok(response)
    }

    fn parse_tagged(tag: &[u8], line: &[u8], pos: usize) -> Result<Response> {
        let (word, pos) = next_word(line, pos);
        let Some(status) = Status::parse(word) else {
            return Err(Error::parse(
                format!("invalid status '{}'", word.escape_ascii()),
                line.escape_ascii().to_string(),
            ));
        };
        let (code, text) = parse_resp_text(line, pos)?;

        Ok(Response::Tagged {
            tag: Tag::from_bytes(tag),
            status,
            code,
            text,
        })
    }

    fn parse_untagged(
        &self,
        chunks: &[ResponseChunk],
        line: &[u8],
        pos: usize,
    ) -> Result<UntaggedResponse> {
        let (word, pos) = next_word(line, pos);

        if is_canonical_integer(word)
            && let Some(number) = std::str::from_utf8(word).ok().and_then(|s| s.parse().ok())
        {
            let (name, pos) = next_word(line, pos);
            return self.parse_message_data(chunks, number, &upper(name.to_vec()), pos);
        }

        let name = upper(word.to_vec());
        if let Some(status) = Status::parse(word) {
            ensure_single_chunk(chunks)?;
            let (code, text) = parse_resp_text(line, pos)?;
            return Ok(UntaggedResponse::Condition { status, code, text });
        }

        let values = parse_response_from(chunks, pos)?;
        Ok(match name.as_str() {
            "CAPABILITY" => UntaggedResponse::Capability(
                values
                    .iter()
                    .map(|v| string(v, "capability").map(upper))
                    .collect::<Result<_>>()?,
            ),
            "FLAGS" => match values.as_slice() {
                [Value::List(flags)] => UntaggedResponse::Flags(
                    flags
                        .iter()
                        .map(|f| string(f, "flag"))
                        .collect::<Result<_>>()?,
                ),
                _ => return Err(Error::parse("FLAGS expects one flag list", render_line(line))),
            },
            "LIST" | "LSUB" | "XLIST" => match parse_folder_list(&values)?.pop() {
                Some(entry) if values.len() == 3 => UntaggedResponse::List(entry),
                _ => return Err(Error::parse(format!("{name} expects one entry"), render_line(line))),
            },
            "SEARCH" | "SORT" => UntaggedResponse::Search(parse_message_list(&values)?),
            "STATUS" => UntaggedResponse::Status(parse_folder_status(&values)?),
            _ => UntaggedResponse::Other {
                number: None,
                name,
                values,
            },
        })
    }

    fn parse_message_data(
        &self,
        chunks: &[ResponseChunk],
        number: u32,
        name: &str,
        pos: usize,
    ) -> Result<UntaggedResponse> {
        let values = parse_response_from(chunks, pos)?;
        let seq = || SeqNum::try_from(number);

        Ok(match name {
            "EXISTS" => UntaggedResponse::Exists(number),
            "RECENT" => UntaggedResponse::Recent(number),
            "EXPUNGE" => UntaggedResponse::Expunge(seq()?),
            "FETCH" => {
                let seq = seq()?;
                let mut values = values.into_iter();
                let items = match (values.next(), values.next()) {
                    (Some(Value::List(items)), None) => items,
                    (Some(other), None) => return Err(unexpected("FETCH item list", &other)),
                    _ => return Err(Error::parse("FETCH expects one item list", "")),
                };
                UntaggedResponse::Fetch {
                    seq,
                    data: parse_fetch_items(seq.get(), items, &self.options)?,
                }
            }
            _ => UntaggedResponse::Other {
                number: Some(number),
                name: name.to_string(),
                values,
            },
        })
    }
}

/// Rejects literals in responses whose text is read from the first line only.
fn ensure_single_chunk(chunks: &[ResponseChunk]) -> Result<()> {
    match chunks {
        [_] => Ok(()),
        [first, ..] => Err(Error::parse(
            format!("unexpected literal in text response ({} chunks)", chunks.len()),
            render_line(&first.line),
        )),
        [] => Err(Error::parse("empty response", "")),
    }
}

/// Parses `[code values] text` following a status keyword.
///
/// The text is kept verbatim; only the bracketed code is lexed.
fn parse_resp_text(line: &[u8], pos: usize) -> Result<(Option<ResponseCode>, String)> {
    let rest = skip_spaces(line, pos);
    if line.get(rest) != Some(&b'[') {
        return Ok((None, text_after(line, rest)));
    }

    let Some(end) = code_end(line, rest) else {
        return Err(Error::parse("unterminated response code", render_line(line)));
    };
    let mut values = parse_response(&[ResponseChunk::line(&line[rest + 1..end])])?.into_iter();
    let name = match values.next() {
        Some(first) => upper(string(&first, "response code")?),
        None => return Err(Error::parse("empty response code", render_line(line))),
    };

    Ok((
        Some(ResponseCode {
            name,
            values: values.collect(),
        }),
        text_after(line, end + 1),
    ))
}

/// Finds the `]` closing the response code opened at `start`, skipping
/// quoted strings and nested brackets.
fn code_end(line: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut escaped = false;

    for (i, &b) in line.iter().enumerate().skip(start) {
        if in_quote {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_quote = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_quote = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Returns the next space-delimited word and the position after it.
fn next_word(line: &[u8], pos: usize) -> (&[u8], usize) {
    let start = skip_spaces(line, pos);
    let end = line[start..]
        .iter()
        .position(|&b| b == b' ')
        .map_or(line.len(), |i| start + i);
    (&line[start..end], end)
}

fn skip_spaces(line: &[u8], pos: usize) -> usize {
    line.iter()
        .skip(pos)
        .position(|&b| b != b' ')
        .map_or(line.len(), |i| pos + i)
}

fn text_after(line: &[u8], pos: usize) -> String {
    let start = skip_spaces(line, pos);
    String::from_utf8_lossy(&line[start..]).into_owned()
}

fn render_line(line: &[u8]) -> String {
    line.escape_ascii().to_string()
}
