//! IMAP response parser.
//!
//! This module provides a sans-I/O parser for IMAP server responses.
//!
//! # Architecture
//!
//! The parser is split into two main components:
//!
//! - **Lexer**: Tokenizes response chunks into atoms, quoted strings,
//!   literals and parenthesis/bracket markers
//! - **Response Parser**: Builds a value tree from the tokens and converts
//!   FETCH data and the common untagged responses into typed records
//!
//! # Example
//!
//! ```
//! use imap_response::parser::{Response, ResponseParser, UntaggedResponse};
//! use imap_response::ResponseChunk;
//!
//! let chunks = [ResponseChunk::line("* 3 EXISTS")];
//! let response = ResponseParser::default().parse(&chunks).unwrap();
//!
//! assert_eq!(response, Response::Untagged(UntaggedResponse::Exists(3)));
//! ```

pub mod lexer;
pub mod response;

pub use lexer::{Lexer, ResponseChunk, Token};
pub use response::{
    Response, ResponseCode, ResponseParser, UntaggedResponse, parse_fetch_response,
    parse_response,
};
