//! # imap-response
//!
//! A lexer and parser for IMAP server responses (RFC 3501, RFC 9051).
//!
//! ## Features
//!
//! - **Sans-I/O parser**: Responses are parsed from pre-split
//!   [`ResponseChunk`]s, so the parser works with any transport
//! - **Generic value tree**: Any response parses into nested [`Value`]s
//!   (integers, byte strings, NIL, lists and `[...]` sections)
//! - **Typed FETCH data**: ENVELOPE, BODYSTRUCTURE, INTERNALDATE, FLAGS and
//!   UID are converted into typed records
//! - **Framed reader**: [`connection::FramedReader`] splits an async stream
//!   into responses, honouring literals and size limits
//!
//! ## Quick Start
//!
//! ```
//! use imap_response::{ParseOptions, ResponseChunk, Value, parse_fetch_response};
//!
//! let chunks = [ResponseChunk::line(r#"* 6 FETCH (FLAGS (\Seen) UID 4827)"#)];
//! let options = ParseOptions::builder().uid_is_key(false).build();
//! let messages = parse_fetch_response(&chunks, &options).unwrap();
//!
//! let message = &messages[&6];
//! assert_eq!(message.uid(), Some(4827));
//! assert_eq!(message.get("flags"), Some(&Value::Flags(vec![b"\\Seen".to_vec()])));
//! ```
//!
//! ## Modules
//!
//! - [`parser`]: Lexer, value-tree parser and response classification
//! - [`types`]: Values and typed records produced by the parser
//! - [`connection`]: Async framing of responses from a byte stream
//! - [`datetime`]: Tolerant timestamp parsing
//! - [`serialize`]: Rendering values back into response chunks
//! - [`config`]: Parser options and reader limits

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod connection;
pub mod datetime;
mod error;
pub mod parser;
pub mod serialize;
pub mod types;

pub use config::{ParseOptions, ParseOptionsBuilder, ReaderConfig};
pub use connection::{FramedReader, ResponseAccumulator};
pub use error::{Error, Result};
pub use parser::lexer::ResponseChunk;
pub use parser::response::{
    parse_fetch_response, parse_folder_list, parse_folder_status, parse_message_list,
    parse_namespace, parse_quota, parse_quota_root, parse_response,
};
pub use parser::{Response, ResponseCode, ResponseParser, UntaggedResponse};
pub use types::{
    Address, BodyData, Envelope, FetchData, FolderEntry, FolderStatus, SeqNum, Status, Tag, Value,
};
