//! Reading responses from a transport.
//!
//! The parser itself never touches I/O. This module splits an async byte
//! stream into logical responses (lines plus any literals) that can be fed
//! to [`crate::parser::ResponseParser`] or [`crate::parse_fetch_response`].

mod framed;

pub use framed::{FramedReader, ResponseAccumulator};
