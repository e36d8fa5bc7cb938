//! Framed reading of IMAP responses.
//!
//! IMAP uses CRLF-terminated lines with support for literals. This module
//! splits a byte stream into logical responses, each a sequence of
//! [`ResponseChunk`]s ready for the lexer.

#![allow(clippy::missing_errors_doc)]

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tracing::{trace, warn};

use crate::config::ReaderConfig;
use crate::parser::lexer::{ResponseChunk, literal_length};
use crate::parser::{Response, ResponseParser};
use crate::types::Tag;
use crate::{Error, Result};

/// Default buffer size for reading.
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Reads logical responses from a byte stream.
pub struct FramedReader<S> {
    reader: BufReader<S>,
    line: BytesMut,
    config: ReaderConfig,
}

impl<S> FramedReader<S>
where
    S: AsyncRead + Unpin,
{
    /// Creates a reader with the default limits.
    pub fn new(stream: S) -> Self {
        Self::with_config(stream, ReaderConfig::default())
    }

    /// Creates a reader with the given limits.
    pub fn with_config(stream: S, config: ReaderConfig) -> Self {
        Self {
            reader: BufReader::with_capacity(DEFAULT_BUFFER_SIZE, stream),
            line: BytesMut::with_capacity(DEFAULT_BUFFER_SIZE),
            config,
        }
    }

    /// Reads one logical response.
    ///
    /// A line ending in a literal marker `{n}` is followed by exactly `n`
    /// literal bytes, after which the response continues on the next line.
    pub async fn read_response(&mut self) -> Result<Vec<ResponseChunk>> {
        let mut chunks = Vec::new();

        loop {
            let line = self.read_line().await?;

            let Some(literal_len) = literal_length(&line) else {
                chunks.push(ResponseChunk::line(line));
                break;
            };

            if literal_len > self.config.max_literal_size {
                warn!(
                    size = literal_len,
                    max = self.config.max_literal_size,
                    "Literal exceeds reader limit"
                );
                return Err(Error::Protocol(format!(
                    "literal too large: {literal_len} bytes (max {})",
                    self.config.max_literal_size
                )));
            }

            let mut literal = vec![0u8; literal_len];
            self.reader.read_exact(&mut literal).await?;
            chunks.push(ResponseChunk::with_literal(line, literal));
        }

        trace!(chunks = chunks.len(), "Read response");
        Ok(chunks)
    }

    /// Reads one response and parses it.
    pub async fn read_parsed(&mut self, parser: &ResponseParser) -> Result<Response> {
        let chunks = self.read_response().await?;
        parser.parse(&chunks)
    }

    /// Reads a single CRLF-terminated line, returning it without the CRLF.
    async fn read_line(&mut self) -> Result<Vec<u8>> {
        self.line.clear();

        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed",
                )));
            }

            // CR at the end of the previous read, LF at the start of this one.
            if self.line.last() == Some(&b'\r') && buf.first() == Some(&b'\n') {
                self.line.truncate(self.line.len() - 1);
                self.reader.consume(1);
                return Ok(self.line.split().to_vec());
            }

            if let Some(pos) = find_crlf(buf) {
                if self.line.len() + pos > self.config.max_line_length {
                    return Err(Error::Protocol("line too long".to_string()));
                }
                self.line.extend_from_slice(&buf[..pos]);
                self.reader.consume(pos + 2);
                return Ok(self.line.split().to_vec());
            }

            let len = buf.len();
            self.line.extend_from_slice(buf);
            self.reader.consume(len);

            if self.line.len() > self.config.max_line_length {
                return Err(Error::Protocol("line too long".to_string()));
            }
        }
    }

    /// Gets a reference to the underlying stream.
    pub fn get_ref(&self) -> &S {
        self.reader.get_ref()
    }

    /// Consumes the reader and returns the inner stream.
    ///
    /// Note: Any buffered data will be lost.
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }
}

/// Finds the position of CRLF in a buffer.
fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

/// Collects responses until the completion of a tagged command.
pub struct ResponseAccumulator {
    tag: Tag,
    responses: Vec<Vec<ResponseChunk>>,
}

impl ResponseAccumulator {
    /// Creates a new response accumulator for the given tag.
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            responses: Vec::new(),
        }
    }

    /// Reads responses until a tagged response matching our tag is found.
    ///
    /// The tagged response is the last element of the result.
    pub async fn read_until_tagged<S>(
        &mut self,
        framed: &mut FramedReader<S>,
    ) -> Result<Vec<Vec<ResponseChunk>>>
    where
        S: AsyncRead + Unpin,
    {
        loop {
            let response = framed.read_response().await?;

            let is_tagged = response
                .first()
                .is_some_and(|chunk| self.tag.starts(&chunk.line));

            self.responses.push(response);

            if is_tagged {
                break;
            }
        }

        Ok(std::mem::take(&mut self.responses))
    }

    /// Returns the collected responses.
    #[must_use]
    pub fn responses(&self) -> &[Vec<ResponseChunk>] {
        &self.responses
    }
}
