//! Error types for the IMAP response library.

use thiserror::Error;

/// Errors that can occur while reading or parsing IMAP responses.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading from the transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed token-level input.
    #[error("Lex error in chunk {chunk} at byte {position}: {message} (line: {line})")]
    Lex {
        /// Index of the response chunk containing the error.
        chunk: usize,
        /// Byte offset within the chunk's line.
        position: usize,
        /// Description of what went wrong.
        message: String,
        /// The offending raw line, escaped for display.
        line: String,
    },

    /// Well-formed tokens that do not match the response grammar.
    #[error("Parse error at token {position}: {message} (near: {context})")]
    Parse {
        /// Index of the token where the error was detected.
        position: usize,
        /// Description of what went wrong.
        message: String,
        /// Rendering of the partially parsed input.
        context: String,
    },

    /// Framing violation detected by the transport reader.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl Error {
    /// Returns true if the error was caused by malformed bytes from the
    /// server rather than by an I/O failure.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Lex { .. } | Self::Parse { .. } | Self::Protocol(_)
        )
    }

    /// Builds a parse error that has no token position attached.
    pub(crate) fn parse(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Parse {
            position: 0,
            message: message.into(),
            context: context.into(),
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
