//! Value tree serialization.
//!
//! Writes a value tree back to IMAP wire syntax as a sequence of
//! [`ResponseChunk`]s, choosing atoms, quoted strings or literals so that
//! lexing and parsing the output yields the same tree.

use crate::datetime::format_internaldate;
use crate::parser::lexer::{ResponseChunk, is_delimiter};
use crate::types::{Value, is_canonical_integer};

/// Serializes top-level values, separated by spaces.
#[must_use]
pub fn to_chunks(values: &[Value]) -> Vec<ResponseChunk> {
    let mut writer = ChunkWriter::default();
    writer.write_sequence(values);
    writer.finish()
}

/// Renders top-level values as wire text.
///
/// Literals appear inline as `{N}` followed by CRLF and their bytes.
/// Non-UTF-8 bytes are replaced.
#[must_use]
pub fn render(values: &[Value]) -> String {
    let mut out = Vec::new();
    for chunk in to_chunks(values) {
        out.extend_from_slice(&chunk.line);
        if let Some(literal) = chunk.literal {
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(&literal);
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[derive(Debug, Default)]
struct ChunkWriter {
    chunks: Vec<ResponseChunk>,
    line: Vec<u8>,
}

impl ChunkWriter {
    fn finish(mut self) -> Vec<ResponseChunk> {
        if !self.line.is_empty() || self.chunks.is_empty() {
            self.chunks.push(ResponseChunk::line(self.line));
        }
        self.chunks
    }

    fn write_sequence(&mut self, values: &[Value]) {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.line.push(b' ');
            }
            self.write_value(value);
        }
    }

    fn write_value(&mut self, value: &Value) {
        match value {
            Value::Int(n) => self.line.extend_from_slice(n.to_string().as_bytes()),
            Value::Bytes(bytes) => self.write_string(bytes),
            Value::Nil => self.line.extend_from_slice(b"NIL"),
            Value::List(items) => {
                self.line.push(b'(');
                self.write_sequence(items);
                self.line.push(b')');
            }
            Value::Section(items) => {
                self.line.push(b'[');
                self.write_sequence(items);
                self.line.push(b']');
            }
            Value::Flags(flags) => {
                self.line.push(b'(');
                for (i, flag) in flags.iter().enumerate() {
                    if i > 0 {
                        self.line.push(b' ');
                    }
                    self.write_string(flag);
                }
                self.line.push(b')');
            }
            Value::DateTime(dt) => self.write_quoted(format_internaldate(dt).as_bytes()),
            Value::Envelope(envelope) => self.write_value(&envelope.to_value()),
            Value::Address(address) => self.write_value(&address.to_value()),
            Value::Body(body) => self.write_value(&body.to_value()),
        }
    }

    fn write_string(&mut self, bytes: &[u8]) {
        if is_atom_safe(bytes) {
            self.line.extend_from_slice(bytes);
        } else if bytes.iter().any(|&b| matches!(b, b'\r' | b'\n' | 0)) {
            self.write_literal(bytes);
        } else {
            self.write_quoted(bytes);
        }
    }

    fn write_quoted(&mut self, bytes: &[u8]) {
        self.line.push(b'"');
        for &b in bytes {
            if b == b'"' || b == b'\\' {
                self.line.push(b'\\');
            }
            self.line.push(b);
        }
        self.line.push(b'"');
    }

    fn write_literal(&mut self, bytes: &[u8]) {
        self.line
            .extend_from_slice(format!("{{{}}}", bytes.len()).as_bytes());
        let line = std::mem::take(&mut self.line);
        self.chunks
            .push(ResponseChunk::with_literal(line, bytes.to_vec()));
    }
}

/// Returns true if the bytes can be written bare and read back unchanged.
fn is_atom_safe(bytes: &[u8]) -> bool {
    !bytes.is_empty()
        && !bytes.eq_ignore_ascii_case(b"NIL")
        && !is_canonical_integer(bytes)
        && bytes
            .iter()
            .all(|&b| b.is_ascii_graphic() && !is_delimiter(b) && b != b'{')
}
