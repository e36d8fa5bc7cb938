#![allow(clippy::uninlined_format_args)]
//! Example: Parse a captured FETCH exchange
//!
//! Reads a server transcript through the framed reader, then prints the
//! typed data for every message.
//!
//! ## Running
//!
//! ```bash
//! cargo run --package imap-response --example dump_fetch
//! ```

use imap_response::{
    FramedReader, ParseOptions, ResponseAccumulator, parse_fetch_response,
};

const TRANSCRIPT: &[u8] = b"* 1 FETCH (UID 101 FLAGS (\\Seen) INTERNALDATE \"17-Jul-1996 02:44:25 -0700\" \
ENVELOPE (\"Wed, 17 Jul 1996 02:23:25 -0700 (PDT)\" \"IMAP4rev1 WG mtg summary\" \
((\"Terry Gray\" NIL \"gray\" \"cac.washington.edu\")) NIL NIL \
((NIL NIL \"imap\" \"cac.washington.edu\")) NIL NIL NIL \"<B27397-0100000@cac.washington.edu>\"))\r\n\
* 2 FETCH (UID 102 FLAGS () BODY[HEADER.FIELDS (SUBJECT)] {21}\r\nSubject: hi there\r\n\r\n)\r\n\
A3 OK FETCH completed\r\n";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut framed = FramedReader::new(TRANSCRIPT);
    let responses = ResponseAccumulator::new("A3")
        .read_until_tagged(&mut framed)
        .await?;

    // The last response is the tagged completion.
    let fetch_chunks: Vec<_> = responses[..responses.len() - 1]
        .iter()
        .flatten()
        .cloned()
        .collect();

    let messages = parse_fetch_response(&fetch_chunks, &ParseOptions::default())?;
    for (uid, data) in &messages {
        println!("UID {} (seq {})", uid, data.seq);
        if let Some(date) = data.internal_date() {
            println!("  internal date: {}", date);
        }
        if let Some(envelope) = data.envelope() {
            let subject = envelope.subject.as_deref().unwrap_or_default();
            println!("  subject: {}", String::from_utf8_lossy(subject));
            for from in &envelope.from {
                println!("  from: {}", from);
            }
        }
        for (name, value) in &data.items {
            if name.starts_with("BODY[") {
                println!("  {}: {} bytes", name, value.as_bytes().map_or(0, <[u8]>::len));
            }
        }
    }

    Ok(())
}
