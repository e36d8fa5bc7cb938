//! FETCH response post-processing.
//!
//! The generic parser leaves a FETCH item list as a flat run of values, e.g.
//! `UID 15 BODY [HEADER.FIELDS (FROM)] {42}`. This module regroups it into
//! named items and converts the well-known ones into typed records.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::{debug, trace};

use crate::config::ParseOptions;
use crate::datetime::parse_to_datetime;
use crate::parser::lexer::ResponseChunk;
use crate::serialize::render;
use crate::types::{
    Address, BodyData, BodyPart, EmbeddedMessage, Envelope, FetchData, Multipart, Value,
};
use crate::{Error, Result};

use super::helpers::{nstring, string, to_u32, to_u64, unexpected, upper};
use super::tree::parse_response;

/// Parses the FETCH data of one or more messages.
///
/// The input is `seq (items) seq (items) ...`. A leading `*` before each
/// sequence number and a `FETCH` keyword after it are both optional, so raw
/// untagged FETCH lines can be passed as they are. Results are keyed by UID
/// when [`ParseOptions::uid_is_key`] is set and the message carries one, by
/// sequence number otherwise. Several responses for the same message are
/// merged.
///
/// # Errors
///
/// Returns [`Error::Lex`] or [`Error::Parse`] for malformed input, a
/// missing item list, an uneven item list or a `UID` outside the `u32` range.
pub fn parse_fetch_response(
    chunks: &[ResponseChunk],
    options: &ParseOptions,
) -> Result<BTreeMap<u32, FetchData>> {
    let mut values = parse_response(chunks)?.into_iter().peekable();
    let mut messages = BTreeMap::new();

    loop {
        values.next_if(|v| v.as_bytes() == Some(&b"*"[..]));
        let Some(seq) = values.next() else {
            break;
        };
        let seq = to_u32(&seq, "message id")?;
        values.next_if(|v| {
            v.as_bytes()
                .is_some_and(|b| b.eq_ignore_ascii_case(b"FETCH"))
        });

        let items = match values.next() {
            Some(Value::List(items)) => items,
            Some(other) => return Err(unexpected("FETCH item list", &other)),
            None => {
                return Err(Error::parse(
                    "unexpected end of FETCH data",
                    seq.to_string(),
                ));
            }
        };

        let data = parse_fetch_items(seq, items, options)?;
        let key = if options.uid_is_key {
            data.uid().unwrap_or(seq)
        } else {
            seq
        };

        match messages.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(data);
            }
            Entry::Occupied(mut slot) => slot.get_mut().merge(data),
        }
    }

    trace!(messages = messages.len(), "Parsed FETCH response");
    Ok(messages)
}

/// Regroups a flat FETCH item list into named items.
///
/// A name may be followed by a section and, after the section, a partial
/// origin such as `<0>`; both become part of the key.
///
/// # Errors
///
/// Returns [`Error::Parse`] for non-atom names, a missing value or an item
/// of the wrong shape.
pub fn parse_fetch_items(seq: u32, items: Vec<Value>, options: &ParseOptions) -> Result<FetchData> {
    let mut data = FetchData::new(seq);
    let context = render(&items);
    let mut iter = items.into_iter().peekable();

    while let Some(name) = iter.next() {
        let name = match name {
            Value::Bytes(name) => name,
            other => {
                return Err(Error::parse(
                    format!("FETCH item name must be an atom, got {}", other.kind()),
                    context,
                ));
            }
        };
        let mut key = upper(name);
        let plain = key.clone();

        if let Some(Value::Section(section)) = iter.next_if(|v| matches!(v, Value::Section(_))) {
            key.push('[');
            key.push_str(&render(&section).to_ascii_uppercase());
            key.push(']');

            if let Some(Value::Bytes(origin)) = iter.next_if(is_partial_origin) {
                key.push_str(&String::from_utf8_lossy(&origin));
            }
        }

        let Some(value) = iter.next() else {
            return Err(Error::parse(
                format!("uneven number of FETCH items, {key} has no value"),
                context,
            ));
        };

        let value = if key == plain {
            convert_item(&key, value, options)?
        } else {
            value
        };
        data.items.insert(key, value);
    }

    Ok(data)
}

fn is_partial_origin(value: &Value) -> bool {
    value
        .as_bytes()
        .is_some_and(|b| b.len() > 2 && b.starts_with(b"<") && b.ends_with(b">"))
}

fn convert_item(name: &str, value: Value, options: &ParseOptions) -> Result<Value> {
    match name {
        "UID" => match value {
            Value::Int(_) => to_u32(&value, "UID").map(|_| value),
            other => Err(unexpected("UID", &other)),
        },
        "INTERNALDATE" => Ok(match &value {
            Value::Bytes(text) => parse_to_datetime(text, options.normalise_times).map_or_else(
                || {
                    debug!(date = %text.escape_ascii(), "Unparseable INTERNALDATE");
                    Value::Nil
                },
                Value::DateTime,
            ),
            _ => Value::Nil,
        }),
        "ENVELOPE" => Ok(Value::Envelope(Box::new(parse_envelope(
            &value,
            options.normalise_times,
        )?))),
        "BODY" | "BODYSTRUCTURE" => Ok(Value::Body(Box::new(parse_body(
            &value,
            options.normalise_times,
        )?))),
        "FLAGS" | "X-GM-LABELS" => parse_flags(&value),
        _ => Ok(value),
    }
}

fn parse_flags(value: &Value) -> Result<Value> {
    match value {
        Value::List(items) => Ok(Value::Flags(
            items
                .iter()
                .map(|f| string(f, "flag"))
                .collect::<Result<_>>()?,
        )),
        Value::Nil => Ok(Value::Flags(Vec::new())),
        other => Err(unexpected("flag list", other)),
    }
}

/// Converts a 10-field ENVELOPE list into an [`Envelope`].
///
/// An unparseable date becomes `None`. `NIL` address lists and empty address
/// lists both become empty.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the value is not a 10-element list or a field
/// has the wrong shape.
pub fn parse_envelope(value: &Value, normalise_times: bool) -> Result<Envelope> {
    let Some(
        [
            date,
            subject,
            from,
            sender,
            reply_to,
            to,
            cc,
            bcc,
            in_reply_to,
            message_id,
        ],
    ) = value.as_list()
    else {
        let message = value.as_list().map_or_else(
            || format!("ENVELOPE must be a list, got {}", value.kind()),
            |fields| format!("ENVELOPE must have 10 fields, got {}", fields.len()),
        );
        return Err(Error::parse(message, render(std::slice::from_ref(value))));
    };

    let date = match date {
        Value::Bytes(text) => {
            let parsed = parse_to_datetime(text, normalise_times);
            if parsed.is_none() {
                debug!(date = %text.escape_ascii(), "Unparseable envelope date");
            }
            parsed
        }
        _ => None,
    };

    Ok(Envelope {
        date,
        subject: nstring(subject, "envelope subject")?,
        from: parse_address_list(from)?,
        sender: parse_address_list(sender)?,
        reply_to: parse_address_list(reply_to)?,
        to: parse_address_list(to)?,
        cc: parse_address_list(cc)?,
        bcc: parse_address_list(bcc)?,
        in_reply_to: nstring(in_reply_to, "envelope in-reply-to")?,
        message_id: nstring(message_id, "envelope message-id")?,
    })
}

/// Converts an envelope address list. `NIL` entries are skipped.
///
/// # Errors
///
/// Returns [`Error::Parse`] if an address is not a 4-element list.
pub fn parse_address_list(value: &Value) -> Result<Vec<Address>> {
    let items = match value {
        Value::Nil => return Ok(Vec::new()),
        Value::List(items) => items,
        other => return Err(unexpected("address list", other)),
    };

    items
        .iter()
        .filter(|item| !item.is_nil())
        .map(|item| match item.as_list() {
            Some([name, route, mailbox, host]) => Ok(Address {
                name: nstring(name, "address name")?,
                route: nstring(route, "address route")?,
                mailbox: nstring(mailbox, "address mailbox")?,
                host: nstring(host, "address host")?,
            }),
            _ => Err(unexpected("address", item)),
        })
        .collect()
}

/// Converts a BODY or BODYSTRUCTURE list into a [`BodyData`] tree.
///
/// A list whose first element is itself a list is multipart: the leading run
/// of lists are the child parts, the next value is the subtype and anything
/// after it is extension data.
///
/// # Errors
///
/// Returns [`Error::Parse`] for structures too short or of the wrong shape.
pub fn parse_body(value: &Value, normalise_times: bool) -> Result<BodyData> {
    let Some(items) = value.as_list() else {
        return Err(unexpected("body structure", value));
    };

    if matches!(items.first(), Some(Value::List(_))) {
        parse_multipart(items, normalise_times).map(BodyData::Multipart)
    } else {
        parse_single_part(items, normalise_times).map(BodyData::Single)
    }
}

fn parse_multipart(items: &[Value], normalise_times: bool) -> Result<Multipart> {
    let split = items
        .iter()
        .position(|v| !matches!(v, Value::List(_)))
        .unwrap_or(items.len());
    let (parts, rest) = items.split_at(split);

    let Some((subtype, extension)) = rest.split_first() else {
        return Err(Error::parse(
            "multipart body without subtype",
            render(items),
        ));
    };

    Ok(Multipart {
        parts: parts
            .iter()
            .map(|part| parse_body(part, normalise_times))
            .collect::<Result<_>>()?,
        subtype: string(subtype, "multipart subtype")?,
        extension: extension.to_vec(),
    })
}

fn parse_single_part(items: &[Value], normalise_times: bool) -> Result<BodyPart> {
    let [media_type, subtype, params, id, description, encoding, size, rest @ ..] = items else {
        return Err(Error::parse(
            format!("body part has {} fields, expected at least 7", items.len()),
            render(items),
        ));
    };

    let mut part = BodyPart {
        media_type: string(media_type, "media type")?,
        subtype: string(subtype, "media subtype")?,
        params: parse_body_params(params)?,
        id: nstring(id, "body id")?,
        description: nstring(description, "body description")?,
        encoding: nstring(encoding, "body encoding")?,
        size: match size {
            Value::Nil => None,
            other => Some(to_u64(other, "body size")?),
        },
        ..BodyPart::default()
    };

    let mut rest = rest;
    if part.is_message()
        && let [envelope @ Value::List(_), body @ Value::List(_), tail @ ..] = rest
    {
        part.message = Some(Box::new(EmbeddedMessage {
            envelope: parse_envelope(envelope, normalise_times)?,
            body: parse_body(body, normalise_times)?,
        }));
        rest = tail;
    }
    if (part.is_text() || part.message.is_some())
        && let [lines @ Value::Int(_), tail @ ..] = rest
    {
        part.lines = Some(to_u64(lines, "body lines")?);
        rest = tail;
    }
    part.extension = rest.to_vec();

    Ok(part)
}

fn parse_body_params(value: &Value) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
    let items = match value {
        Value::Nil => return Ok(Vec::new()),
        Value::List(items) if items.len() % 2 == 0 => items,
        other => return Err(unexpected("body parameters", other)),
    };

    items
        .chunks_exact(2)
        .map(|pair| {
            Ok((
                string(&pair[0], "parameter name")?,
                string(&pair[1], "parameter value")?,
            ))
        })
        .collect()
}
