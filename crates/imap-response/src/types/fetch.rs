//! FETCH result records.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use super::{BodyData, Envelope, Value};

/// Data items returned for one message by FETCH.
///
/// Keys are upper-cased item names. Items with a section keep it in the key,
/// so `BODY[HEADER.FIELDS (FROM)]` and `BODY[]<0>` are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchData {
    /// Message sequence number.
    pub seq: u32,
    /// Data items keyed by name.
    pub items: BTreeMap<String, Value>,
}

impl FetchData {
    /// Creates an empty record for a sequence number.
    #[must_use]
    pub fn new(seq: u32) -> Self {
        Self {
            seq,
            items: BTreeMap::new(),
        }
    }

    /// Looks up an item, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.items.get(&name.to_ascii_uppercase())
    }

    /// Returns the UID, if fetched.
    #[must_use]
    pub fn uid(&self) -> Option<u32> {
        self.get("UID")
            .and_then(Value::as_int)
            .and_then(|n| u32::try_from(n).ok())
    }

    /// Returns the FLAGS item.
    #[must_use]
    pub fn flags(&self) -> Option<&[Vec<u8>]> {
        self.get("FLAGS").and_then(Value::as_flags)
    }

    /// Returns the ENVELOPE item.
    #[must_use]
    pub fn envelope(&self) -> Option<&Envelope> {
        match self.get("ENVELOPE")? {
            Value::Envelope(envelope) => Some(envelope),
            _ => None,
        }
    }

    /// Returns the BODYSTRUCTURE item, falling back to BODY.
    #[must_use]
    pub fn body_structure(&self) -> Option<&BodyData> {
        ["BODYSTRUCTURE", "BODY"]
            .into_iter()
            .find_map(|name| match self.items.get(name)? {
                Value::Body(body) => Some(body.as_ref()),
                _ => None,
            })
    }

    /// Returns the INTERNALDATE item.
    #[must_use]
    pub fn internal_date(&self) -> Option<DateTime<FixedOffset>> {
        match self.get("INTERNALDATE")? {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Returns the raw bytes of an item such as `BODY[]` or `RFC822`.
    #[must_use]
    pub fn bytes(&self, name: &str) -> Option<&[u8]> {
        self.get(name).and_then(Value::as_bytes)
    }

    /// Moves the items of a later response for the same message into this one.
    ///
    /// Items present in both keep the later value.
    pub fn merge(&mut self, other: Self) {
        self.items.extend(other.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(items: &[(&str, Value)]) -> FetchData {
        FetchData {
            seq: 1,
            items: items
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_accessors() {
        let data = record(&[
            ("UID", Value::Int(15)),
            ("FLAGS", Value::Flags(vec![b"\\Seen".to_vec()])),
            ("BODY[]", Value::from("raw")),
        ]);
        assert_eq!(data.uid(), Some(15));
        assert_eq!(data.flags(), Some(&[b"\\Seen".to_vec()][..]));
        assert_eq!(data.bytes("body[]"), Some(&b"raw"[..]));
        assert!(data.envelope().is_none());
        assert!(data.internal_date().is_none());
    }

    #[test]
    fn test_merge_keeps_later_values() {
        let mut first = record(&[("FLAGS", Value::Flags(vec![])), ("UID", Value::Int(3))]);
        first.merge(record(&[("FLAGS", Value::Flags(vec![b"\\Seen".to_vec()]))]));
        assert_eq!(first.uid(), Some(3));
        assert_eq!(first.flags().map(<[_]>::len), Some(1));
    }
}
