//! Envelope and address records.

use std::fmt;

use chrono::{DateTime, FixedOffset};

use super::Value;

/// Message envelope.
///
/// Address-list fields are empty both when the server sent `NIL` and when it
/// sent an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Envelope {
    /// Date header, or `None` if absent or unparseable.
    pub date: Option<DateTime<FixedOffset>>,
    /// Subject header.
    pub subject: Option<Vec<u8>>,
    /// From addresses.
    pub from: Vec<Address>,
    /// Sender addresses.
    pub sender: Vec<Address>,
    /// Reply-To addresses.
    pub reply_to: Vec<Address>,
    /// To addresses.
    pub to: Vec<Address>,
    /// Cc addresses.
    pub cc: Vec<Address>,
    /// Bcc addresses.
    pub bcc: Vec<Address>,
    /// In-Reply-To header.
    pub in_reply_to: Option<Vec<u8>>,
    /// Message-ID header.
    pub message_id: Option<Vec<u8>>,
}

impl Envelope {
    /// Converts the envelope back into its wire list shape.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::List(vec![
            self.date
                .map_or(Value::Nil, |d| Value::Bytes(d.to_rfc2822().into_bytes())),
            nstring(self.subject.as_ref()),
            address_list(&self.from),
            address_list(&self.sender),
            address_list(&self.reply_to),
            address_list(&self.to),
            address_list(&self.cc),
            address_list(&self.bcc),
            nstring(self.in_reply_to.as_ref()),
            nstring(self.message_id.as_ref()),
        ])
    }
}

/// Email address from an envelope.
///
/// RFC 2822 group syntax is flattened into the surrounding list: an address
/// with a `None` host starts a group (the mailbox holds the group name) and
/// one with both mailbox and host `None` ends it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    /// Display name.
    pub name: Option<Vec<u8>>,
    /// Source route (obsolete).
    pub route: Option<Vec<u8>>,
    /// Mailbox name (local part).
    pub mailbox: Option<Vec<u8>>,
    /// Host name (domain part).
    pub host: Option<Vec<u8>>,
}

impl Address {
    /// Returns `mailbox@host`, if both parts are present.
    #[must_use]
    pub fn email(&self) -> Option<String> {
        match (&self.mailbox, &self.host) {
            (Some(m), Some(h)) => Some(format!(
                "{}@{}",
                String::from_utf8_lossy(m),
                String::from_utf8_lossy(h)
            )),
            _ => None,
        }
    }

    /// Returns true if this entry opens an RFC 2822 group.
    #[must_use]
    pub const fn is_group_start(&self) -> bool {
        self.host.is_none() && self.mailbox.is_some()
    }

    /// Returns true if this entry closes an RFC 2822 group.
    #[must_use]
    pub const fn is_group_end(&self) -> bool {
        self.host.is_none() && self.mailbox.is_none()
    }

    /// Converts the address back into its four-element wire list.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::List(vec![
            nstring(self.name.as_ref()),
            nstring(self.route.as_ref()),
            nstring(self.mailbox.as_ref()),
            nstring(self.host.as_ref()),
        ])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let address = self.email().unwrap_or_else(|| {
            self.mailbox
                .as_ref()
                .or(self.host.as_ref())
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_default()
        });

        match self.name.as_ref().filter(|n| !n.is_empty()) {
            Some(name) => write!(f, "{} <{address}>", String::from_utf8_lossy(name)),
            None => f.write_str(&address),
        }
    }
}

fn nstring(value: Option<&Vec<u8>>) -> Value {
    value.map_or(Value::Nil, |b| Value::Bytes(b.clone()))
}

fn address_list(addresses: &[Address]) -> Value {
    if addresses.is_empty() {
        Value::Nil
    } else {
        Value::List(addresses.iter().map(Address::to_value).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address(name: Option<&str>, mailbox: Option<&str>, host: Option<&str>) -> Address {
        Address {
            name: name.map(|s| s.as_bytes().to_vec()),
            route: None,
            mailbox: mailbox.map(|s| s.as_bytes().to_vec()),
            host: host.map(|s| s.as_bytes().to_vec()),
        }
    }

    #[test]
    fn email_with_both_parts() {
        let addr = address(Some("John Doe"), Some("john"), Some("example.com"));
        assert_eq!(addr.email(), Some("john@example.com".to_string()));
    }

    #[test]
    fn email_without_mailbox() {
        let addr = address(Some("John Doe"), None, Some("example.com"));
        assert_eq!(addr.email(), None);
    }

    #[test]
    fn display_formats_like_rfc2822() {
        assert_eq!(
            address(Some("Mary Jane"), Some("mary"), Some("jane.org")).to_string(),
            "Mary Jane <mary@jane.org>"
        );
        assert_eq!(
            address(Some("Anonymous"), Some("undisclosed-recipients"), None).to_string(),
            "Anonymous <undisclosed-recipients>"
        );
        assert_eq!(
            address(None, None, Some("undisclosed-recipients")).to_string(),
            "undisclosed-recipients"
        );
    }

    #[test]
    fn display_replaces_invalid_utf8() {
        let addr = Address {
            name: Some(b"Caf\xe9".to_vec()),
            route: None,
            mailbox: Some(b"g\xe9rard".to_vec()),
            host: Some(b"domain.org".to_vec()),
        };
        assert_eq!(addr.to_string(), "Caf\u{fffd} <g\u{fffd}rard@domain.org>");
    }

    #[test]
    fn group_markers() {
        let start = address(None, Some("A group"), None);
        let member = address(None, Some("a"), Some("example.com"));
        let end = address(None, None, None);

        assert!(start.is_group_start());
        assert!(!start.is_group_end());
        assert!(!member.is_group_start());
        assert!(!member.is_group_end());
        assert!(end.is_group_end());
    }

    #[test]
    fn empty_address_lists_render_as_nil() {
        let envelope = Envelope {
            subject: Some(b"hi".to_vec()),
            ..Envelope::default()
        };
        let Value::List(fields) = envelope.to_value() else {
            panic!("Expected list");
        };
        assert_eq!(fields.len(), 10);
        assert_eq!(fields[1], Value::from("hi"));
        assert!(fields[2..8].iter().all(Value::is_nil));
    }
}
