//! BODY / BODYSTRUCTURE records.

use super::{Envelope, Value};

/// A node of a message's body structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyData {
    /// A leaf part.
    Single(BodyPart),
    /// A multipart container.
    Multipart(Multipart),
}

impl BodyData {
    /// Returns true for multipart nodes.
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }

    /// Returns the child parts of a multipart node, or an empty slice.
    #[must_use]
    pub fn parts(&self) -> &[Self] {
        match self {
            Self::Single(_) => &[],
            Self::Multipart(m) => &m.parts,
        }
    }

    /// Returns the `type/subtype` of this node, lower-cased.
    #[must_use]
    pub fn mime_type(&self) -> String {
        match self {
            Self::Single(part) => format!(
                "{}/{}",
                String::from_utf8_lossy(&part.media_type),
                String::from_utf8_lossy(&part.subtype)
            )
            .to_ascii_lowercase(),
            Self::Multipart(m) => {
                format!("multipart/{}", String::from_utf8_lossy(&m.subtype)).to_ascii_lowercase()
            }
        }
    }

    /// Converts the node back into its wire list shape.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Single(part) => part.to_value(),
            Self::Multipart(m) => m.to_value(),
        }
    }
}

/// A single (non-multipart) body part.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BodyPart {
    /// Media type, e.g. `TEXT`.
    pub media_type: Vec<u8>,
    /// Media subtype, e.g. `PLAIN`.
    pub subtype: Vec<u8>,
    /// Content-Type parameters in server order.
    pub params: Vec<(Vec<u8>, Vec<u8>)>,
    /// Content-ID.
    pub id: Option<Vec<u8>>,
    /// Content-Description.
    pub description: Option<Vec<u8>>,
    /// Content-Transfer-Encoding.
    pub encoding: Option<Vec<u8>>,
    /// Size in octets.
    pub size: Option<u64>,
    /// Envelope and structure of an attached `MESSAGE/RFC822`.
    pub message: Option<Box<EmbeddedMessage>>,
    /// Line count for `TEXT/*` and `MESSAGE/RFC822` parts.
    pub lines: Option<u64>,
    /// Remaining extension data (MD5, disposition, language, location).
    pub extension: Vec<Value>,
}

impl BodyPart {
    /// Returns true if the media type is `TEXT`.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.media_type.eq_ignore_ascii_case(b"TEXT")
    }

    /// Returns true if this is an attached `MESSAGE/RFC822`.
    #[must_use]
    pub fn is_message(&self) -> bool {
        self.media_type.eq_ignore_ascii_case(b"MESSAGE")
            && self.subtype.eq_ignore_ascii_case(b"RFC822")
    }

    /// Looks up a Content-Type parameter, ignoring case.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&[u8]> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name.as_bytes()))
            .map(|(_, v)| v.as_slice())
    }

    /// Converts the part back into its wire list shape.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let params = if self.params.is_empty() {
            Value::Nil
        } else {
            Value::List(
                self.params
                    .iter()
                    .flat_map(|(k, v)| [Value::Bytes(k.clone()), Value::Bytes(v.clone())])
                    .collect(),
            )
        };

        let mut items = vec![
            Value::Bytes(self.media_type.clone()),
            Value::Bytes(self.subtype.clone()),
            params,
            nstring(self.id.as_ref()),
            nstring(self.description.as_ref()),
            nstring(self.encoding.as_ref()),
            self.size.map_or(Value::Nil, number),
        ];
        if let Some(message) = &self.message {
            items.push(message.envelope.to_value());
            items.push(message.body.to_value());
        }
        if let Some(lines) = self.lines {
            items.push(number(lines));
        }
        items.extend(self.extension.iter().cloned());
        Value::List(items)
    }
}

/// A message attached as a `MESSAGE/RFC822` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedMessage {
    /// Envelope of the attached message.
    pub envelope: Envelope,
    /// Body structure of the attached message.
    pub body: BodyData,
}

/// A multipart container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Multipart {
    /// Child parts in order.
    pub parts: Vec<BodyData>,
    /// Multipart subtype, e.g. `MIXED`.
    pub subtype: Vec<u8>,
    /// Extension data following the subtype.
    pub extension: Vec<Value>,
}

impl Multipart {
    /// Converts the container back into its wire list shape.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut items: Vec<Value> = self.parts.iter().map(BodyData::to_value).collect();
        items.push(Value::Bytes(self.subtype.clone()));
        items.extend(self.extension.iter().cloned());
        Value::List(items)
    }
}

fn nstring(value: Option<&Vec<u8>>) -> Value {
    value.map_or(Value::Nil, |b| Value::Bytes(b.clone()))
}

fn number(n: u64) -> Value {
    i64::try_from(n).map_or_else(|_| Value::Bytes(n.to_string().into_bytes()), Value::Int)
}
