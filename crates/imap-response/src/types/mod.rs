//! Core response types.
//!
//! This module defines the value tree produced by the parser and the typed
//! records that FETCH post-processing builds from it (RFC 3501 section 7.4.2).

#![allow(clippy::missing_const_for_fn)]

mod body;
mod envelope;
mod fetch;
mod identifiers;
mod mailbox;
mod status;
mod value;

pub use body::{BodyData, BodyPart, EmbeddedMessage, Multipart};
pub use envelope::{Address, Envelope};
pub use fetch::FetchData;
pub use identifiers::{SeqNum, Tag};
pub use mailbox::{FolderEntry, FolderStatus, Namespace, NamespaceEntry, Quota, QuotaRoot, SearchIds};
pub use status::Status;
pub(crate) use value::is_canonical_integer;
pub use value::{Value, atom_value};
