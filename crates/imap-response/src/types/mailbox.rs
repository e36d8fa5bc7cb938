//! Mailbox-level result records.

use std::collections::BTreeMap;

use super::Value;

/// One LIST, LSUB or XLIST entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    /// Name attributes, such as `\HasNoChildren`.
    pub flags: Vec<Vec<u8>>,
    /// Hierarchy delimiter, `None` for a flat namespace.
    pub delimiter: Option<Vec<u8>>,
    /// Mailbox name.
    pub name: Vec<u8>,
}

impl FolderEntry {
    /// Returns true if the entry carries the given attribute, ignoring case.
    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags
            .iter()
            .any(|f| f.eq_ignore_ascii_case(flag.as_bytes()))
    }

    /// Returns true unless the mailbox is marked `\NoSelect`.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.has_flag("\\NoSelect")
    }

    /// Returns the mailbox name with invalid UTF-8 replaced.
    #[must_use]
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

/// STATUS response data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderStatus {
    /// Mailbox name.
    pub mailbox: Vec<u8>,
    /// Status items keyed by upper-cased name, e.g. `MESSAGES`.
    pub items: BTreeMap<String, Value>,
}

impl FolderStatus {
    /// Returns a numeric status item, ignoring case.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.items
            .get(&name.to_ascii_uppercase())
            .and_then(Value::as_int)
    }
}

/// SEARCH or SORT result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchIds {
    /// Message ids in server order.
    pub ids: Vec<u32>,
    /// Highest mod-sequence reported with a CONDSTORE search.
    pub modseq: Option<u64>,
}

/// One resource of a QUOTA response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quota {
    /// Quota root name.
    pub root: Vec<u8>,
    /// Resource name, e.g. `STORAGE`.
    pub resource: Vec<u8>,
    /// Current usage.
    pub usage: u64,
    /// Limit for the resource.
    pub limit: u64,
}

/// QUOTAROOT response data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaRoot {
    /// Mailbox the roots apply to.
    pub mailbox: Vec<u8>,
    /// Quota root names.
    pub roots: Vec<Vec<u8>>,
}

/// A namespace prefix and its hierarchy delimiter.
pub type NamespaceEntry = (Vec<u8>, Option<Vec<u8>>);

/// NAMESPACE response data (RFC 2342).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Namespace {
    /// Personal namespaces.
    pub personal: Vec<NamespaceEntry>,
    /// Other users' namespaces.
    pub other: Vec<NamespaceEntry>,
    /// Shared namespaces.
    pub shared: Vec<NamespaceEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_entry_flags() {
        let entry = FolderEntry {
            flags: vec![b"\\HasNoChildren".to_vec(), b"\\Noselect".to_vec()],
            delimiter: Some(b"/".to_vec()),
            name: b"Archive".to_vec(),
        };
        assert!(entry.has_flag("\\hasnochildren"));
        assert!(!entry.has_flag("\\Marked"));
        assert!(!entry.is_selectable());
        assert_eq!(entry.name_lossy(), "Archive");
    }

    #[test]
    fn test_folder_status_get_int() {
        let status = FolderStatus {
            mailbox: b"INBOX".to_vec(),
            items: BTreeMap::from([("MESSAGES".to_string(), Value::Int(3))]),
        };
        assert_eq!(status.get_int("messages"), Some(3));
        assert_eq!(status.get_int("UIDNEXT"), None);
    }
}
