//! Response wrapper types.

use crate::types::{FetchData, FolderEntry, FolderStatus, SearchIds, SeqNum, Status, Value};

/// Response code carried in square brackets, e.g. `[UIDNEXT 4392]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCode {
    /// Upper-cased code name.
    pub name: String,
    /// Values following the name.
    pub values: Vec<Value>,
}

impl ResponseCode {
    /// Returns true if the code has the given name, ignoring case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Returns the single integer argument of codes like `UIDVALIDITY`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self.values.as_slice() {
            [Value::Int(n)] => Some(*n),
            _ => None,
        }
    }
}

/// Untagged response data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntaggedResponse {
    /// OK, NO, BAD, BYE or PREAUTH.
    Condition {
        /// Condition keyword.
        status: Status,
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// CAPABILITY response.
    Capability(Vec<String>),
    /// FLAGS response.
    Flags(Vec<Vec<u8>>),
    /// LIST, LSUB or XLIST response.
    List(FolderEntry),
    /// SEARCH or SORT response.
    Search(SearchIds),
    /// STATUS response.
    Status(FolderStatus),
    /// EXISTS response (message count).
    Exists(u32),
    /// RECENT response.
    Recent(u32),
    /// EXPUNGE response (message removed).
    Expunge(SeqNum),
    /// FETCH response.
    Fetch {
        /// Message sequence number.
        seq: SeqNum,
        /// Fetch data items.
        data: FetchData,
    },
    /// Any other response, left as generic values.
    Other {
        /// Leading number, as in `* 3 XYZ`.
        number: Option<u32>,
        /// Upper-cased response name.
        name: String,
        /// Values following the name.
        values: Vec<Value>,
    },
}

impl UntaggedResponse {
    /// Returns the response name, e.g. `FETCH` or `OK`.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Condition { status, .. } => status.as_str(),
            Self::Capability(_) => "CAPABILITY",
            Self::Flags(_) => "FLAGS",
            Self::List(_) => "LIST",
            Self::Search(_) => "SEARCH",
            Self::Status(_) => "STATUS",
            Self::Exists(_) => "EXISTS",
            Self::Recent(_) => "RECENT",
            Self::Expunge(_) => "EXPUNGE",
            Self::Fetch { .. } => "FETCH",
            Self::Other { name, .. } => name,
        }
    }
}
