//! Helpers that turn generic values into command-specific records.
//!
//! Each helper takes the values following the response name, e.g. for
//! `* LIST (\HasNoChildren) "/" INBOX` the three values after `LIST`.

use std::collections::BTreeMap;

use crate::serialize::render;
use crate::types::{
    FolderEntry, FolderStatus, Namespace, NamespaceEntry, Quota, QuotaRoot, SearchIds, Value,
};
use crate::{Error, Result};

/// Parses SEARCH or SORT data into message ids.
///
/// Accepts the CONDSTORE form `1 2 3 (MODSEQ 917162500)`.
///
/// # Errors
///
/// Returns [`Error::Parse`] for anything other than ids and a MODSEQ list.
pub fn parse_message_list(values: &[Value]) -> Result<SearchIds> {
    let mut result = SearchIds::default();

    for value in values {
        match value {
            Value::Int(_) => result.ids.push(to_u32(value, "message id")?),
            Value::List(items)
                if items.len() == 2
                    && items[0]
                        .as_bytes()
                        .is_some_and(|b| b.eq_ignore_ascii_case(b"MODSEQ")) =>
            {
                result.modseq = Some(to_u64(&items[1], "MODSEQ")?);
            }
            other => return Err(unexpected("message list item", other)),
        }
    }

    Ok(result)
}

/// Parses LIST, LSUB or XLIST data given as `(flags) delimiter name`
/// triplets.
///
/// Folder names that look like integers are returned as their text.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the values do not form whole triplets.
pub fn parse_folder_list(values: &[Value]) -> Result<Vec<FolderEntry>> {
    if values.len() % 3 != 0 {
        return Err(Error::parse(
            format!("folder list has {} items, expected triplets", values.len()),
            render(values),
        ));
    }

    values
        .chunks_exact(3)
        .map(|triplet| {
            let Value::List(flags) = &triplet[0] else {
                return Err(unexpected("folder flags", &triplet[0]));
            };
            Ok(FolderEntry {
                flags: flags
                    .iter()
                    .map(|f| string(f, "folder flag"))
                    .collect::<Result<_>>()?,
                delimiter: nstring(&triplet[1], "folder delimiter")?,
                name: string(&triplet[2], "folder name")?,
            })
        })
        .collect()
}

/// Parses STATUS data given as `mailbox (name value ...)`.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the item list is missing or uneven.
pub fn parse_folder_status(values: &[Value]) -> Result<FolderStatus> {
    let [mailbox, Value::List(items)] = values else {
        return Err(Error::parse(
            "STATUS data must be a mailbox and an item list",
            render(values),
        ));
    };

    Ok(FolderStatus {
        mailbox: string(mailbox, "mailbox name")?,
        items: pairs(items, "STATUS")?
            .map(|(name, value)| Ok((upper(string(name, "status item")?), value.clone())))
            .collect::<Result<BTreeMap<_, _>>>()?,
    })
}

/// Parses QUOTA data given as `root (resource usage limit ...)`.
///
/// Several root/list pairs may follow each other.
///
/// # Errors
///
/// Returns [`Error::Parse`] for uneven pairs, partial triplets or
/// non-numeric usage and limit values.
pub fn parse_quota(values: &[Value]) -> Result<Vec<Quota>> {
    let mut quotas = Vec::new();

    for (root, resources) in pairs(values, "QUOTA")? {
        let root = string(root, "quota root")?;
        let Value::List(resources) = resources else {
            return Err(unexpected("quota resource list", resources));
        };
        if resources.len() % 3 != 0 {
            return Err(Error::parse(
                "quota resources must come in triplets",
                render(resources),
            ));
        }
        for triplet in resources.chunks_exact(3) {
            quotas.push(Quota {
                root: root.clone(),
                resource: string(&triplet[0], "quota resource")?,
                usage: to_u64(&triplet[1], "quota usage")?,
                limit: to_u64(&triplet[2], "quota limit")?,
            });
        }
    }

    Ok(quotas)
}

/// Parses QUOTAROOT data given as `mailbox root ...`.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the mailbox is missing.
pub fn parse_quota_root(values: &[Value]) -> Result<QuotaRoot> {
    let Some((mailbox, roots)) = values.split_first() else {
        return Err(Error::parse("QUOTAROOT data without a mailbox", ""));
    };

    Ok(QuotaRoot {
        mailbox: string(mailbox, "mailbox name")?,
        roots: roots
            .iter()
            .map(|r| string(r, "quota root"))
            .collect::<Result<_>>()?,
    })
}

/// Parses NAMESPACE data: personal, other users' and shared namespaces.
///
/// Each is `NIL` or a list of `(prefix delimiter ...)` entries. Extension
/// data after the delimiter is ignored.
///
/// # Errors
///
/// Returns [`Error::Parse`] unless exactly three namespace groups are given.
pub fn parse_namespace(values: &[Value]) -> Result<Namespace> {
    let [personal, other, shared] = values else {
        return Err(Error::parse(
            format!("NAMESPACE has {} groups, expected 3", values.len()),
            render(values),
        ));
    };

    Ok(Namespace {
        personal: namespace_group(personal)?,
        other: namespace_group(other)?,
        shared: namespace_group(shared)?,
    })
}

fn namespace_group(value: &Value) -> Result<Vec<NamespaceEntry>> {
    match value {
        Value::Nil => Ok(Vec::new()),
        Value::List(entries) => entries
            .iter()
            .map(|entry| match entry.as_list() {
                Some([prefix, delimiter, ..]) => Ok((
                    string(prefix, "namespace prefix")?,
                    nstring(delimiter, "namespace delimiter")?,
                )),
                _ => Err(unexpected("namespace entry", entry)),
            })
            .collect(),
        other => Err(unexpected("namespace group", other)),
    }
}

/// Iterates over `name value` pairs.
pub(crate) fn pairs<'a>(
    values: &'a [Value],
    what: &str,
) -> Result<impl Iterator<Item = (&'a Value, &'a Value)>> {
    if values.len() % 2 != 0 {
        return Err(Error::parse(
            format!("uneven number of {what} items"),
            render(values),
        ));
    }
    Ok(values.chunks_exact(2).map(|pair| (&pair[0], &pair[1])))
}

/// Reads a byte string; integers are rendered back to their text.
pub(crate) fn string(value: &Value, what: &str) -> Result<Vec<u8>> {
    match value {
        Value::Bytes(b) => Ok(b.clone()),
        Value::Int(n) => Ok(n.to_string().into_bytes()),
        other => Err(unexpected(what, other)),
    }
}

/// Reads a byte string or `NIL`.
pub(crate) fn nstring(value: &Value, what: &str) -> Result<Option<Vec<u8>>> {
    match value {
        Value::Nil => Ok(None),
        other => string(other, what).map(Some),
    }
}

/// Reads a non-negative number, accepting quoted digits.
pub(crate) fn to_u64(value: &Value, what: &str) -> Result<u64> {
    let parsed = match value {
        Value::Int(n) => u64::try_from(*n).ok(),
        Value::Bytes(b) => std::str::from_utf8(b).ok().and_then(|s| s.parse().ok()),
        _ => None,
    };
    parsed.ok_or_else(|| unexpected(what, value))
}

/// Reads a number that fits in 32 bits.
pub(crate) fn to_u32(value: &Value, what: &str) -> Result<u32> {
    to_u64(value, what)
        .and_then(|n| u32::try_from(n).map_err(|_| unexpected(what, value)))
}

/// Upper-cases an item name.
pub(crate) fn upper(name: Vec<u8>) -> String {
    String::from_utf8_lossy(&name).to_ascii_uppercase()
}

/// Builds an error for a value of the wrong shape.
pub(crate) fn unexpected(what: &str, value: &Value) -> Error {
    Error::parse(
        format!("invalid {what}: unexpected {}", value.kind()),
        render(std::slice::from_ref(value)),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::parser::lexer::ResponseChunk;
    use crate::parser::response::parse_response;

    fn values(line: &str) -> Vec<Value> {
        parse_response(&[ResponseChunk::line(line)]).unwrap()
    }

    #[test]
    fn test_message_list() {
        let ids = parse_message_list(&values("1 2 3 10")).unwrap();
        assert_eq!(ids.ids, vec![1, 2, 3, 10]);
        assert_eq!(ids.modseq, None);
    }

    #[test]
    fn test_message_list_empty() {
        assert_eq!(parse_message_list(&[]).unwrap(), SearchIds::default());
    }

    #[test]
    fn test_message_list_with_modseq() {
        let ids = parse_message_list(&values("1 2 (modseq 917162500) 3")).unwrap();
        assert_eq!(ids.ids, vec![1, 2, 3]);
        assert_eq!(ids.modseq, Some(917_162_500));
    }

    #[test]
    fn test_message_list_rejects_garbage() {
        assert!(parse_message_list(&values("1 foo")).is_err());
        assert!(parse_message_list(&values("-1")).is_err());
    }

    #[test]
    fn test_folder_list() {
        let entries = parse_folder_list(&values(
            r#"(\HasNoChildren) "/" INBOX (\Noselect) NIL "Other Users" () "." 2000"#,
        ))
        .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, b"INBOX");
        assert_eq!(entries[0].delimiter, Some(b"/".to_vec()));
        assert_eq!(entries[0].flags, vec![b"\\HasNoChildren".to_vec()]);
        assert_eq!(entries[1].delimiter, None);
        assert_eq!(entries[1].name, b"Other Users");
        assert_eq!(entries[2].name, b"2000");
        assert!(entries[2].flags.is_empty());
    }

    #[test]
    fn test_folder_list_partial_triplet() {
        assert!(parse_folder_list(&values(r#"() "/""#)).is_err());
    }

    #[test]
    fn test_folder_status() {
        let status =
            parse_folder_status(&values("blurdybloop (messages 231 UIDNEXT 44292)")).unwrap();
        assert_eq!(status.mailbox, b"blurdybloop");
        assert_eq!(status.get_int("MESSAGES"), Some(231));
        assert_eq!(status.get_int("uidnext"), Some(44292));
    }

    #[test]
    fn test_folder_status_uneven() {
        assert!(parse_folder_status(&values("INBOX (MESSAGES)")).is_err());
        assert!(parse_folder_status(&values("INBOX")).is_err());
    }

    #[test]
    fn test_quota() {
        let quotas = parse_quota(&values(r#""" (STORAGE 10 512 MESSAGE 3 100)"#)).unwrap();
        assert_eq!(
            quotas,
            vec![
                Quota {
                    root: Vec::new(),
                    resource: b"STORAGE".to_vec(),
                    usage: 10,
                    limit: 512,
                },
                Quota {
                    root: Vec::new(),
                    resource: b"MESSAGE".to_vec(),
                    usage: 3,
                    limit: 100,
                },
            ]
        );
    }

    #[test]
    fn test_quota_root() {
        let root = parse_quota_root(&values(r#"INBOX "" "User quota""#)).unwrap();
        assert_eq!(root.mailbox, b"INBOX");
        assert_eq!(root.roots, vec![Vec::new(), b"User quota".to_vec()]);
        assert!(parse_quota_root(&[]).is_err());
    }

    #[test]
    fn test_namespace() {
        let ns = parse_namespace(&values(
            r##"(("" "/")) (("~" "/")) (("#shared/" "/") ("#public/" NIL))"##,
        ))
        .unwrap();
        assert_eq!(ns.personal, vec![(Vec::new(), Some(b"/".to_vec()))]);
        assert_eq!(ns.other, vec![(b"~".to_vec(), Some(b"/".to_vec()))]);
        assert_eq!(ns.shared[1], (b"#public/".to_vec(), None));
    }

    #[test]
    fn test_namespace_nil_groups() {
        let ns = parse_namespace(&values(r#"(("INBOX." ".")) NIL NIL"#)).unwrap();
        assert_eq!(ns.personal.len(), 1);
        assert!(ns.other.is_empty());
        assert!(ns.shared.is_empty());
        assert!(parse_namespace(&values("NIL NIL")).is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(to_u64(&Value::from("42"), "n").unwrap(), 42);
        assert!(to_u64(&Value::Int(-1), "n").is_err());
        assert!(to_u32(&Value::Int(i64::from(u32::MAX) + 1), "n").is_err());
    }
}
