//! Timestamp parsing for ENVELOPE dates and INTERNALDATE values.
//!
//! Servers send RFC 2822 dates (`Sun, 24 Mar 2013 22:06:10 +0200`) in
//! envelopes and the IMAP `INTERNALDATE` form (`9-Feb-2007 17:08:08 -0430`)
//! for arrival times. Both are handed to chrono first. Real mailers also
//! produce dotted times, long day names, unsigned zones and missing zones,
//! which chrono rejects; those go through a small field-based fallback.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone};

/// `INTERNALDATE` layout, e.g. `17-Jul-1996 02:44:25 -0700`.
const INTERNALDATE_FORMAT: &str = "%d-%b-%Y %H:%M:%S %z";

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parses an IMAP or RFC 2822 timestamp.
///
/// Returns `None` if the text is not a recognisable date. A date without a
/// zone is taken as UTC. With `normalise`, the result is converted to the
/// local offset; otherwise it keeps the offset from the input.
#[must_use]
pub fn parse_to_datetime(timestamp: &[u8], normalise: bool) -> Option<DateTime<FixedOffset>> {
    let text = String::from_utf8_lossy(timestamp);
    // Trailing "(PDT)"-style comments carry no information.
    let text = text.find('(').map_or(&*text, |idx| &text[..idx]).trim();

    let parsed = DateTime::parse_from_rfc2822(text)
        .or_else(|_| DateTime::parse_from_str(text, INTERNALDATE_FORMAT))
        .ok()
        .or_else(|| parse_fields(text))?;

    Some(if normalise {
        parsed.with_timezone(&Local).fixed_offset()
    } else {
        parsed
    })
}

/// Formats a timestamp the way `INTERNALDATE` is sent on the wire.
#[must_use]
pub fn format_internaldate(dt: &DateTime<FixedOffset>) -> String {
    dt.format(INTERNALDATE_FORMAT).to_string()
}

/// Fallback for the obsolete forms chrono does not accept.
fn parse_fields(text: &str) -> Option<DateTime<FixedOffset>> {
    let mut fields: Vec<&str> = text
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|f| !f.is_empty())
        .flat_map(split_date_field)
        .collect();

    if fields
        .first()
        .is_some_and(|f| f.chars().all(|c| c.is_ascii_alphabetic()) && month(f).is_none())
    {
        fields.remove(0);
    }
    if fields.len() >= 2 && month(fields[0]).is_some() && fields[1].parse::<u32>().is_ok() {
        fields.swap(0, 1);
    }

    let [day, mon, year, rest @ ..] = fields.as_slice() else {
        return None;
    };
    let date = NaiveDate::from_ymd_opt(parse_year(year)?, month(mon)?, day.parse().ok()?)?;

    let (time, zone) = match rest {
        [] => (NaiveTime::MIN, None),
        [time] => (parse_time(time)?, None),
        [time, zone, ..] => (parse_time(time)?, Some(*zone)),
    };
    let offset = match zone {
        Some(zone) => parse_zone(zone)?,
        None => FixedOffset::east_opt(0)?,
    };

    offset
        .from_local_datetime(&date.and_time(time))
        .single()
}

/// Splits `9-Feb-2007` into its parts while leaving `-0430` intact.
fn split_date_field(field: &str) -> Vec<&str> {
    let inner_dash = field.as_bytes().get(1..).is_some_and(|rest| rest.contains(&b'-'));
    if inner_dash && !field.starts_with(['-', '+']) {
        field.split('-').filter(|f| !f.is_empty()).collect()
    } else {
        vec![field]
    }
}

fn month(field: &str) -> Option<u32> {
    let prefix = field.get(..3)?.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .and_then(|idx| u32::try_from(idx + 1).ok())
}

fn parse_year(field: &str) -> Option<i32> {
    if !(2..=4).contains(&field.len()) || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = field.parse().ok()?;
    // Two-digit years follow RFC 2822 section 4.3, as chrono does.
    Some(match (field.len(), year) {
        (2, 0..=49) => year + 2000,
        (2, _) => year + 1900,
        _ => year,
    })
}

fn parse_time(field: &str) -> Option<NaiveTime> {
    let parts: Vec<u32> = field
        .split([':', '.'])
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [h, m] => NaiveTime::from_hms_opt(*h, *m, 0),
        [h, m, s] => NaiveTime::from_hms_opt(*h, *m, *s),
        _ => None,
    }
}

fn parse_zone(zone: &str) -> Option<FixedOffset> {
    let hours = match zone.to_ascii_uppercase().as_str() {
        "UT" | "UTC" | "GMT" | "Z" => Some(0),
        "EDT" => Some(-4),
        "EST" | "CDT" => Some(-5),
        "CST" | "MDT" => Some(-6),
        "MST" | "PDT" => Some(-7),
        "PST" => Some(-8),
        _ => None,
    };
    if let Some(hours) = hours {
        return FixedOffset::east_opt(hours * 3600);
    }

    let (sign, digits) = match zone.as_bytes().first()? {
        b'+' => (1, &zone[1..]),
        b'-' => (-1, &zone[1..]),
        _ => (1, zone),
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        // Unknown zone names are treated as UTC, as RFC 2822 asks for
        // unrecognised obsolete zones.
        return zone
            .bytes()
            .all(|b| b.is_ascii_alphabetic())
            .then(|| FixedOffset::east_opt(0))
            .flatten();
    }
    let hh: i32 = digits[..2].parse().ok()?;
    let mm: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hh * 3600 + mm * 60))
}
