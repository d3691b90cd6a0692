//! Shared line-shape checks used by the section tracker and both entry
//! strategies.

use chrono::{NaiveDateTime, Timelike};

/// Width of the `YYYY-MM-DD HH:MM:SS` column.
pub const TIMESTAMP_WIDTH: usize = 19;

/// Width of the attribute column (`D....`, `....A`).
pub const ATTRIBUTE_WIDTH: usize = 5;

/// Shortest line that can hold a timestamp, attributes, a size and a path.
pub const MIN_ENTRY_WIDTH: usize = TIMESTAMP_WIDTH + 1 + ATTRIBUTE_WIDTH + 1 + 1 + 1 + 1;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Character offset where the attribute column starts in a trimmed row.
const ATTRIBUTE_COLUMN: usize = TIMESTAMP_WIDTH + 1;

const MIN_RULE_DASHES: usize = 5;

/// Returns `true` for the column header row
/// (`   Date      Time    Attr         Size   Compressed  Name`).
pub fn is_header_line(trimmed: &str) -> bool {
    trimmed.starts_with("Date") && trimmed.contains("Time") && trimmed.contains("Attr")
}

/// Returns `true` for a column separator row made of dash runs.
///
/// The bare `--` marker that precedes the archive property block is not a
/// separator.
pub fn is_rule_line(trimmed: &str) -> bool {
    trimmed.starts_with(&"-".repeat(MIN_RULE_DASHES))
        && trimmed.chars().all(|ch| ch == '-' || ch == ' ')
}

/// Returns `true` when the line is too short to be an entry row.
pub fn is_too_short(line: &str) -> bool {
    line.chars().count() < MIN_ENTRY_WIDTH
}

/// Returns `true` when the fixed attribute column holds only whitespace.
///
/// The totals row shares the trailing shape of an entry
/// (`2025-07-02 22:17:00                 72           96  3 files`) but leaves
/// this column empty.
pub fn attribute_column_is_blank(line: &str) -> bool {
    line.chars()
        .skip(ATTRIBUTE_COLUMN)
        .take(ATTRIBUTE_WIDTH)
        .all(char::is_whitespace)
}

/// Parses the leading 19-character timestamp column.
///
/// The shape is checked position by position before handing the field to
/// chrono, which on its own would accept unpadded numbers.
pub fn parse_timestamp(line: &str) -> Option<NaiveDateTime> {
    let field = line.get(..TIMESTAMP_WIDTH)?;
    let shape_ok = field
        .bytes()
        .enumerate()
        .all(|(idx, byte)| match idx {
            4 | 7 => byte == b'-',
            10 => byte == b' ',
            13 | 16 => byte == b':',
            _ => byte.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }
    let parsed = NaiveDateTime::parse_from_str(field, TIMESTAMP_FORMAT).ok()?;
    // chrono maps `:60` to a leap second.
    if parsed.nanosecond() >= 1_000_000_000 {
        return None;
    }
    Some(parsed)
}
