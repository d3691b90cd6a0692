//! Single-pattern row matcher.

use std::sync::LazyLock;

use regex::Regex;

use super::EntryStrategy;
use crate::ArchiveEntry;
use crate::listing::util::{attribute_column_is_blank, is_too_short, parse_timestamp};

// Digits are spelled `[0-9]` because `\d` matches any Unicode digit.
static ENTRY_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<timestamp>[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2})\s+(?P<attributes>\S{5})\s+(?P<size>[0-9]+)\s+(?:(?P<compressed>[0-9]+)\s+)?(?P<path>\S.*)$",
    )
    .expect("static regex must compile")
});

/// Matches the whole row against one anchored expression.
///
/// The optional compressed-size group only matches when whitespace and more
/// text follow it, so a purely numeric file name ends up in `path`.
pub struct PatternStrategy;

impl EntryStrategy for PatternStrategy {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn parse_entry(&self, line: &str) -> Option<ArchiveEntry> {
        if is_too_short(line) || attribute_column_is_blank(line) {
            return None;
        }

        let caps = ENTRY_ROW.captures(line)?;
        let modified = parse_timestamp(caps.name("timestamp")?.as_str())?;
        let attributes = caps.name("attributes")?.as_str();
        let size = caps.name("size")?.as_str().parse::<u64>().ok()?;

        let path_match = caps.name("path")?;
        let (compressed_size, path) = match caps.name("compressed") {
            Some(compressed) => match compressed.as_str().parse::<u64>() {
                Ok(value) => (value, path_match.as_str()),
                // An unrepresentable number cannot be a size; keep it in the path.
                Err(_) => (size, &line[compressed.start()..]),
            },
            None => (size, path_match.as_str()),
        };

        let path = path.trim();
        if path.is_empty() {
            return None;
        }

        Some(ArchiveEntry {
            path: path.to_string(),
            size,
            compressed_size,
            modified,
            is_directory: attributes.starts_with('D'),
            attributes: attributes.to_string(),
            crc: None,
        })
    }
}
