//! Cursor-based row scanner.

use super::EntryStrategy;
use crate::ArchiveEntry;
use crate::listing::util::{
    ATTRIBUTE_WIDTH, TIMESTAMP_WIDTH, attribute_column_is_blank, is_too_short, parse_timestamp,
};

/// Scans the row left to right: timestamp, attributes, size, optional
/// compressed size, then the path.
pub struct FixedWidthStrategy;

impl EntryStrategy for FixedWidthStrategy {
    fn name(&self) -> &'static str {
        "fixed-width"
    }

    fn parse_entry(&self, line: &str) -> Option<ArchiveEntry> {
        if is_too_short(line) || attribute_column_is_blank(line) {
            return None;
        }

        let modified = parse_timestamp(line)?;
        let mut cursor = Cursor::new(line, TIMESTAMP_WIDTH);

        if !cursor.skip_whitespace() {
            return None;
        }
        let attributes = cursor.take_attributes()?;

        cursor.skip_whitespace();
        let size = cursor.take_number()?;
        cursor.skip_whitespace();
        if cursor.at_end() {
            return None;
        }

        let mut compressed_size = size;
        let saved = cursor.pos;
        if let Some(value) = cursor.take_number() {
            cursor.skip_whitespace();
            if cursor.at_end() {
                // The digits were the whole file name.
                cursor.pos = saved;
            } else {
                compressed_size = value;
            }
        }

        let path = cursor.rest().trim();
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

/// Byte cursor over a row. Every advance lands on a char boundary.
struct Cursor<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str, pos: usize) -> Self {
        Self { line, pos }
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// Returns `true` if any whitespace was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let rest = self.rest();
        let skipped = rest.len() - rest.trim_start().len();
        self.pos += skipped;
        skipped > 0
    }

    /// Takes a run of exactly [`ATTRIBUTE_WIDTH`] non-whitespace characters
    /// that is followed by whitespace.
    fn take_attributes(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let end = rest.find(char::is_whitespace)?;
        let field = &rest[..end];
        if field.chars().count() != ATTRIBUTE_WIDTH {
            return None;
        }
        self.pos += end;
        Some(field)
    }

    /// Takes a whitespace-delimited run of ASCII digits. Leaves the cursor
    /// untouched when the run is missing, glued to other text, or overflows.
    fn take_number(&mut self) -> Option<u64> {
        let rest = self.rest();
        let end = rest
            .find(|ch: char| !ch.is_ascii_digit())
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        let delimited = rest[end..]
            .chars()
            .next()
            .is_none_or(char::is_whitespace);
        if !delimited {
            return None;
        }
        let value = rest[..end].parse::<u64>().ok()?;
        self.pos += end;
        Some(value)
    }
}
