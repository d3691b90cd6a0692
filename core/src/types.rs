//! Listing type definitions.
//!
//! This module defines the value types produced when a 7-Zip listing is
//! parsed. The types are designed for serialization with [`serde`] so callers
//! can hand them straight to JSON or YAML output.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One listed file or directory.
///
/// Entries are produced by [`parse_list_output`](crate::parse_list_output)
/// and are never mutated afterwards.
///
/// # Examples
///
/// ```
/// use sevenzip_core::parse_entry_line;
///
/// let entry = parse_entry_line(
///     "2023-12-25 14:30:45 ....A         1024          512  folder/file.txt",
/// )
/// .unwrap();
/// assert_eq!(entry.path, "folder/file.txt");
/// assert_eq!(entry.size, 1024);
/// assert_eq!(entry.compressed_size, 512);
/// assert!(!entry.is_directory);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Archive-relative path, kept exactly as printed.
    pub path: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Packed size in bytes; equals `size` when 7-Zip leaves the column empty.
    pub compressed_size: u64,
    /// Modification time at second precision.
    pub modified: NaiveDateTime,
    /// Raw attribute column (e.g. `D....`, `....A`, `.RH..`).
    pub attributes: String,
    /// Whether the attribute column starts with `D`.
    pub is_directory: bool,
    /// Checksum, when the listing mode reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crc: Option<String>,
}

/// Aggregate result of parsing one listing.
///
/// Totals only count what made it into [`entries`](Self::entries); rows
/// that were rejected during parsing contribute nothing.
///
/// # Examples
///
/// ```
/// use sevenzip_core::ArchiveListing;
///
/// let listing = ArchiveListing::default();
/// assert!(listing.is_empty());
/// assert_eq!(listing.total_files + listing.total_directories, listing.entries.len());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveListing {
    /// Entries in the order they appeared in the output.
    pub entries: Vec<ArchiveEntry>,
    /// Number of non-directory entries.
    pub total_files: usize,
    /// Number of directory entries.
    pub total_directories: usize,
    /// Sum of `size` over files.
    pub total_size: u64,
    /// Sum of `compressed_size` over files.
    pub total_compressed_size: u64,
}

impl ArchiveListing {
    /// Builds a listing from parsed entries, computing every total in one pass.
    ///
    /// # Examples
    ///
    /// ```
    /// use sevenzip_core::{ArchiveListing, parse_entry_line};
    ///
    /// let entries = [
    ///     "2023-12-25 14:30:45 D....            0            0  folder",
    ///     "2023-12-25 14:30:45 ....A         1024          512  folder/file.txt",
    /// ]
    /// .into_iter()
    /// .filter_map(parse_entry_line)
    /// .collect::<Vec<_>>();
    ///
    /// let listing = ArchiveListing::from_entries(entries);
    /// assert_eq!(listing.total_files, 1);
    /// assert_eq!(listing.total_directories, 1);
    /// assert_eq!(listing.total_size, 1024);
    /// ```
    pub fn from_entries(entries: Vec<ArchiveEntry>) -> Self {
        let mut total_files = 0usize;
        let mut total_directories = 0usize;
        let mut total_size = 0u64;
        let mut total_compressed_size = 0u64;

        for entry in &entries {
            if entry.is_directory {
                total_directories += 1;
            } else {
                total_files += 1;
                total_size = total_size.saturating_add(entry.size);
                total_compressed_size =
                    total_compressed_size.saturating_add(entry.compressed_size);
            }
        }

        Self {
            entries,
            total_files,
            total_directories,
            total_size,
            total_compressed_size,
        }
    }

    /// Returns `true` when no entries were recognized.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over file entries only.
    pub fn files(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.iter().filter(|entry| !entry.is_directory)
    }

    /// Iterates over directory entries only.
    pub fn directories(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.iter().filter(|entry| entry.is_directory)
    }

    /// Looks up an entry by its exact archive path.
    pub fn find(&self, path: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|entry| entry.path == path)
    }
}

/// Compression level passed to 7-Zip as `-mx<N>`.
///
/// # Examples
///
/// ```
/// use sevenzip_core::CompressionLevel;
///
/// assert_eq!(CompressionLevel::default(), CompressionLevel::Normal);
/// assert_eq!(CompressionLevel::Ultra.as_switch(), "-mx9");
/// assert_eq!(CompressionLevel::Store.value(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionLevel {
    /// No compression; files are stored as-is.
    Store,
    Fastest,
    Fast,
    /// Balanced speed and ratio (the default).
    #[default]
    Normal,
    Maximum,
    /// Best ratio, slowest.
    Ultra,
}

impl CompressionLevel {
    /// All levels, from no compression to the strongest.
    pub const ALL: [CompressionLevel; 6] = [
        Self::Store,
        Self::Fastest,
        Self::Fast,
        Self::Normal,
        Self::Maximum,
        Self::Ultra,
    ];

    /// Numeric level understood by 7-Zip.
    pub fn value(self) -> u8 {
        match self {
            Self::Store => 0,
            Self::Fastest => 1,
            Self::Fast => 3,
            Self::Normal => 5,
            Self::Maximum => 7,
            Self::Ultra => 9,
        }
    }

    /// Command-line switch for this level.
    pub fn as_switch(self) -> String {
        format!("-mx{}", self.value())
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store => write!(f, "store"),
            Self::Fastest => write!(f, "fastest"),
            Self::Fast => write!(f, "fast"),
            Self::Normal => write!(f, "normal"),
            Self::Maximum => write!(f, "maximum"),
            Self::Ultra => write!(f, "ultra"),
        }
    }
}
