//! Core types and the listing parser for 7-Zip console output.
//!
//! This crate has no I/O. It turns text captured from the 7-Zip executable
//! into structured values:
//!
//! - [`ArchiveEntry`] — one file or directory row of a listing.
//! - [`ArchiveListing`] — all entries of a listing plus file/directory totals.
//! - [`CompressionLevel`] — the `-mx<N>` presets used when creating archives.
//!
//! [`parse_list_output`] parses the output of `7z l <archive>`. Rows outside
//! the file table and rows that do not look like entries are skipped, so the
//! parser never fails. [`ListingParser`] selects between the two
//! [`EntryStrategy`] implementations and can report rejected rows.
//!
//! [`validate_output`] screens output from a successful invocation for error
//! messages 7-Zip prints without a failing exit status.
//!
//! # Example
//!
//! ```
//! use sevenzip_core::*;
//!
//! let output = "\
//! 7-Zip 23.01 (x64) : Copyright (c) 1999-2023 Igor Pavlov : 2023-06-20
//!
//! Listing archive: example.zip
//!
//!    Date      Time    Attr         Size   Compressed  Name
//! ------------------- ----- ------------ ------------  ------------------------
//! 2023-12-25 14:30:45 ....A         1024          512  folder/file.txt
//! 2023-12-25 14:30:45 D....            0            0  folder
//! ------------------- ----- ------------ ------------  ------------------------
//! 2023-12-25 14:30:45               1024          512  1 files, 1 folders
//! ";
//!
//! assert!(validate_output(output, "").is_ok());
//!
//! let listing = parse_list_output(output);
//! assert_eq!(listing.total_files, 1);
//! assert_eq!(listing.total_directories, 1);
//! assert_eq!(listing.total_size, 1024);
//! assert_eq!(listing.find("folder").map(|e| e.is_directory), Some(true));
//! ```

mod listing;
mod types;
mod validate;

pub use listing::strategies::{
    EntryStrategy, EntryStrategyKind, FixedWidthStrategy, PatternStrategy,
};
pub use listing::util::MIN_ENTRY_WIDTH;
pub use listing::{
    LineKind, ListingDiagnostics, ListingParser, ListingSection, SectionTracker, candidate_lines,
    parse_entry_line, parse_list_output,
};
pub use types::*;
pub use validate::{OutputError, validate_output};
