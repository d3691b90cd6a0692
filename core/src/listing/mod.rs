//! 7-Zip `l` (list) output parser.
//!
//! The console listing looks like this:
//!
//! ```text
//! 7-Zip 19.00 (x64) : Copyright (c) 1999-2018 Igor Pavlov : 2019-02-21
//!
//! Listing archive: example.zip
//!
//! --
//! Path = example.zip
//! Type = zip
//!
//!    Date      Time    Attr         Size   Compressed  Name
//! ------------------- ----- ------------ ------------  ------------------------
//! 2023-12-25 14:30:45 ....A         1024          512  folder/file.txt
//! 2023-12-25 14:30:45 D....            0            0  folder
//! ------------------- ----- ------------ ------------  ------------------------
//!                                   1024          512  1 files, 1 folders
//! ```
//!
//! # Architecture
//!
//! A [`SectionTracker`] walks the trimmed, non-empty lines and decides which
//! of them sit inside the file table. Those candidate rows go to an
//! [`EntryStrategy`], and the accepted entries are folded into an
//! [`ArchiveListing`]. Rows that do not parse are skipped; the parser never
//! fails.
//!
//! The table opens at the separator following the column header and closes
//! at the next separator. Output covering several archives therefore yields
//! one table per archive, and the totals rows after each closing separator
//! are never considered.

pub mod strategies;
pub mod util;

use strategies::{EntryStrategy, EntryStrategyKind};

use crate::{ArchiveEntry, ArchiveListing};

/// Position of the tracker relative to the file table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingSection {
    /// Banner, archive properties, totals, or anything else between tables.
    #[default]
    Outside,
    /// Column header seen; waiting for the opening separator.
    AwaitingRule,
    /// Inside the table; rows are candidate entries.
    Entries,
}

/// How the tracker classified one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Rule,
    Candidate,
    Skipped,
}

/// Two-state (plus header) machine routing lines to the entry parser.
///
/// # Examples
///
/// ```
/// use sevenzip_core::{LineKind, ListingSection, SectionTracker};
///
/// let mut tracker = SectionTracker::new();
/// assert_eq!(tracker.classify("Date      Time    Attr   Size   Compressed  Name"), LineKind::Header);
/// assert_eq!(tracker.classify("------------------- -----"), LineKind::Rule);
/// assert_eq!(tracker.section(), ListingSection::Entries);
/// assert_eq!(tracker.classify("2023-12-25 14:30:45 ....A  1  a"), LineKind::Candidate);
/// assert_eq!(tracker.classify("------------------- -----"), LineKind::Rule);
/// assert_eq!(tracker.section(), ListingSection::Outside);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SectionTracker {
    section: ListingSection,
    tables: usize,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self) -> ListingSection {
        self.section
    }

    /// Number of tables opened so far.
    pub fn tables(&self) -> usize {
        self.tables
    }

    /// Classifies one trimmed line and advances the state.
    pub fn classify(&mut self, trimmed: &str) -> LineKind {
        let is_rule = util::is_rule_line(trimmed);
        let (next, kind) = match self.section {
            ListingSection::Outside if util::is_header_line(trimmed) => {
                (ListingSection::AwaitingRule, LineKind::Header)
            }
            ListingSection::Outside if is_rule => (ListingSection::Outside, LineKind::Rule),
            ListingSection::Outside => (ListingSection::Outside, LineKind::Skipped),
            ListingSection::AwaitingRule if is_rule => (ListingSection::Entries, LineKind::Rule),
            ListingSection::AwaitingRule if util::is_header_line(trimmed) => {
                (ListingSection::AwaitingRule, LineKind::Header)
            }
            ListingSection::AwaitingRule => (ListingSection::Entries, LineKind::Candidate),
            ListingSection::Entries if is_rule => (ListingSection::Outside, LineKind::Rule),
            ListingSection::Entries => (ListingSection::Entries, LineKind::Candidate),
        };

        if self.section == ListingSection::AwaitingRule && next == ListingSection::Entries {
            self.tables += 1;
        }
        self.section = next;
        kind
    }
}

/// Returns the trimmed lines the tracker routes to the entry parser, in
/// order.
///
/// # Examples
///
/// ```
/// use sevenzip_core::candidate_lines;
///
/// let output = "banner\r\n\r\n Date Time Attr Size Compressed Name\r\n-----\r\nrow\r\n-----\r\ntotals\r\n";
/// assert_eq!(candidate_lines(output), vec!["row"]);
/// ```
pub fn candidate_lines(output: &str) -> Vec<&str> {
    let mut tracker = SectionTracker::new();
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| tracker.classify(line) == LineKind::Candidate)
        .collect()
}

/// Counters collected while parsing one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDiagnostics {
    /// Name of the entry strategy used.
    pub strategy: &'static str,
    /// Number of tables seen.
    pub tables: usize,
    /// Lines routed to the entry parser.
    pub candidate_lines: usize,
    /// Candidate lines that produced an entry.
    pub recognized_lines: usize,
    /// Candidate lines that were rejected, verbatim.
    pub rejected_lines: Vec<String>,
}

impl ListingDiagnostics {
    /// Fraction of candidate lines that produced an entry.
    pub fn coverage(&self) -> f64 {
        if self.candidate_lines == 0 {
            return 0.0;
        }
        self.recognized_lines as f64 / self.candidate_lines as f64
    }
}

/// Listing parser bound to one entry strategy.
///
/// # Examples
///
/// ```
/// use sevenzip_core::{EntryStrategyKind, ListingParser};
///
/// let output = "\
///    Date      Time    Attr         Size   Compressed  Name
/// ------------------- ----- ------------ ------------  ------------------------
/// 2023-12-25 14:30:45 ....A         1024          512  folder/file.txt
/// ------------------- ----- ------------ ------------  ------------------------
/// ";
///
/// let parser = ListingParser::new(EntryStrategyKind::Pattern);
/// let (listing, diagnostics) = parser.parse_with_diagnostics(output);
/// assert_eq!(listing.total_files, 1);
/// assert_eq!(diagnostics.recognized_lines, 1);
/// assert_eq!(diagnostics.strategy, "pattern");
/// ```
#[derive(Clone, Copy)]
pub struct ListingParser {
    strategy: &'static dyn EntryStrategy,
}

impl Default for ListingParser {
    fn default() -> Self {
        Self::new(EntryStrategyKind::default())
    }
}

impl std::fmt::Debug for ListingParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingParser")
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

impl ListingParser {
    pub fn new(kind: EntryStrategyKind) -> Self {
        Self {
            strategy: kind.strategy(),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Parses a full listing.
    pub fn parse(&self, output: &str) -> ArchiveListing {
        self.parse_with_diagnostics(output).0
    }

    /// Parses a full listing and reports which candidate rows were rejected.
    pub fn parse_with_diagnostics(&self, output: &str) -> (ArchiveListing, ListingDiagnostics) {
        let mut tracker = SectionTracker::new();
        let mut entries: Vec<ArchiveEntry> = Vec::new();
        let mut diagnostics = ListingDiagnostics {
            strategy: self.strategy.name(),
            ..ListingDiagnostics::default()
        };

        for line in output.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if tracker.classify(line) != LineKind::Candidate {
                continue;
            }
            diagnostics.candidate_lines += 1;
            match self.strategy.parse_entry(line) {
                Some(entry) => {
                    diagnostics.recognized_lines += 1;
                    entries.push(entry);
                }
                None => diagnostics.rejected_lines.push(line.to_string()),
            }
        }

        diagnostics.tables = tracker.tables();
        (ArchiveListing::from_entries(entries), diagnostics)
    }
}

/// Parses 7-Zip list output with the default strategy.
///
/// # Examples
///
/// ```
/// use sevenzip_core::parse_list_output;
///
/// let listing = parse_list_output("");
/// assert!(listing.entries.is_empty());
/// assert_eq!(listing.total_size, 0);
/// ```
pub fn parse_list_output(output: &str) -> ArchiveListing {
    ListingParser::default().parse(output)
}

/// Parses one trimmed listing row with the default strategy.
pub fn parse_entry_line(line: &str) -> Option<ArchiveEntry> {
    EntryStrategyKind::default().strategy().parse_entry(line)
}
