//! Pluggable strategies for turning one listing row into an [`ArchiveEntry`].

pub mod fixed;
pub mod pattern;

use serde::{Deserialize, Serialize};

use crate::ArchiveEntry;

pub use fixed::FixedWidthStrategy;
pub use pattern::PatternStrategy;

/// Strategy for extracting an entry from a single trimmed listing row.
///
/// Implementations must agree on which rows they accept and on the values
/// they extract; they differ only in how the row is scanned.
pub trait EntryStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    /// Returns `None` for rows that are not entries. Never panics.
    fn parse_entry(&self, line: &str) -> Option<ArchiveEntry>;
}

/// Selector for the built-in strategies.
///
/// # Examples
///
/// ```
/// use sevenzip_core::EntryStrategyKind;
///
/// assert_eq!(EntryStrategyKind::default(), EntryStrategyKind::FixedWidth);
/// assert_eq!(EntryStrategyKind::Pattern.strategy().name(), "pattern");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStrategyKind {
    /// Cursor-based scan over the fixed columns (the default).
    #[default]
    FixedWidth,
    /// Single anchored regular expression.
    Pattern,
}

impl EntryStrategyKind {
    pub fn strategy(self) -> &'static dyn EntryStrategy {
        match self {
            Self::FixedWidth => &FixedWidthStrategy,
            Self::Pattern => &PatternStrategy,
        }
    }
}
