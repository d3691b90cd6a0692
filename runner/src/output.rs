//! Output formatting for listings.

use std::path::PathBuf;

use serde::Serialize;
use sevenzip_core::ArchiveListing;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats a listing in the requested output format.
pub fn format_listing(listing: &ArchiveListing, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(listing)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(listing).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(listing_to_markdown(listing)),
        OutputFormat::Table => Ok(listing_to_table(listing)),
    }
}

/// Listing of one archive among several.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReport {
    pub archive: PathBuf,
    pub listing: ArchiveListing,
}

/// Formats several listings, in order.
pub fn format_reports(reports: &[ArchiveReport], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(reports)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(reports).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(reports
            .iter()
            .map(|r| format!("## {}\n\n{}", r.archive.display(), listing_to_markdown(&r.listing)))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Table => Ok(reports
            .iter()
            .map(|r| format!("{}:\n{}", r.archive.display(), listing_to_table(&r.listing)))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn listing_to_markdown(listing: &ArchiveListing) -> String {
    let mut out = String::new();

    out.push_str("| Modified | Attr | Size | Compressed | Path |\n");
    out.push_str("|----------|------|-----:|-----------:|------|\n");
    for entry in &listing.entries {
        out.push_str(&format!(
            "| {} | `{}` | {} | {} | {} |\n",
            entry.modified.format("%Y-%m-%d %H:%M:%S"),
            entry.attributes,
            entry.size,
            entry.compressed_size,
            entry.path.replace('|', "\\|"),
        ));
    }
    out.push('\n');

    out.push_str(&format!(
        "**Files:** {} | **Folders:** {} | **Size:** {} | **Compressed:** {}\n",
        listing.total_files,
        listing.total_directories,
        listing.total_size,
        listing.total_compressed_size
    ));
    out
}

fn listing_to_table(listing: &ArchiveListing) -> String {
    let mut out = String::new();

    let size_width = listing
        .entries
        .iter()
        .map(|e| e.size.to_string().len())
        .chain([listing.total_size.to_string().len(), "Size".len()])
        .max()
        .unwrap_or(4);
    let packed_width = listing
        .entries
        .iter()
        .map(|e| e.compressed_size.to_string().len())
        .chain([
            listing.total_compressed_size.to_string().len(),
            "Compressed".len(),
        ])
        .max()
        .unwrap_or(10);

    out.push_str(&format!(
        "{:<19}  {:<5}  {:>size_width$}  {:>packed_width$}  Name\n",
        "Modified", "Attr", "Size", "Compressed"
    ));
    for entry in &listing.entries {
        out.push_str(&format!(
            "{}  {:<5}  {:>size_width$}  {:>packed_width$}  {}\n",
            entry.modified.format("%Y-%m-%d %H:%M:%S"),
            entry.attributes,
            entry.size,
            entry.compressed_size,
            entry.path,
        ));
    }
    out.push_str(&format!(
        "{:<19}  {:<5}  {:>size_width$}  {:>packed_width$}  {} files, {} folders\n",
        "", "", listing.total_size, listing.total_compressed_size,
        listing.total_files, listing.total_directories,
    ));
    out
}
