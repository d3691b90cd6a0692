use std::fs;
use std::path::PathBuf;

use sevenzip_core::{EntryStrategyKind, ListingParser, parse_list_output, validate_output};

#[test]
fn test_parse_zip_fixture_counts_files_and_folders() {
    let output = fixture("list-zip.txt");
    let listing = parse_list_output(&output);

    assert_eq!(listing.entries.len(), 6);
    assert_eq!(listing.total_files, 4);
    assert_eq!(listing.total_directories, 2);
    assert_eq!(listing.total_size, 7692);
    assert_eq!(listing.total_compressed_size, 2841);

    let notes = listing
        .find("docs/release notes.txt")
        .expect("path with a space should be kept whole");
    assert_eq!(notes.size, 1536);
    assert_eq!(notes.compressed_size, 640);
    assert_eq!(notes.modified.to_string(), "2024-03-01 09:16:40");

    let numeric = listing.find("src/2024").expect("numeric file name");
    assert_eq!(numeric.compressed_size, 12);

    let order: Vec<&str> = listing.entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        order,
        vec![
            "docs",
            "docs/readme.md",
            "docs/release notes.txt",
            "src",
            "src/main.rs",
            "src/2024"
        ]
    );
}

#[test]
fn test_parse_solid_7z_fixture_with_blank_compressed_column() {
    let output = fixture("list-7z-solid.txt");
    let listing = parse_list_output(&output);

    assert_eq!(listing.total_files, 3);
    assert_eq!(listing.total_directories, 1);
    assert_eq!(listing.total_size, 15660);
    assert_eq!(listing.total_compressed_size, 1648 + 5120 + 300);

    let notes = listing.find("photos/notes.txt").unwrap();
    assert_eq!(notes.compressed_size, notes.size);

    let digits_only = listing.find("42").expect("digit-only name belongs to the path");
    assert_eq!(digits_only.size, 300);
    assert_eq!(digits_only.compressed_size, 300);

    assert!(listing.find("photos/été 2023.jpg").is_some());
    assert_eq!(listing.directories().count(), 1);
}

#[test]
fn test_parse_multi_archive_fixture_skips_every_totals_row() {
    let output = fixture("list-multi.txt");
    let (listing, diagnostics) = ListingParser::default().parse_with_diagnostics(&output);

    assert_eq!(diagnostics.tables, 2);
    assert!(diagnostics.rejected_lines.is_empty());

    let paths: Vec<&str> = listing.entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["a.txt", "b", "b/b.txt"]);
    assert_eq!(listing.total_files, 2);
    assert_eq!(listing.total_directories, 1);
    assert_eq!(listing.total_size, 300);
    assert_eq!(listing.total_compressed_size, 180);
}

#[test]
fn test_crlf_output_parses_like_lf_output() {
    for name in FIXTURES {
        let lf = fixture(name);
        let crlf = lf.replace('\n', "\r\n");
        assert_eq!(parse_list_output(&lf), parse_list_output(&crlf), "{name}");
    }
}

#[test]
fn test_strategies_agree_on_fixtures() {
    let fixed = ListingParser::new(EntryStrategyKind::FixedWidth);
    let pattern = ListingParser::new(EntryStrategyKind::Pattern);

    for name in FIXTURES {
        let output = fixture(name);
        let (fixed_listing, fixed_diag) = fixed.parse_with_diagnostics(&output);
        let (pattern_listing, pattern_diag) = pattern.parse_with_diagnostics(&output);

        assert_eq!(fixed_listing, pattern_listing, "{name}");
        assert_eq!(fixed_diag.rejected_lines, pattern_diag.rejected_lines, "{name}");
        assert!((fixed_diag.coverage() - 1.0).abs() < f64::EPSILON, "{name}");
    }
}

#[test]
fn test_parsing_is_idempotent() {
    let output = fixture("list-zip.txt");
    assert_eq!(parse_list_output(&output), parse_list_output(&output));
}

#[test]
fn test_fixtures_pass_output_validation() {
    for name in FIXTURES {
        assert_eq!(validate_output(&fixture(name), ""), Ok(()), "{name}");
    }
}

#[test]
fn test_listing_serializes_with_totals() {
    let listing = parse_list_output(&fixture("list-zip.txt"));
    let json = serde_json::to_value(&listing).expect("listing should serialize");

    assert_eq!(json["total_files"], 4);
    assert_eq!(json["entries"][1]["path"], "docs/readme.md");
    assert_eq!(json["entries"][1]["modified"], "2024-03-01T09:15:02");
    assert!(json["entries"][1].get("crc").is_none());
}

const FIXTURES: [&str; 3] = ["list-zip.txt", "list-7z-solid.txt", "list-multi.txt"];

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}
