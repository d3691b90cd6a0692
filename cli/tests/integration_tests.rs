//! Integration tests for the `sz7` binary.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn sz7_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sz7"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(sz7_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run sz7")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "sz7 failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ---- parse-file / parse-stdin ----

#[test]
fn test_parse_file_json_output() {
    let input = fixture("list-project.txt");
    let output = run(&["parse-file", "--input", input.to_str().unwrap()]);
    let stdout = stdout_of(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{stdout}"));
    assert_eq!(parsed["total_files"], 2);
    assert_eq!(parsed["total_directories"], 1);
    assert_eq!(parsed["total_size"], 4600);
    assert_eq!(parsed["entries"].as_array().map(Vec::len), Some(3));
    assert_eq!(parsed["entries"][2]["path"], "project/src/lib.rs");
    assert_eq!(parsed["entries"][2]["compressed_size"], 3400);
}

#[test]
fn test_parse_file_strategies_produce_same_json() {
    let input = fixture("list-project.txt");
    let input = input.to_str().unwrap();
    let fixed = stdout_of(&run(&["parse-file", "--input", input]));
    let pattern = stdout_of(&run(&[
        "parse-file",
        "--strategy",
        "pattern",
        "--input",
        input,
    ]));
    assert_eq!(fixed, pattern);
}

#[test]
fn test_parse_file_yaml_output() {
    let input = fixture("list-project.txt");
    let output = run(&[
        "parse-file",
        "--format",
        "yaml",
        "--input",
        input.to_str().unwrap(),
    ]);
    let stdout = stdout_of(&output);

    let parsed: serde_yaml::Value = serde_yaml::from_str(&stdout).expect("valid YAML");
    assert_eq!(parsed["total_files"].as_u64(), Some(2));
    assert!(stdout.contains("path: project/Cargo.toml"));
}

#[test]
fn test_parse_file_table_output() {
    let input = fixture("list-project.txt");
    let output = run(&[
        "parse-file",
        "--format",
        "table",
        "--input",
        input.to_str().unwrap(),
    ]);
    let stdout = stdout_of(&output);

    assert!(stdout.starts_with("Modified"));
    assert!(stdout.contains("project/Cargo.toml"));
    assert!(stdout.contains("2 files, 1 folders"));
}

#[test]
fn test_parse_file_missing_input_fails() {
    let output = run(&["parse-file", "--input", "/definitely/not/here.txt"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: Failed to read"), "{stderr}");
}

#[test]
fn test_parse_stdin_json_output() {
    let mut child = Command::new(sz7_bin())
        .args(["parse-stdin", "--format", "json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn sz7");

    let listing = fs::read_to_string(fixture("list-project.txt")).unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(listing.replace('\n', "\r\n").as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    let stdout = stdout_of(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["total_files"], 2);
    assert_eq!(parsed["entries"][1]["path"], "project/Cargo.toml");
}

#[test]
fn test_parse_stdin_empty_input_yields_empty_listing() {
    let output = Command::new(sz7_bin())
        .arg("parse-stdin")
        .stdin(Stdio::null())
        .output()
        .unwrap();
    let stdout = stdout_of(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["total_files"], 0);
    assert_eq!(parsed["entries"].as_array().map(Vec::len), Some(0));
}

// ---- commands that run 7-Zip ----

#[test]
fn test_extract_with_missing_executable_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&[
        "extract",
        "--executable",
        "/nonexistent/7zz",
        "in.7z",
        "--output",
        dir.path().to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("7-Zip executable not found"), "{stderr}");
}

#[test]
fn test_create_with_missing_folder_fails() {
    let dir = tempfile::tempdir().unwrap();
    let exe = dir.path().join("7zz");
    fs::write(&exe, "").unwrap();
    let output = run(&[
        "create",
        "--executable",
        exe.to_str().unwrap(),
        dir.path().join("out.7z").to_str().unwrap(),
        "--folder",
        dir.path().join("missing").to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("source folder not found"), "{stderr}");
}

#[test]
fn test_locate_honours_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let exe = dir.path().join("7zz");
    fs::write(&exe, "").unwrap();
    let config = dir.path().join("runner.yml");
    fs::write(&config, format!("executable: {}\n", exe.display())).unwrap();

    let output = run(&["locate", "--config", config.to_str().unwrap()]);
    let stdout = stdout_of(&output);
    assert_eq!(stdout.trim(), exe.display().to_string());
}

#[test]
fn test_rejects_unknown_compression_level() {
    let output = run(&["create", "out.7z", "--folder", ".", "--level", "extreme"]);
    assert!(!output.status.success());
}

#[cfg(unix)]
mod stub {
    use std::os::unix::fs::PermissionsExt;
    use std::sync::{Mutex, MutexGuard};

    use super::*;

    // Exec of a freshly written script fails with ETXTBSY if another test
    // forks while it is still open for writing.
    static STUB_LOCK: Mutex<()> = Mutex::new(());

    fn lock() -> MutexGuard<'static, ()> {
        STUB_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write_stub(dir: &Path) -> PathBuf {
        let exe = dir.join("7zz");
        let script = format!(
            "#!/bin/sh\ncat '{}'\n",
            fixture("list-project.txt").display()
        );
        fs::write(&exe, script).unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        exe
    }

    #[test]
    fn test_list_single_archive_through_stub() {
        let _guard = lock();
        let dir = tempfile::tempdir().unwrap();
        let exe = write_stub(dir.path());
        let archive = dir.path().join("project.7z");
        fs::write(&archive, b"7z").unwrap();

        let output = run(&[
            "list",
            "--executable",
            exe.to_str().unwrap(),
            archive.to_str().unwrap(),
        ]);
        let stdout = stdout_of(&output);

        let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(parsed["total_files"], 2);
        assert_eq!(parsed["total_compressed_size"], 645 + 3400);
    }

    #[test]
    fn test_list_many_archives_reports_failures() {
        let _guard = lock();
        let dir = tempfile::tempdir().unwrap();
        let exe = write_stub(dir.path());
        let first = dir.path().join("one.7z");
        let second = dir.path().join("two.7z");
        fs::write(&first, b"7z").unwrap();
        fs::write(&second, b"7z").unwrap();
        let missing = dir.path().join("missing.7z");

        let output = run(&[
            "list",
            "--jobs",
            "2",
            "--executable",
            exe.to_str().unwrap(),
            first.to_str().unwrap(),
            missing.to_str().unwrap(),
            second.to_str().unwrap(),
        ]);

        assert_eq!(output.status.code(), Some(1));
        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        let reports = parsed.as_array().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0]["archive"], first.display().to_string());
        assert_eq!(reports[1]["archive"], second.display().to_string());

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("failed to list 1 archive(s)"), "{stderr}");
        assert!(stderr.contains("missing.7z"));
    }
}
