/// Integration test suite: drives the compiled `fs-twin` binary against a
/// hand-written snapshot in a scratch directory.
///
/// All tests invoke the binary via subprocess. The `CARGO_BIN_EXE_fs-twin`
/// environment variable is set by Cargo during `cargo test`. The pipeline itself
/// is covered by the unit tests in `src/engine`; these tests pin the read-only
/// query surface and the host commands.
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const MB: u64 = 1024 * 1024;

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_fs-twin"))
}

/// Run an fs-twin command from `cwd` and assert it exits successfully.
/// Returns stdout as a String.
fn run_success(cwd: &Path, args: &[&str]) -> String {
    let out = Command::new(binary())
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("failed to invoke fs-twin binary");
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        out.status.success(),
        "command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
        args,
        out.status,
        stdout,
        stderr
    );
    stdout
}

/// Run an fs-twin command and assert it exits with a non-zero status.
fn run_failure(cwd: &Path, args: &[&str]) -> String {
    let out = Command::new(binary())
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("failed to invoke fs-twin binary");
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    assert!(
        !out.status.success(),
        "command {:?} expected to fail but exited successfully",
        args
    );
    stderr
}

fn run_json(cwd: &Path, args: &[&str]) -> serde_json::Value {
    let stdout = run_success(cwd, args);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("{args:?} did not print JSON ({e}): {stdout}"))
}

/// A scratch layout: `<tmp>/ModelData` watched, state files next to it.
struct Fixture {
    dir: TempDir,
    root: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("ModelData")).unwrap();
        let root = dir.path().join("ModelData").canonicalize().unwrap();
        Self { dir, root }
    }

    fn root_arg(&self) -> &str {
        self.root.to_str().unwrap()
    }

    fn base(&self) -> &Path {
        self.dir.path()
    }

    fn record(&self, name: &str, size: u64, category: &str, deleted: bool) -> (String, serde_json::Value) {
        let full = self.root.join(name).to_string_lossy().into_owned();
        let value = serde_json::json!({
            "name": name,
            "fullPath": full,
            "size": size,
            "lastModified": "2024-05-01T12:00:00Z",
            "isDeleted": deleted,
            "category": category,
        });
        (full, value)
    }

    /// Three active documents (1 MB, 2 MB, 1 MB) and one tombstoned source file.
    fn write_standard_snapshot(&self) {
        let records = [
            self.record("a.pdf", MB, "DOCUMENTATION", false),
            self.record("b.docx", 2 * MB, "DOCUMENTATION", false),
            self.record("c.txt", MB, "DOCUMENTATION", false),
            self.record("old.py", 512, "SOURCE_CODE", true),
        ];
        let doc: serde_json::Map<String, serde_json::Value> = records.into_iter().collect();
        std::fs::write(
            self.base().join("twin_snapshot.json"),
            serde_json::to_string(&doc).unwrap(),
        )
        .unwrap();
    }
}

// ---------------------------------------------------------------------------
// Query commands
// ---------------------------------------------------------------------------

/// Summary counts only active records and reports volume per category.
#[test]
fn test_summary_json_excludes_tombstones() {
    let fx = Fixture::new();
    fx.write_standard_snapshot();

    let summary = run_json(fx.base(), &["summary", fx.root_arg(), "--format", "json"]);
    let groups = summary.as_array().expect("summary is an array");
    assert_eq!(groups.len(), 1, "only DOCUMENTATION is active: {summary}");
    assert_eq!(groups[0]["category"], "DOCUMENTATION");
    assert_eq!(groups[0]["count"], 3);
    assert_eq!(groups[0]["bytes"], 4 * MB);
    let mb = groups[0]["megabytes"].as_f64().unwrap();
    assert_eq!(format!("{mb:.2}"), "4.00");
}

/// A corrupt snapshot is treated as an empty model, not an error.
#[test]
fn test_corrupt_snapshot_reads_as_empty() {
    let fx = Fixture::new();
    std::fs::write(fx.base().join("twin_snapshot.json"), "{ not json").unwrap();

    let summary = run_json(fx.base(), &["summary", fx.root_arg(), "--format", "json"]);
    assert_eq!(summary, serde_json::json!([]));
    let size = run_json(fx.base(), &["size", fx.root_arg(), "--format", "json"]);
    assert_eq!(size["total_bytes"], 0);
}

/// Missing snapshot: every query returns an empty result set.
#[test]
fn test_missing_state_gives_empty_results() {
    let fx = Fixture::new();
    for cmd in ["health", "archive", "quarantine", "logs"] {
        let value = run_json(fx.base(), &[cmd, fx.root_arg(), "--format", "json"]);
        assert_eq!(value, serde_json::json!([]), "{cmd}");
    }
}

#[test]
fn test_archive_lists_tombstones() {
    let fx = Fixture::new();
    fx.write_standard_snapshot();

    let archive = run_json(fx.base(), &["archive", fx.root_arg(), "--format", "json"]);
    let items = archive.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "old.py");
    assert_eq!(items[0]["isDeleted"], true);
}

#[test]
fn test_search_is_case_insensitive() {
    let fx = Fixture::new();
    fx.write_standard_snapshot();

    let hits = run_json(fx.base(), &["search", "OLD", fx.root_arg(), "--format", "json"]);
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["category"], "SOURCE_CODE");

    let compact = run_success(fx.base(), &["search", "zzz", fx.root_arg()]);
    assert!(compact.contains("0 records"), "{compact}");
}

/// Health reports active records whose file is absent on disk.
#[test]
fn test_health_reports_missing_files() {
    let fx = Fixture::new();
    fx.write_standard_snapshot();
    std::fs::write(fx.root.join("a.pdf"), b"present").unwrap();

    let missing = run_json(fx.base(), &["health", fx.root_arg(), "--format", "json"]);
    let mut names: Vec<&str> = missing
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["b.docx", "c.txt"]);
}

#[test]
fn test_logs_tail_and_quarantine_listing() {
    let fx = Fixture::new();
    let log: String = (0..5)
        .map(|i| format!("[2024-05-01 12:00:0{i}] [CREATED] [ID:0000000{i}] f{i}\n"))
        .collect();
    std::fs::write(fx.base().join("system_events.log"), log).unwrap();

    let qdir = fx.base().join("Security_Quarantine");
    std::fs::create_dir_all(&qdir).unwrap();
    std::fs::write(qdir.join("20240501_120000_virus.exe.restricted"), b"MZ").unwrap();

    let tail = run_json(fx.base(), &["logs", fx.root_arg(), "-n", "2", "--format", "json"]);
    let tail = tail.as_array().unwrap();
    assert_eq!(tail.len(), 2);
    assert!(tail[1].as_str().unwrap().ends_with("f4"));

    let listing = run_json(fx.base(), &["quarantine", fx.root_arg(), "--format", "json"]);
    assert_eq!(
        listing,
        serde_json::json!(["20240501_120000_virus.exe.restricted"])
    );
}

/// The config file can move the snapshot anywhere.
#[test]
fn test_config_overrides_snapshot_location() {
    let fx = Fixture::new();
    fx.write_standard_snapshot();
    let moved = fx.base().join("elsewhere.json");
    std::fs::rename(fx.base().join("twin_snapshot.json"), &moved).unwrap();
    let config = fx.base().join("custom.toml");
    std::fs::write(
        &config,
        format!("snapshot_file = {:?}\n", moved.to_str().unwrap()),
    )
    .unwrap();

    let summary = run_json(
        fx.base(),
        &[
            "--config",
            config.to_str().unwrap(),
            "summary",
            fx.root_arg(),
            "--format",
            "json",
        ],
    );
    assert_eq!(summary[0]["count"], 3);
}

// ---------------------------------------------------------------------------
// Host commands
// ---------------------------------------------------------------------------

#[test]
fn test_report_is_exported_next_to_root() {
    let fx = Fixture::new();
    fx.write_standard_snapshot();

    let stdout = run_success(fx.base(), &["report", fx.root_arg()]);
    let path = PathBuf::from(stdout.trim());
    assert!(path.starts_with(fx.root.parent().unwrap()), "{}", path.display());

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["active_inventory"].as_array().unwrap().len(), 3);
}

#[test]
fn test_touch_creates_sized_file() {
    let fx = Fixture::new();
    run_success(fx.base(), &["touch", fx.root_arg(), "report.pdf", "--size-mb", "2"]);
    let meta = std::fs::metadata(fx.root.join("report.pdf")).unwrap();
    assert_eq!(meta.len(), 2 * MB);

    run_failure(fx.base(), &["touch", fx.root_arg(), "../escape.txt"]);
    assert!(!fx.base().join("escape.txt").exists());
}
