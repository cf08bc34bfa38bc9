//! Output hygiene for the CLI binary.
//!
//! Stdout must stay pipeable: human or JSON results only, never log lines.
//! Logs are JSON on stderr and only appear beyond `error` when -v is given.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

/// A working directory with no config files, so runs are hermetic.
/// HOME is pointed at the same directory to mask any real user config.
fn hermetic_home() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn orgsweep(home: &TempDir, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_orgsweep"))
        .args(args)
        .current_dir(home.path())
        .env("HOME", home.path())
        .output()
        .expect("failed to run orgsweep binary")
}

fn write_snapshot(home: &TempDir, contents: &str) -> String {
    let path = home.path().join("hierarchy.json");
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

const SMALL_SNAPSHOT: &str = r#"{
    "proxy": [{"name": "orders"}],
    "sharedflow": [],
    "apiproduct": [{"name": "gold"}, {"name": "silver"}],
    "environments": [{"name": "dev", "kvm": ["settings"]}]
}"#;

#[test]
fn test_no_args_shows_help_and_fails() {
    let home = hermetic_home();
    let output = orgsweep(&home, &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"));
    assert!(stderr.contains("clean"));
    assert!(stderr.contains("inspect"));
}

#[test]
fn test_inspect_prints_counts() {
    let home = hermetic_home();
    let snapshot = write_snapshot(&home, SMALL_SNAPSHOT);
    let output = orgsweep(&home, &["inspect", &snapshot]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("proxies:           1"));
    assert!(stdout.contains("api products:      2"));
    assert!(stdout.contains("environment kvms:  1"));
}

#[test]
fn test_inspect_stdout_is_pipeable() {
    let home = hermetic_home();
    let snapshot = write_snapshot(&home, SMALL_SNAPSHOT);
    let output = orgsweep(&home, &["inspect", &snapshot]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    // No structured log lines may leak into stdout
    assert!(!stdout.contains("\"level\""));
    assert!(!stdout.contains("\"timestamp\""));
}

#[test]
fn test_inspect_json_output_parses() {
    let home = hermetic_home();
    let snapshot = write_snapshot(&home, SMALL_SNAPSHOT);
    let output = orgsweep(&home, &["inspect", &snapshot, "--json"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["proxies"], 1);
    assert_eq!(parsed["api_products"], 2);
    assert_eq!(parsed["environments"], 1);
}

#[test]
fn test_default_mode_suppresses_info_logs() {
    let home = hermetic_home();
    let snapshot = write_snapshot(&home, SMALL_SNAPSHOT);
    let output = orgsweep(&home, &["inspect", &snapshot]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("\"level\":\"INFO\""));
}

#[test]
fn test_verbose_mode_emits_json_logs_on_stderr() {
    let home = hermetic_home();
    let snapshot = write_snapshot(&home, SMALL_SNAPSHOT);
    let output = orgsweep(&home, &["inspect", &snapshot, "-v"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"level\":\"INFO\""));
    assert!(stderr.contains("cli.inspect_started"));

    // Verbose logs still must not contaminate stdout
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("\"level\""));
}

#[test]
fn test_inspect_without_path_or_config_fails() {
    let home = hermetic_home();
    let output = orgsweep(&home, &["inspect"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--hierarchy") || stderr.contains("snapshot.input"));
}

#[test]
fn test_inspect_missing_file_fails() {
    let home = hermetic_home();
    let output = orgsweep(&home, &["inspect", "no-such-file.json"]);

    assert!(!output.status.success());
}

#[test]
fn test_clean_without_org_fails() {
    let home = hermetic_home();
    let snapshot = write_snapshot(&home, SMALL_SNAPSHOT);
    let output = orgsweep(&home, &["clean", "--hierarchy", &snapshot]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--org") || stderr.contains("api.organization"));
}

#[test]
fn test_clean_dry_run_leaves_input_snapshot_untouched() {
    // Dry-run deletes are suppressed at the client, so the swept state must
    // land in a preview file; overwriting the input snapshot would record
    // deletions that never happened.
    let home = hermetic_home();
    let snapshot = write_snapshot(&home, SMALL_SNAPSHOT);
    let output = orgsweep(
        &home,
        &[
            "clean",
            "-o",
            "acme",
            "--hierarchy",
            &snapshot,
            "--output",
            &snapshot,
            "--dry-run",
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(dry run)"));
    assert!(stdout.contains("hierarchy.dryrun.json"));

    let original = fs::read_to_string(&snapshot).unwrap();
    assert!(original.contains("orders"));
    assert!(home.path().join("hierarchy.dryrun.json").exists());
}

#[test]
fn test_inspect_reads_snapshot_from_config_file() {
    let home = hermetic_home();
    let snapshot = write_snapshot(&home, SMALL_SNAPSHOT);

    let config_dir = home.path().join(".orgsweep");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        format!("[snapshot]\ninput = \"{}\"\n", snapshot),
    )
    .unwrap();

    let output = orgsweep(&home, &["inspect"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("proxies:           1"));
}
