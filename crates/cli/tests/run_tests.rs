// End-to-end tests for `tallyrec run` and `tallyrec validate`.
//
// Run with: cargo test -p tallyrec-cli --test run_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const LEDGER: &str = "\
id,date,amount,description
T1,2024-01-05,100.00,Office rent
T2,2024-01-06,4.50,Coffee beans
";

fn tallyrec() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tallyrec"));
    cmd.env_remove("TALLYREC_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    tallyrec().args(args).output().expect("spawn tallyrec")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout must be JSON: {e}\nstdout:\n{stdout}"))
}

fn p(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn identical_files_reconcile() {
    let dir = tempfile::tempdir().unwrap();
    let left = write(dir.path(), "left.csv", LEDGER);
    let right = write(dir.path(), "right.csv", LEDGER);

    let output = run(&["run", p(&left), p(&right), "--json", "--quiet"]);
    assert_eq!(output.status.code(), Some(0),
        "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report = stdout_json(&output);
    assert_eq!(report["summary"]["match_rate"].as_f64(), Some(100.0));
    assert_eq!(report["summary"]["total_matches"].as_u64(), Some(2));
    assert_eq!(report["matches"].as_array().unwrap().len(), 2);
    assert!(report["meta"]["run_at"].is_string());
    assert_eq!(report["meta"]["left_file"].as_str(), Some(p(&left)));
    assert_eq!(report["meta"]["config"]["thresholds"]["pairing"].as_f64(), Some(0.8));
}

#[test]
fn amount_difference_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let left = write(dir.path(), "left.csv", LEDGER);
    let right = write(dir.path(), "right.csv", "\
id,date,amount,description
T1,2024-01-05,100.00,Office rent
T2,2024-01-06,45.00,Coffee beans
");

    let output = run(&["run", p(&left), p(&right), "--json"]);
    assert_eq!(output.status.code(), Some(1));

    let report = stdout_json(&output);
    let mismatches = report["mismatches"].as_array().unwrap();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0]["differences"][0]["field"].as_str(), Some("amount"));
    assert!(report["missing_in_dataset1"].as_array().unwrap().is_empty());
    assert!(report["missing_in_dataset2"].as_array().unwrap().is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("mismatched:"), "stderr: {stderr}");
    assert!(!stderr.contains("error:"), "differences are not an error: {stderr}");
}

#[test]
fn extra_right_record_is_missing_in_dataset1() {
    let dir = tempfile::tempdir().unwrap();
    let left = write(dir.path(), "left.csv", LEDGER);
    let right = write(
        dir.path(),
        "right.csv",
        &format!("{LEDGER}T3,2024-02-01,999.99,Consulting retainer\n"),
    );

    let output = run(&["run", p(&left), p(&right), "--json", "--quiet"]);
    assert_eq!(output.status.code(), Some(1));

    let report = stdout_json(&output);
    let missing = report["missing_in_dataset1"].as_array().unwrap();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0]["id"].as_str(), Some("T3"));
    assert_eq!(report["summary"]["total_missing_in1"].as_u64(), Some(1));
    assert_eq!(report["summary"]["match_rate"].as_f64(), Some(100.0));
}

#[test]
fn output_file_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let left = write(dir.path(), "left.csv", LEDGER);
    let right = write(dir.path(), "right.csv", LEDGER);
    let report_path = dir.path().join("report.json");

    let output = run(&["run", p(&left), p(&right), "--output", p(&report_path), "--quiet"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty(), "no --json, nothing on stdout");

    let written = std::fs::read_to_string(&report_path).unwrap();
    let report: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(report["summary"]["total_records1"].as_u64(), Some(2));
}

#[test]
fn unsupported_extension_exits_four() {
    let dir = tempfile::tempdir().unwrap();
    let left = write(dir.path(), "statement.pdf", "%PDF-1.4");
    let right = write(dir.path(), "right.csv", LEDGER);

    let output = run(&["run", p(&left), p(&right)]);
    assert_eq!(output.status.code(), Some(4));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
    assert!(stderr.contains("hint:"), "stderr: {stderr}");
}

#[test]
fn header_only_file_exits_four() {
    let dir = tempfile::tempdir().unwrap();
    let left = write(dir.path(), "left.csv", "id,amount\n");
    let right = write(dir.path(), "right.csv", LEDGER);

    let output = run(&["run", p(&left), p(&right)]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn out_of_range_config_exits_three() {
    let dir = tempfile::tempdir().unwrap();
    let left = write(dir.path(), "left.csv", LEDGER);
    let right = write(dir.path(), "right.csv", LEDGER);
    let config = write(dir.path(), "recon.toml", "[thresholds]\npairing = 1.5\n");

    let output = run(&["run", p(&left), p(&right), "--config", p(&config)]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("thresholds.pairing"));
}

#[test]
fn out_of_range_flag_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let left = write(dir.path(), "left.csv", LEDGER);
    let right = write(dir.path(), "right.csv", LEDGER);

    let output = run(&["run", p(&left), p(&right), "--field-threshold", "2"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn validate_accepts_good_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "recon.toml",
        "name = \"bank vs ledger\"\n\n[thresholds]\nfield_match = 0.95\npairing = 0.85\n",
    );

    let output = run(&["validate", p(&config)]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ok"), "stdout: {stdout}");
    assert!(stdout.contains("0.85"), "stdout: {stdout}");
}

#[test]
fn validate_rejects_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "recon.toml", "[thresholds]\nparing = 0.85\n");

    let output = run(&["validate", p(&config)]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn missing_config_file_exits_three() {
    let output = run(&["validate", "/nonexistent/tallyrec/recon.toml"]);
    assert_eq!(output.status.code(), Some(3));
}
