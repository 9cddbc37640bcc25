//! End-to-end CLI integration tests over the Terraform fixtures in `tests/fixtures/`.
//!
//! Each test runs `ociguard check` against one fixture directory and verifies the exit code
//! (0 = pass, 1 = runtime error or rule fault, 2 = fail) and the JSON report.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn ociguard_cmd() -> Command {
    Command::cargo_bin("ociguard").expect("ociguard binary not found - run `cargo build` first")
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("ociguard-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

fn read_json(path: &Path) -> Value {
    let content = std::fs::read_to_string(path).expect("read report");
    serde_json::from_str(&content).expect("parse report JSON")
}

/// Run `check` against a fixture and return the exit code, stdout, and JSON report.
fn run_check_on_fixture(fixture_name: &str) -> (i32, String, Value) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("report.json");

    let output = ociguard_cmd()
        .arg("--root")
        .arg(fixtures_dir().join(fixture_name))
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .output()
        .expect("run command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    (exit_code, stdout, read_json(&report_path))
}

fn findings(report: &Value) -> &Vec<Value> {
    report["findings"].as_array().expect("findings array")
}

#[test]
fn fixture_clean_passes() {
    let (exit_code, stdout, report) = run_check_on_fixture("clean");

    assert_eq!(exit_code, 0, "clean fixture should exit with 0");
    assert_eq!(report["schema"], "ociguard.report.v1");
    assert_eq!(report["tool"]["name"], "ociguard");
    assert_eq!(report["verdict"], "pass");
    assert!(findings(&report).is_empty());
    assert!(report["faults"].as_array().expect("faults").is_empty());
    assert_eq!(report["data"]["files_scanned"], 1);
    assert_eq!(report["data"]["rules_run"], 6);
    assert!(stdout.is_empty());
}

#[test]
fn fixture_monitoring_disabled_fails_on_the_attribute() {
    let (exit_code, stdout, report) = run_check_on_fixture("monitoring_disabled");

    assert_eq!(exit_code, 2);
    assert_eq!(report["verdict"], "fail");
    let findings = findings(&report);
    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding["rule_id"], "oci_compute_instance_monitoring");
    assert_eq!(finding["code"], "noncompliant_value");
    assert_eq!(finding["severity"], "error");
    assert_eq!(
        finding["message"],
        "OCI Compute Instance 'oci_core_instance' does not have monitoring enabled"
    );
    assert_eq!(finding["range"]["filename"], "main.tf");
    assert_eq!(finding["range"]["start"]["line"], 7);
    assert_eq!(finding["range"]["start"]["column"], 30);
    assert_eq!(finding["range"]["end"]["column"], 34);
    assert!(finding["fingerprint"].as_str().is_some_and(|f| f.len() == 64));

    assert_eq!(
        stdout,
        "main.tf:7:30: error: OCI Compute Instance 'oci_core_instance' does not have monitoring enabled (oci_compute_instance_monitoring)\n"
    );
}

#[test]
fn fixture_public_bucket_fails() {
    let (exit_code, _, report) = run_check_on_fixture("public_bucket");

    assert_eq!(exit_code, 2);
    let findings = findings(&report);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["rule_id"], "oci_object_storage_bucket_public_access");
    assert_eq!(
        findings[0]["message"],
        "OCI Object Storage Bucket 'oci_objectstorage_bucket' is publicly accessible"
    );
    assert_eq!(findings[0]["range"]["start"]["line"], 3);
    assert_eq!(findings[0]["range"]["start"]["column"], 17);
    assert_eq!(findings[0]["range"]["end"]["column"], 29);
}

#[test]
fn fixture_ssh_open_anchors_on_the_rule_block() {
    let (exit_code, _, report) = run_check_on_fixture("ssh_open");

    assert_eq!(exit_code, 2);
    let findings = findings(&report);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["code"], "ssh_open_to_world");
    assert_eq!(
        findings[0]["message"],
        "OCI Security Group rule 'oci_core_network_security_group_security_rule' allows unrestricted ingress access to port 22"
    );
    assert_eq!(findings[0]["range"]["start"]["line"], 1);
    assert_eq!(findings[0]["range"]["start"]["column"], 1);
    assert_eq!(findings[0]["range"]["end"]["line"], 1);
}

#[test]
fn fixture_hardcoded_key_fails() {
    let (exit_code, _, report) = run_check_on_fixture("hardcoded_key");

    assert_eq!(exit_code, 2);
    let findings = findings(&report);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["rule_id"], "oci_provider_hardcoded_keys");
    assert_eq!(
        findings[0]["message"],
        "OCI provider has hard-coded private key password"
    );
    assert_eq!(findings[0]["range"]["filename"], "provider.tf");
    assert_eq!(findings[0]["range"]["start"]["line"], 3);
    assert_eq!(findings[0]["range"]["start"]["column"], 26);
    assert_eq!(findings[0]["range"]["end"]["column"], 35);
}

#[test]
fn fixture_unresolved_variable_is_a_rule_fault() {
    let (exit_code, stdout, report) = run_check_on_fixture("unresolved_variable");

    assert_eq!(exit_code, 1, "rule faults exit like runtime errors");
    assert_eq!(report["verdict"], "fail");
    assert!(findings(&report).is_empty());
    let faults = report["faults"].as_array().expect("faults");
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0]["rule_id"], "oci_object_storage_bucket_public_access");
    assert_eq!(faults[0]["file"], "main.tf");
    assert_eq!(faults[0]["range"]["start"]["line"], 6);
    assert!(stdout.contains("main.tf:6:17: fault: "));
}

#[test]
fn fixture_multi_module_applies_config() {
    let (exit_code, _, report) = run_check_on_fixture("multi_module");

    assert_eq!(exit_code, 2);
    assert_eq!(report["data"]["files_scanned"], 2, "vendored/ is excluded");
    assert_eq!(report["data"]["modules_scanned"], 2);
    assert!(report["faults"].as_array().expect("faults").is_empty());

    // Module order first, then rule order within each document.
    let findings = findings(&report);
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0]["rule_id"], "oci_object_storage_bucket_versioning");
    assert_eq!(findings[0]["severity"], "warning");
    assert_eq!(findings[0]["range"]["filename"], "main.tf");
    assert_eq!(findings[0]["range"]["start"]["line"], 5);
    assert_eq!(findings[1]["rule_id"], "oci_network_security_group_ssh");
    assert_eq!(findings[1]["range"]["filename"], "network/main.tf");
}

#[test]
fn cli_var_overrides_config_variables() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("report.json");

    ociguard_cmd()
        .arg("--root")
        .arg(fixtures_dir().join("multi_module"))
        .args(["check", "--var", "access_type=ObjectRead", "--report-out"])
        .arg(&report_path)
        .assert()
        .code(2);

    let report = read_json(&report_path);
    let rule_ids: Vec<&str> = findings(&report)
        .iter()
        .filter_map(|f| f["rule_id"].as_str())
        .collect();
    assert_eq!(
        rule_ids,
        vec![
            "oci_object_storage_bucket_public_access",
            "oci_object_storage_bucket_versioning",
            "oci_network_security_group_ssh",
        ]
    );
}

#[test]
fn fixture_syntax_error_writes_runtime_error_report() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("report.json");

    ociguard_cmd()
        .arg("--root")
        .arg(fixtures_dir().join("syntax_error"))
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ociguard error:"));

    let report = read_json(&report_path);
    assert_eq!(report["verdict"], "fail");
    assert_eq!(findings(&report)[0]["rule_id"], "tool.runtime");
    assert_eq!(findings(&report)[0]["code"], "runtime_error");
}

#[test]
fn warn_profile_override_passes_with_warnings() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("report.json");

    ociguard_cmd()
        .arg("--root")
        .arg(fixtures_dir().join("public_bucket"))
        .args(["--profile", "warn", "check", "--report-out"])
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(": warning: "));

    let report = read_json(&report_path);
    assert_eq!(report["verdict"], "warn");
    assert_eq!(report["data"]["profile"], "warn");
}

#[test]
fn json_format_prints_the_report() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("report.json");

    let output = ociguard_cmd()
        .arg("--root")
        .arg(fixtures_dir().join("clean"))
        .args(["check", "--format", "json", "--report-out"])
        .arg(&report_path)
        .output()
        .expect("run command");

    assert!(output.status.success());
    let printed: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(printed["verdict"], "pass");
}

#[test]
fn markdown_and_annotations_render_from_report() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("report.json");
    let markdown_path = temp_dir.path().join("comment.md");

    ociguard_cmd()
        .arg("--root")
        .arg(fixtures_dir().join("hardcoded_key"))
        .args(["check", "--write-markdown", "--markdown-out"])
        .arg(&markdown_path)
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .code(2);

    let markdown = std::fs::read_to_string(&markdown_path).expect("read markdown");
    assert!(markdown.starts_with("# ociguard report"));
    assert!(markdown.contains("Verdict: **FAIL**"));

    ociguard_cmd()
        .args(["md", "--report"])
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("`oci_provider_hardcoded_keys` / `hardcoded_secret`"));

    ociguard_cmd()
        .args(["annotations", "--report"])
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "::error file=provider.tf,line=3,col=26,endLine=3,endColumn=35::[oci_provider_hardcoded_keys:hardcoded_secret]",
        ));
}

#[test]
fn explain_known_rule_prints_remediation() {
    ociguard_cmd()
        .args(["explain", "oci_network_security_group_ssh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remediation"))
        .stdout(predicate::str::contains("```hcl"));
}

#[test]
fn explain_unknown_identifier_fails() {
    ociguard_cmd()
        .args(["explain", "aws_s3_bucket_public"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown rule id or code"));
}

#[test]
fn rules_lists_effective_policy() {
    ociguard_cmd()
        .arg("--root")
        .arg(fixtures_dir().join("multi_module"))
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("oci_provider_hardcoded_keys"))
        .stdout(
            predicate::str::is_match(r"oci_object_storage_bucket_versioning\s+enabled\s+warning")
                .expect("regex"),
        );
}
