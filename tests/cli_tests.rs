//! End-to-end tests for the kubebuddy-report CLI against a fixture report.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const REPORT: &str = "tests/fixtures/report.json";

/// Command with colors off and an isolated config directory.
#[allow(deprecated)]
fn report_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kubebuddy-report").expect("binary builds");
    cmd.arg("--no-color")
        .arg("--config-dir")
        .arg(config_dir.path())
        .env("KUBEBUDDY_WIDTH", "160")
        .env_remove("RUST_LOG");
    cmd
}

fn config_dir() -> TempDir {
    TempDir::new().expect("temp config dir")
}

mod show {
    use super::*;

    #[test]
    fn test_show_first_tab_paginates_open_section() {
        let dir = config_dir();
        report_cmd(&dir)
            .arg("show")
            .arg(REPORT)
            .assert()
            .success()
            .stdout(predicate::str::contains("Cluster: aks-prod"))
            .stdout(predicate::str::contains("[Pods]"))
            .stdout(predicate::str::contains("Showing 1-10 of 12 records (Page 1/2)"))
            .stdout(predicate::str::contains("(←) [1] 2 → | 10 per page (10/25/50)"))
            .stdout(predicate::str::contains("⚠️ Failed to render Pod Restarts"));
    }

    #[test]
    fn test_show_section_second_page() {
        let dir = config_dir();
        report_cmd(&dir)
            .args(["show", REPORT, "--section", "podIssues", "--page", "2"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Showing 11-12 of 12 records (Page 2/2)"))
            .stdout(predicate::str::contains("pod-12"))
            .stdout(predicate::str::contains("pod-01").not());
    }

    #[test]
    fn test_show_sorted_by_severity() {
        let dir = config_dir();
        report_cmd(&dir)
            .args(["show", REPORT, "--section", "podIssues", "--sort", "2"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Severity ↑"));
    }

    #[test]
    fn test_show_page_size_outside_options_fails() {
        let dir = config_dir();
        report_cmd(&dir)
            .args(["show", REPORT, "--section", "podIssues", "--page-size", "7"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Page size 7"));
    }

    #[test]
    fn test_show_other_tab_expanded() {
        let dir = config_dir();
        report_cmd(&dir)
            .args(["show", REPORT, "--tab", "nodes", "--expand"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[Nodes]"))
            .stdout(predicate::str::contains("Hide Findings [nodeConditions]"))
            .stdout(predicate::str::contains("Showing all 3 records"));
    }

    #[test]
    fn test_unknown_section_reports_hint() {
        let dir = config_dir();
        report_cmd(&dir)
            .args(["show", REPORT, "--section", "missing"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Section 'missing' not found"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn test_unknown_tab_fails() {
        let dir = config_dir();
        report_cmd(&dir)
            .args(["show", REPORT, "--tab", "events"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Tab 'events' not found"));
    }

    #[test]
    fn test_invalid_report_file() {
        let dir = config_dir();
        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{\"cluster_name\": ").expect("write broken report");
        report_cmd(&dir)
            .arg("show")
            .arg(&broken)
            .assert()
            .failure()
            .stderr(predicate::str::contains("could not be read"));
    }
}

mod nodes {
    use super::*;

    #[test]
    fn test_nodes_paginate_at_card_threshold() {
        let dir = config_dir();
        report_cmd(&dir)
            .args(["nodes", REPORT])
            .assert()
            .success()
            .stdout(predicate::str::contains("Showing 1-5 of 7 records (Page 1/2)"))
            .stdout(predicate::str::contains("5 per page (5/10/25/50)"));
    }

    #[test]
    fn test_nodes_profile_filter_below_threshold() {
        let dir = config_dir();
        report_cmd(&dir)
            .args(["nodes", REPORT, "--profile", "Balanced"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Showing all 2 records"))
            .stdout(predicate::str::contains("aks-nodepool1-6").not());
    }

    #[test]
    fn test_nodes_text_filter_no_match() {
        let dir = config_dir();
        report_cmd(&dir)
            .args(["nodes", REPORT, "--filter", "does-not-exist"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No records found"));
    }
}

mod export {
    use super::*;

    #[test]
    fn test_export_section_to_csv() {
        let dir = config_dir();
        let out = TempDir::new().expect("temp output dir");
        report_cmd(&dir)
            .args(["export", REPORT, "--section", "podIssues", "--output-dir"])
            .arg(out.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Exported 12 rows"));

        let files: Vec<_> = fs::read_dir(out.path())
            .expect("read output dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with("kubebuddy_aks-prod_podissues_"));
        assert!(files[0].ends_with(".csv"));

        let content = fs::read_to_string(out.path().join(&files[0])).expect("read csv");
        assert_eq!(content.lines().count(), 13);
        assert!(content.starts_with("Namespace,Pod,Severity,Message"));
    }

    #[test]
    fn test_print_writes_every_row() {
        let dir = config_dir();
        let out = TempDir::new().expect("temp output dir");
        let target = out.path().join("kubebuddy_report.txt");
        report_cmd(&dir)
            .args(["print", REPORT, "--output"])
            .arg(&target)
            .assert()
            .success();

        let content = fs::read_to_string(&target).expect("read print output");
        assert!(content.contains("pod-11"));
        assert!(content.contains("pod-12"));
        assert!(content.contains("[nodeConditions]"));
        assert!(content.contains("aks-nodepool1-6"));
        assert!(!content.contains("per page"));
    }
}

mod config {
    use super::*;

    #[test]
    fn test_config_show_defaults() {
        let dir = config_dir();
        report_cmd(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("pagination.table_page_size = 10"))
            .stdout(predicate::str::contains("pagination.card_page_size_options = 5,10,25,50"))
            .stdout(predicate::str::contains("display.filter_debounce_ms = 300"));
    }

    #[test]
    fn test_config_set_persists_and_applies() {
        let dir = config_dir();
        report_cmd(&dir)
            .args(["config", "set", "pagination.card_page_size", "10"])
            .assert()
            .success();
        assert!(dir.path().join("config.toml").exists());

        report_cmd(&dir)
            .args(["nodes", REPORT])
            .assert()
            .success()
            .stdout(predicate::str::contains("Showing 1-7 of 7 records (Page 1/1)"));
    }

    #[test]
    #[allow(deprecated)]
    fn test_missing_config_dir_fails_with_hint() {
        let dir = config_dir();
        let missing = dir.path().join("absent");
        let mut cmd = Command::cargo_bin("kubebuddy-report").expect("binary builds");
        cmd.arg("--no-color")
            .arg("--config-dir")
            .arg(&missing)
            .env_remove("RUST_LOG")
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("does not exist"))
            .stderr(predicate::str::contains("omit --config-dir"));
    }

    #[test]
    fn test_config_set_rejects_unknown_key() {
        let dir = config_dir();
        report_cmd(&dir)
            .args(["config", "set", "display.theme", "dark"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown configuration key"));
    }
}

#[test]
fn test_browse_requires_terminal() {
    let dir = config_dir();
    report_cmd(&dir)
        .args(["browse", REPORT])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a terminal"));
}
