/// End-to-end tests for config file loading and CLI option merging.
///
/// These tests copy a graph snapshot into a temporary directory, place a
/// config file next to it and run the binary with `assert_cmd`.
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Copy the conflicting graph fixture into `dir` and return its path.
fn create_test_graph(dir: &Path) -> PathBuf {
    let graph = dir.join("graph.json");
    fs::copy(fixtures_path().join("conflicting-graph.json"), &graph).unwrap();
    graph
}

/// Write a config file at the specified path.
fn write_config(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

// ============================================================================
// Config File Auto-Discovery Tests
// ============================================================================

mod auto_discovery_tests {
    use super::*;

    #[test]
    fn test_auto_discovery_applies_fail_setting() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        write_config(
            &dir.path().join("dvc.config.yml"),
            "direct_conflicts_fail_build: true\n",
        );

        cargo_bin_cmd!("dvc")
            .args(["check", "-g"])
            .arg(&graph)
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "Version conflict in direct dependencies detected!",
            ));
    }

    #[test]
    fn test_auto_discovery_applies_format() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        write_config(&dir.path().join("dvc.config.yml"), "format: json\n");

        let output = cargo_bin_cmd!("dvc")
            .args(["check", "-g"])
            .arg(&graph)
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["entries"][0]["name"], "org.example:commons");
    }

    #[test]
    fn test_auto_discovery_applies_exclusion() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        write_config(
            &dir.path().join("dvc.config.yml"),
            r#"
conflicts_fail_build: true
exclusions:
  - dependency: "org.example:*"
    expected: "2.1"
    resolved: "2.0"
"#,
        );

        cargo_bin_cmd!("dvc")
            .args(["check", "--no-color", "-g"])
            .arg(&graph)
            .assert()
            .success()
            .stdout(predicate::str::contains("org.example:commons").not());
    }

    #[test]
    fn test_auto_discovery_applies_resolver_strategy() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        write_config(
            &dir.path().join("dvc.config.yml"),
            r#"
resolvers:
  - strategy: single-digit
    includes:
      - "org.example:commons"
"#,
        );

        // 2.0 satisfies 2.1 when only the major version matters
        cargo_bin_cmd!("dvc")
            .args(["check", "--no-color", "--fail-on-conflict", "-g"])
            .arg(&graph)
            .assert()
            .success();
    }

    #[test]
    fn test_no_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());

        cargo_bin_cmd!("dvc")
            .args(["check", "--no-color", "-g"])
            .arg(&graph)
            .assert()
            .success()
            .stdout(predicate::str::contains("for 'test' scope"));
    }
}

// ============================================================================
// Explicit Config Path Tests
// ============================================================================

mod explicit_config_tests {
    use super::*;

    #[test]
    fn test_explicit_config_path() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        let config_dir = TempDir::new().unwrap();
        let config_path = config_dir.path().join("custom.yml");
        write_config(&config_path, "conflicts_fail_build: true\n");

        cargo_bin_cmd!("dvc")
            .args(["check", "-g"])
            .arg(&graph)
            .arg("--config")
            .arg(&config_path)
            .assert()
            .code(1);
    }

    #[test]
    fn test_explicit_config_wins_over_discovered() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        write_config(
            &dir.path().join("dvc.config.yml"),
            "conflicts_fail_build: true\n",
        );
        let config_dir = TempDir::new().unwrap();
        let config_path = config_dir.path().join("custom.yml");
        write_config(&config_path, "scope: compile\n");

        cargo_bin_cmd!("dvc")
            .args(["check", "-g"])
            .arg(&graph)
            .arg("-c")
            .arg(&config_path)
            .assert()
            .success();
    }

    #[test]
    fn test_explicit_config_missing() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());

        cargo_bin_cmd!("dvc")
            .args(["check", "-g"])
            .arg(&graph)
            .args(["--config", "/nonexistent/dvc.config.yml"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to read config file"));
    }
}

// ============================================================================
// CLI Override Tests
// ============================================================================

mod cli_override_tests {
    use super::*;

    #[test]
    fn test_cli_format_overrides_config() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        write_config(&dir.path().join("dvc.config.yml"), "format: json\n");

        cargo_bin_cmd!("dvc")
            .args(["--format", "text", "--no-color", "check", "-g"])
            .arg(&graph)
            .assert()
            .success()
            .stdout(predicate::str::contains("expected by"))
            .stdout(predicate::str::starts_with("{").not());
    }

    #[test]
    fn test_cli_scope_overrides_config() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        write_config(&dir.path().join("dvc.config.yml"), "scope: compile\n");

        cargo_bin_cmd!("dvc")
            .args(["list", "--no-color", "--scope", "test", "-g"])
            .arg(&graph)
            .assert()
            .success()
            .stdout(predicate::str::contains("junit:junit"));
    }

    #[test]
    fn test_config_scope_applies_without_flag() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        write_config(&dir.path().join("dvc.config.yml"), "scope: compile\n");

        cargo_bin_cmd!("dvc")
            .args(["list", "--no-color", "-g"])
            .arg(&graph)
            .assert()
            .success()
            .stdout(predicate::str::contains("junit:junit").not());
    }

    #[test]
    fn test_cli_skip_overrides_fail_setting() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        write_config(
            &dir.path().join("dvc.config.yml"),
            "conflicts_fail_build: true\n",
        );

        cargo_bin_cmd!("dvc")
            .args(["check", "--skip", "-g"])
            .arg(&graph)
            .assert()
            .success();
    }
}

// ============================================================================
// Invalid Config Tests
// ============================================================================

mod invalid_config_tests {
    use super::*;

    #[test]
    fn test_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        write_config(
            &dir.path().join("dvc.config.yml"),
            "invalid: yaml: [[[broken",
        );

        cargo_bin_cmd!("dvc")
            .args(["check", "-g"])
            .arg(&graph)
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to parse config file"));
    }

    #[test]
    fn test_invalid_scope_in_config() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        write_config(&dir.path().join("dvc.config.yml"), "scope: provided\n");

        cargo_bin_cmd!("dvc")
            .args(["check", "-g"])
            .arg(&graph)
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Scope 'provided' is invalid"));
    }

    #[test]
    fn test_unknown_strategy_in_config() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        write_config(&dir.path().join("dvc.config.yml"), "default_strategy: nope\n");

        cargo_bin_cmd!("dvc")
            .args(["check", "-g"])
            .arg(&graph)
            .assert()
            .code(3)
            .stderr(predicate::str::contains(
                "Could not locate default version strategy 'nope'",
            ));
    }

    #[test]
    fn test_unknown_field_warns() {
        let dir = TempDir::new().unwrap();
        let graph = create_test_graph(dir.path());
        write_config(
            &dir.path().join("dvc.config.yml"),
            "check_licenses: true\n",
        );

        cargo_bin_cmd!("dvc")
            .args(["check", "-g"])
            .arg(&graph)
            .assert()
            .success()
            .stderr(predicate::str::contains(
                "Unknown config field 'check_licenses' will be ignored",
            ));
    }
}
