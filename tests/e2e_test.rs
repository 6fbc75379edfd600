/// End-to-end tests for the CLI
///
/// The binary runs against a mock directory API in an empty working
/// directory, so no stray config file or token leaks into a test.
mod test_utilities;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use test_utilities::fixtures::*;
use wiremock::MockServer;

/// Command isolated from the caller's environment
fn audit_cmd(workdir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("appreg-audit");
    cmd.current_dir(workdir.path())
        .env_remove("APPREG_AUDIT_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn endpoint_args(server: &MockServer) -> Vec<String> {
    vec![
        "--token".to_string(),
        "e2e-token".to_string(),
        "--endpoint".to_string(),
        format!("{}/v1.0", server.uri()),
        "--secondary-endpoint".to_string(),
        format!("{}/beta", server.uri()),
    ]
}

// Exit code tests for CLI
mod exit_code_tests {
    use super::*;

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("appreg-audit")
            .arg("--help")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("--fail-on-findings"));
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("appreg-audit")
            .arg("--version")
            .assert()
            .code(0)
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        cargo_bin_cmd!("appreg-audit")
            .arg("--invalid-option")
            .assert()
            .code(2);
    }

    /// Exit code 2: Invalid format value
    #[test]
    fn test_exit_code_invalid_format() {
        cargo_bin_cmd!("appreg-audit")
            .args(["-f", "invalid_format"])
            .assert()
            .code(2);
    }

    /// Exit code 3: no token anywhere
    #[test]
    fn test_exit_code_missing_token() {
        let workdir = TempDir::new().unwrap();
        audit_cmd(&workdir)
            .assert()
            .code(3)
            .stderr(predicate::str::contains("No bearer token was supplied"));
    }

    /// Exit code 3: token would be sent over plain http to a remote host
    #[test]
    fn test_exit_code_insecure_endpoint() {
        let workdir = TempDir::new().unwrap();
        audit_cmd(&workdir)
            .args(["--token", "t", "--endpoint", "http://graph.example.com/v1.0"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("plain http"));
    }

    /// Exit code 1: findings with --fail-on-findings
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_exit_code_findings_detected() {
        let server = MockServer::start().await;
        mount_directory(&server, vec![risky_application()]).await;
        let workdir = TempDir::new().unwrap();

        audit_cmd(&workdir)
            .args(endpoint_args(&server))
            .arg("--fail-on-findings")
            .assert()
            .code(1);
    }

    /// Exit code 0: findings without --fail-on-findings
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_exit_code_findings_not_fatal_by_default() {
        let server = MockServer::start().await;
        mount_directory(&server, vec![risky_application()]).await;
        let workdir = TempDir::new().unwrap();

        audit_cmd(&workdir)
            .args(endpoint_args(&server))
            .assert()
            .code(0);
    }

    /// Exit code 0: clean directory with --fail-on-findings
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_exit_code_clean_scan() {
        let server = MockServer::start().await;
        mount_directory(&server, vec![clean_application()]).await;
        let workdir = TempDir::new().unwrap();

        audit_cmd(&workdir)
            .args(endpoint_args(&server))
            .arg("--fail-on-findings")
            .assert()
            .code(0);
    }
}

mod output_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_json_report_on_stdout() {
        let server = MockServer::start().await;
        mount_directory(&server, vec![clean_application(), risky_application()]).await;
        let workdir = TempDir::new().unwrap();

        let output = audit_cmd(&workdir)
            .args(endpoint_args(&server))
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["summary"]["total_applications"], 2);
        assert_eq!(report["summary"]["enumeration_strategy"], "bulk_fetch");
        assert_eq!(report["records"][0]["display_name"], "Contoso Legacy Portal");
        assert_eq!(report["records"][0]["raw"]["appId"], "app-risky");

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Generating JSON report"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_markdown_report_to_file() {
        let server = MockServer::start().await;
        mount_directory(&server, vec![risky_application()]).await;
        let workdir = TempDir::new().unwrap();
        let report_path = workdir.path().join("audit.md");

        audit_cmd(&workdir)
            .args(endpoint_args(&server))
            .args(["--format", "markdown", "-o"])
            .arg(&report_path)
            .assert()
            .code(0)
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&report_path).unwrap();
        assert!(content.starts_with("# Application Registration Audit"));
        assert!(content.contains("Contoso Legacy Portal"));
        assert!(content.contains("High-risk permissions: Microsoft Graph:Directory.ReadWrite.All"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_filter_with_no_match_warns() {
        let server = MockServer::start().await;
        mount_directory(&server, vec![clean_application()]).await;
        let workdir = TempDir::new().unwrap();

        audit_cmd(&workdir)
            .args(endpoint_args(&server))
            .args(["--filter", "Fabrikam"])
            .assert()
            .code(0)
            .stderr(predicate::str::contains("matched the prefix 'Fabrikam'"));
    }
}

mod config_file_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_discovered_config_selects_format_and_endpoints() {
        let server = MockServer::start().await;
        mount_directory(&server, vec![clean_application()]).await;
        let workdir = TempDir::new().unwrap();
        fs::write(
            workdir.path().join("appreg-audit.config.yml"),
            format!(
                "format: markdown\nendpoint: {uri}/v1.0\nsecondary_endpoint: {uri}/beta\n",
                uri = server.uri()
            ),
        )
        .unwrap();

        audit_cmd(&workdir)
            .args(["--token", "t"])
            .assert()
            .code(0)
            .stdout(predicate::str::starts_with("# Application Registration Audit"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cli_format_overrides_config() {
        let server = MockServer::start().await;
        mount_directory(&server, vec![clean_application()]).await;
        let workdir = TempDir::new().unwrap();
        fs::write(
            workdir.path().join("appreg-audit.config.yml"),
            "format: markdown\n",
        )
        .unwrap();

        audit_cmd(&workdir)
            .args(endpoint_args(&server))
            .args(["-f", "json"])
            .assert()
            .code(0)
            .stdout(predicate::str::starts_with("{"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_custom_policy_from_explicit_config() {
        let server = MockServer::start().await;
        mount_directory(&server, vec![clean_application()]).await;
        let workdir = TempDir::new().unwrap();
        let config_path = workdir.path().join("policy.yml");
        fs::write(
            &config_path,
            "high_risk_permissions:\n  - User.Read\nunexpected_key: 1\n",
        )
        .unwrap();

        let output = audit_cmd(&workdir)
            .args(endpoint_args(&server))
            .arg("--config")
            .arg(&config_path)
            .arg("--fail-on-findings")
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["summary"]["policy_version"], "custom");
        assert!(String::from_utf8_lossy(&output.stderr).contains("unexpected_key"));
    }

    #[test]
    fn test_invalid_config_is_application_error() {
        let workdir = TempDir::new().unwrap();
        fs::write(
            workdir.path().join("appreg-audit.config.yml"),
            "max_concurrent_lookups: 0\n",
        )
        .unwrap();

        audit_cmd(&workdir)
            .args(["--token", "t"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("max_concurrent_lookups"));
    }

    #[test]
    fn test_missing_explicit_config_is_application_error() {
        let workdir = TempDir::new().unwrap();
        audit_cmd(&workdir)
            .args(["--token", "t", "--config", "does-not-exist.yml"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to read config file"));
    }
}
