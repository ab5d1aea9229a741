//! Integration tests for the command-line host.
//!
//! These tests parse full command lines through the registry, covering:
//! 1. Settings resolution from `--config` files and `--log-level`
//! 2. Dispatch of every built-in command

use formwork_cli::{default_registry, load_settings, CommandStatus};
use formwork_core::FormworkError;

fn execute(args: &[&str]) -> (CommandStatus, String) {
    let registry = default_registry();
    let matches = registry
        .build_cli()
        .try_get_matches_from(std::iter::once("formwork").chain(args.iter().copied()))
        .unwrap();
    let settings = load_settings(&matches).unwrap();
    let mut out = Vec::new();
    let status = registry.execute(&matches, &settings, &mut out).unwrap();
    (status, String::from_utf8(out).unwrap())
}

// ============================================================================
// 1. Settings
// ============================================================================

#[test]
fn test_toml_config_and_log_level() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("formwork.toml");
    std::fs::write(&path, "debug = false\npretty_output = true\nlog_level = \"warn\"\n").unwrap();

    let registry = default_registry();
    let matches = registry
        .build_cli()
        .try_get_matches_from([
            "formwork",
            "--config",
            path.to_str().unwrap(),
            "forms",
            "--log-level",
            "trace",
        ])
        .unwrap();
    let settings = load_settings(&matches).unwrap();
    assert!(settings.pretty_output);
    assert!(!settings.debug);
    assert_eq!(settings.log_level, "trace");
}

#[test]
fn test_json_config_selects_default_form() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("formwork.json");
    std::fs::write(&path, r#"{"default_form": "basic2"}"#).unwrap();

    let (status, out) = execute(&["--config", path.to_str().unwrap(), "schema"]);
    assert_eq!(status, CommandStatus::Success);
    assert!(out.starts_with("companyIndustry  list  max 2"), "{out}");
}

#[test]
fn test_missing_config_is_a_configuration_error() {
    let registry = default_registry();
    let matches = registry
        .build_cli()
        .try_get_matches_from(["formwork", "--config", "/nonexistent/formwork.toml", "forms"])
        .unwrap();
    let err = load_settings(&matches).unwrap_err();
    assert!(matches!(err, FormworkError::ConfigurationError(_)));
    assert_eq!(err.exit_code(), 78);
}

// ============================================================================
// 2. Dispatch
// ============================================================================

#[test]
fn test_forms_lists_demos() {
    let (status, out) = execute(&["forms"]);
    assert_eq!(status, CommandStatus::Success);
    assert_eq!(out.lines().count(), 3);
}

#[test]
fn test_submit_password_mismatch() {
    let (status, out) = execute(&[
        "submit",
        "signup",
        "--set",
        "password=secret1",
        "--set",
        "passwordConfirm=secret2",
        "--set",
        "age=30",
        "--set",
        "representatives.0.name=lee",
    ]);
    assert_eq!(status, CommandStatus::Failure);
    let json: serde_json::Value = serde_json::from_str(out.trim_start_matches("error ")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"passwordConfirm": "비밀번호가 일치하지 않습니다."})
    );
}

#[test]
fn test_submit_kept_first_representative_survives_remove() {
    let (status, out) = execute(&[
        "submit",
        "signup",
        "--remove",
        "representatives=0",
        "--set",
        "password=secret1",
        "--set",
        "passwordConfirm=secret1",
        "--set",
        "age=30",
        "--set",
        "representatives.0.name=lee",
    ]);
    assert_eq!(status, CommandStatus::Success, "{out}");
    assert!(out.starts_with("success "));
}

#[test]
fn test_unknown_form_rejected_by_parser() {
    let registry = default_registry();
    let result = registry
        .build_cli()
        .try_get_matches_from(["formwork", "submit", "contact"]);
    assert!(result.is_err());
}
