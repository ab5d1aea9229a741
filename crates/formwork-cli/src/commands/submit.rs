//! The `submit` command.
//!
//! Mounts a demo form, applies input and submits it, printing
//! `success <data>` or `error <errors>`.
//!
//! Input is applied in a fixed order: the `--data`/`--file` document
//! replaces the form's defaults at mount time, then every `--append`, then
//! every `--remove`, then every `--set`. Appending first lets `--set`
//! address the new elements.

use std::io::Write;
use std::path::Path;

use formwork_core::{FormworkError, FormworkResult, Settings};
use formwork_forms::{Form, SubmitPhase};
use formwork_schema::RawValue;

use crate::command::{CommandStatus, ManagementCommand};

use super::{form_argument, selected_form};

/// Submits a demo form from command-line input.
pub struct SubmitCommand;

/// Reads a JSON input document from `path`.
pub fn load_input_file(path: impl AsRef<Path>) -> FormworkResult<serde_json::Value> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "read input document");
    Ok(serde_json::from_str(&content)?)
}

/// Splits `path=value` at the first `=`.
pub fn split_assignment(arg: &str) -> FormworkResult<(&str, &str)> {
    arg.split_once('=').ok_or_else(|| {
        FormworkError::ConfigurationError(format!("Expected PATH=VALUE, got '{arg}'"))
    })
}

/// Parses `array=index`.
pub fn parse_removal(arg: &str) -> FormworkResult<(&str, usize)> {
    let (path, index) = arg.split_once('=').ok_or_else(|| {
        FormworkError::ConfigurationError(format!("Expected ARRAY=INDEX, got '{arg}'"))
    })?;
    let index = index.trim().parse().map_err(|_| {
        FormworkError::ConfigurationError(format!("Not an index: '{index}'"))
    })?;
    Ok((path, index))
}

fn many<'a>(matches: &'a clap::ArgMatches, id: &str) -> impl Iterator<Item = &'a str> {
    matches
        .get_many::<String>(id)
        .into_iter()
        .flatten()
        .map(String::as_str)
}

fn render<T: serde::Serialize>(value: &T, pretty: bool) -> FormworkResult<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

impl ManagementCommand for SubmitCommand {
    fn name(&self) -> &'static str {
        "submit"
    }

    fn help(&self) -> &'static str {
        "Fill in a demo form and submit it"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(form_argument())
            .arg(
                clap::Arg::new("data")
                    .long("data")
                    .value_name("JSON")
                    .conflicts_with("file")
                    .help("Input document replacing the form's defaults"),
            )
            .arg(
                clap::Arg::new("file")
                    .long("file")
                    .value_name("PATH")
                    .help("Read the input document from a JSON file"),
            )
            .arg(
                clap::Arg::new("append")
                    .long("append")
                    .value_name("ARRAY")
                    .action(clap::ArgAction::Append)
                    .help("Append a blank element to an array"),
            )
            .arg(
                clap::Arg::new("remove")
                    .long("remove")
                    .value_name("ARRAY=INDEX")
                    .action(clap::ArgAction::Append)
                    .help("Remove an array element by position"),
            )
            .arg(
                clap::Arg::new("set")
                    .long("set")
                    .value_name("PATH=VALUE")
                    .action(clap::ArgAction::Append)
                    .help("Set a field, e.g. companyIndustry.0.value=IT"),
            )
    }

    fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
        out: &mut dyn Write,
    ) -> FormworkResult<CommandStatus> {
        let demo = selected_form(matches, settings)?;

        let document = match (
            matches.get_one::<String>("data"),
            matches.get_one::<String>("file"),
        ) {
            (Some(data), _) => Some(serde_json::from_str::<serde_json::Value>(data)?),
            (None, Some(path)) => Some(load_input_file(path)?),
            (None, None) => None,
        };
        let mut form = match document {
            Some(doc) => Form::mount_with(demo, &RawValue::from(doc))?,
            None => Form::mount(demo)?,
        };

        for path in many(matches, "append") {
            form.append(path)?;
        }
        for arg in many(matches, "remove") {
            let (path, index) = parse_removal(arg)?;
            if !form.remove(path, index)? {
                tracing::warn!(path, index, "removal ignored");
            }
        }
        for arg in many(matches, "set") {
            let (path, value) = split_assignment(arg)?;
            form.set_value(path, value)?;
        }

        let mut data = None;
        let mut errors = None;
        let phase = form.handle_submit(|v| data = Some(v), |e| errors = Some(e.messages()))?;

        match phase {
            SubmitPhase::Submitted => {
                let data = data.unwrap_or_default();
                writeln!(out, "success {}", render(&data, settings.pretty_output)?)?;
                Ok(CommandStatus::Success)
            }
            _ => {
                let errors = errors.unwrap_or_default();
                writeln!(out, "error {}", render(&errors, settings.pretty_output)?)?;
                Ok(CommandStatus::Failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> FormworkResult<(CommandStatus, String)> {
        let cmd = SubmitCommand.add_arguments(clap::Command::new("submit"));
        let matches = cmd
            .try_get_matches_from(std::iter::once("submit").chain(args.iter().copied()))
            .unwrap();
        let mut out = Vec::new();
        let status = SubmitCommand.handle(&matches, &Settings::default(), &mut out)?;
        Ok((status, String::from_utf8(out).unwrap()))
    }

    #[test]
    fn test_split_assignment() {
        assert_eq!(split_assignment("a.0.b=x=y").unwrap(), ("a.0.b", "x=y"));
        assert_eq!(split_assignment("name=").unwrap(), ("name", ""));
        assert!(split_assignment("name").is_err());
    }

    #[test]
    fn test_parse_removal() {
        assert_eq!(parse_removal("companyIndustry=1").unwrap(), ("companyIndustry", 1));
        assert!(parse_removal("companyIndustry=one").is_err());
        assert!(parse_removal("companyIndustry").is_err());
    }

    #[test]
    fn test_basic_success() {
        let (status, out) = run(&[
            "basic",
            "--set",
            "name=kim",
            "--set",
            "email=kim@example.com",
            "--set",
            "bankName=신한",
        ])
        .unwrap();
        assert_eq!(status, CommandStatus::Success);
        assert_eq!(
            out,
            "success {\"bankName\":\"신한\",\"email\":\"kim@example.com\",\"name\":\"kim\",\"nickname\":\"\"}\n"
        );
    }

    #[test]
    fn test_basic_error_output() {
        let (status, out) = run(&[
            "basic",
            "--data",
            r#"{"name": "", "email": "x", "bankName": "에러 나는 은행"}"#,
        ])
        .unwrap();
        assert_eq!(status, CommandStatus::Failure);
        let json: serde_json::Value = serde_json::from_str(out.strip_prefix("error ").unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "name은 필수값입니다.",
                "email": "email 형식이 아닙니다.",
                "bankName": "은행을 올바르게 선택해주세요.",
            })
        );
    }

    #[test]
    fn test_basic2_third_industry() {
        let (status, out) = run(&[
            "basic2",
            "--append",
            "companyIndustry",
            "--append",
            "companyIndustry",
            "--append",
            "companyIndustry",
            "--set",
            "companyIndustry.0.value=IT",
            "--set",
            "companyIndustry.1.value=Bio",
            "--set",
            "companyIndustry.2.value=Retail",
        ])
        .unwrap();
        assert_eq!(status, CommandStatus::Failure);
        let json: serde_json::Value = serde_json::from_str(out.strip_prefix("error ").unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"companyIndustry": "Ensure this list has at most 2 items (it has 3)."})
        );
    }

    #[test]
    fn test_remove_then_submit() {
        let (status, out) = run(&[
            "basic2",
            "--data",
            r#"{"companyIndustry": [{"value": "IT"}, {"value": ""}]}"#,
            "--remove",
            "companyIndustry=1",
        ])
        .unwrap();
        assert_eq!(status, CommandStatus::Success);
        assert_eq!(out, "success {\"companyIndustry\":[{\"value\":\"IT\"}]}\n");
    }

    #[test]
    fn test_unknown_path_is_an_error() {
        let result = run(&["basic", "--set", "surname=kim"]);
        assert!(matches!(result, Err(FormworkError::UnknownField(p)) if p == "surname"));
    }

    #[test]
    fn test_file_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signup.json");
        std::fs::write(
            &path,
            r#"{
                "password": "secret1",
                "passwordConfirm": "secret2",
                "age": 30,
                "representatives": [{"name": "lee"}]
            }"#,
        )
        .unwrap();
        let (status, out) = run(&["signup", "--file", path.to_str().unwrap()]).unwrap();
        assert_eq!(status, CommandStatus::Failure);
        assert!(out.contains("passwordConfirm"), "{out}");
    }

    #[test]
    fn test_missing_file() {
        let result = run(&["basic", "--file", "/nonexistent/input.json"]);
        assert!(matches!(result, Err(FormworkError::IoError(_))));
    }
}
