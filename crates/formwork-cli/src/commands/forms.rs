//! The `forms` command: lists the demo forms.

use std::io::Write;

use formwork_core::{FormworkResult, Settings};

use crate::command::{CommandStatus, ManagementCommand};
use crate::demos::DemoForm;

/// Lists the demo forms with a short description.
pub struct FormsCommand;

impl ManagementCommand for FormsCommand {
    fn name(&self) -> &'static str {
        "forms"
    }

    fn help(&self) -> &'static str {
        "List the available demo forms"
    }

    fn handle(
        &self,
        _matches: &clap::ArgMatches,
        settings: &Settings,
        out: &mut dyn Write,
    ) -> FormworkResult<CommandStatus> {
        for demo in DemoForm::ALL {
            let marker = if demo.key() == settings.default_form { "*" } else { " " };
            writeln!(out, "{marker} {:<8} {}", demo.key(), demo.description())?;
        }
        Ok(CommandStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_demo_and_marks_default() {
        let settings = Settings {
            default_form: "basic2".into(),
            ..Settings::default()
        };
        let mut out = Vec::new();
        let matches = clap::Command::new("forms").get_matches_from(["forms"]);
        FormsCommand.handle(&matches, &settings, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  basic "));
        assert!(lines[1].starts_with("* basic2"));
        assert!(lines[2].starts_with("  signup"));
    }
}
