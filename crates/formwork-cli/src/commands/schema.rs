//! The `schema` command: prints the declared paths of a demo form.
//!
//! Array elements are shown with `#` in place of a position, e.g.
//! `companyIndustry.#.value`.

use std::io::Write;

use formwork_core::{FormworkResult, Settings};
use formwork_forms::FormDefinition;
use formwork_schema::{FieldType, Schema};

use crate::command::{CommandStatus, ManagementCommand};

use super::{form_argument, selected_form};

/// Prints one line per declared field and array.
pub struct SchemaCommand;

/// Describes every field and array under `schema`, one line each.
pub fn describe(schema: &Schema) -> Vec<String> {
    let mut lines = Vec::new();
    walk(schema, "", &mut lines);
    lines
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

fn walk(schema: &Schema, path: &str, lines: &mut Vec<String>) {
    match schema {
        Schema::Field(field) => {
            let mut line = format!(
                "{path}  {}  {}",
                field.field_type.type_name(),
                if field.required { "required" } else { "optional" }
            );
            if let FieldType::Enum { choices } = &field.field_type {
                let quoted: Vec<String> = choices.iter().map(|c| format!("{c:?}")).collect();
                line.push_str(&format!("  [{}]", quoted.join(", ")));
            }
            lines.push(line);
        }
        Schema::Object(object) => {
            for (name, child) in object.fields() {
                walk(child, &join(path, name), lines);
            }
        }
        Schema::Array(array) => {
            let mut line = format!("{path}  list");
            if let Some(min) = array.min_count {
                line.push_str(&format!("  min {min}"));
            }
            if let Some(max) = array.max_count {
                line.push_str(&format!("  max {max}"));
            }
            if array.keep_first {
                line.push_str("  keep-first");
            }
            lines.push(line);
            walk(array.element(), &join(path, "#"), lines);
        }
    }
}

impl ManagementCommand for SchemaCommand {
    fn name(&self) -> &'static str {
        "schema"
    }

    fn help(&self) -> &'static str {
        "Print the declared field paths of a demo form"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(form_argument())
    }

    fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
        out: &mut dyn Write,
    ) -> FormworkResult<CommandStatus> {
        let demo = selected_form(matches, settings)?;
        for line in describe(&demo.schema()) {
            writeln!(out, "{line}")?;
        }
        Ok(CommandStatus::Success)
    }
}
