//! Built-in commands.
//!
//! Each command implements the
//! [`ManagementCommand`](crate::command::ManagementCommand) trait.

pub mod forms;
pub mod schema;
pub mod submit;

pub use forms::FormsCommand;
pub use schema::SchemaCommand;
pub use submit::SubmitCommand;

use formwork_core::{FormworkError, FormworkResult, Settings};

use crate::command::CommandRegistry;
use crate::demos::DemoForm;

/// Registers all built-in commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(FormsCommand));
    registry.register(Box::new(SubmitCommand));
    registry.register(Box::new(SchemaCommand));
}

/// Resolves the `form` argument, falling back to `settings.default_form`.
pub(crate) fn selected_form(matches: &clap::ArgMatches, settings: &Settings) -> FormworkResult<DemoForm> {
    let name = matches
        .get_one::<String>("form")
        .map_or(settings.default_form.as_str(), String::as_str);
    DemoForm::from_name(name)
        .ok_or_else(|| FormworkError::ConfigurationError(format!("Unknown form: {name}")))
}

pub(crate) fn form_argument() -> clap::Arg {
    clap::Arg::new("form")
        .help("Demo form name (defaults to the configured default_form)")
        .value_parser(DemoForm::ALL.map(DemoForm::key))
}
