//! Command framework for the formwork CLI.
//!
//! Each subcommand implements [`ManagementCommand`] and is registered in a
//! [`CommandRegistry`], which builds the clap command tree and dispatches
//! parsed arguments to the matching handler.
//!
//! ## Defining a Custom Command
//!
//! ```rust
//! use std::io::Write;
//!
//! use formwork_cli::command::{CommandRegistry, CommandStatus, ManagementCommand};
//! use formwork_core::{FormworkResult, Settings};
//!
//! struct GreetCommand;
//!
//! impl ManagementCommand for GreetCommand {
//!     fn name(&self) -> &'static str { "greet" }
//!     fn help(&self) -> &'static str { "Say hello" }
//!
//!     fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         _settings: &Settings,
//!         out: &mut dyn Write,
//!     ) -> FormworkResult<CommandStatus> {
//!         writeln!(out, "hello")?;
//!         Ok(CommandStatus::Success)
//!     }
//! }
//!
//! let mut registry = CommandRegistry::new();
//! registry.register(Box::new(GreetCommand));
//! let matches = registry.build_cli().try_get_matches_from(["formwork", "greet"]).unwrap();
//! let mut out = Vec::new();
//! registry.execute(&matches, &Settings::default(), &mut out).unwrap();
//! assert_eq!(out, b"hello\n");
//! ```

use std::collections::HashMap;
use std::io::Write;

use formwork_core::{FormworkError, FormworkResult, Settings};

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The command did what was asked.
    Success,
    /// The command ran but reported a negative outcome (e.g. a rejected
    /// submit).
    Failure,
}

impl CommandStatus {
    /// Returns the process exit code for this status.
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }
}

/// A subcommand that can be registered and invoked through the CLI.
pub trait ManagementCommand {
    /// Returns the name of this command (used to invoke it from the CLI).
    fn name(&self) -> &'static str;

    /// Returns a short help description for this command.
    fn help(&self) -> &'static str;

    /// Adds custom arguments to the clap command.
    ///
    /// The default implementation returns the command unchanged.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Executes the command, writing its report to `out`.
    fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
        out: &mut dyn Write,
    ) -> FormworkResult<CommandStatus>;
}

/// A registry of subcommands, keyed by name.
pub struct CommandRegistry {
    commands: HashMap<&'static str, Box<dyn ManagementCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a command, replacing any command of the same name.
    pub fn register(&mut self, command: Box<dyn ManagementCommand>) {
        self.commands.insert(command.name(), command);
    }

    /// Returns the command with the given name, if registered.
    pub fn get(&self, name: &str) -> Option<&dyn ManagementCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Returns a sorted list of all registered command names.
    pub fn list_commands(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds the top-level clap `Command` with every registered subcommand
    /// and the global `--config` / `--log-level` options.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("formwork")
            .about("Mount, fill and submit formwork forms")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                clap::Arg::new("config")
                    .long("config")
                    .global(true)
                    .value_name("PATH")
                    .help("Settings file (TOML, or JSON by extension)"),
            )
            .arg(
                clap::Arg::new("log-level")
                    .long("log-level")
                    .global(true)
                    .value_name("FILTER")
                    .help("Tracing filter, overrides the settings file"),
            );

        for name in self.list_commands() {
            if let Some(cmd) = self.get(name) {
                let subcmd = clap::Command::new(name).about(cmd.help());
                app = app.subcommand(cmd.add_arguments(subcmd));
            }
        }

        app
    }

    /// Dispatches the subcommand in `matches` to its handler.
    pub fn execute(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
        out: &mut dyn Write,
    ) -> FormworkResult<CommandStatus> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            FormworkError::ConfigurationError("No subcommand specified".to_string())
        })?;

        let cmd = self.get(name).ok_or_else(|| {
            FormworkError::ConfigurationError(format!("Unknown command: {name}"))
        })?;

        tracing::debug!(command = name, "dispatching");
        cmd.handle(sub_matches, settings, out)
    }
}
