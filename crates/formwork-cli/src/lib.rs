//! # formwork-cli
//!
//! Command-line host for formwork forms.
//!
//! This crate provides:
//!
//! - **Commands** - A small framework for defining and registering
//!   subcommands, plus the built-in `forms`, `schema` and `submit`
//! - **Demo forms** - Ready-made form definitions to try the engine with
//! - **Settings resolution** - `--config` / `--log-level` on top of the
//!   environment
//!
//! ## Quick Start
//!
//! ```rust
//! use formwork_cli::command::CommandRegistry;
//! use formwork_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! assert_eq!(registry.list_commands(), vec!["forms", "schema", "submit"]);
//! ```

pub mod command;
pub mod commands;
pub mod demos;

use formwork_core::{settings_loader, FormworkResult, Settings};

pub use command::{CommandRegistry, CommandStatus, ManagementCommand};
pub use demos::DemoForm;

/// Builds a registry holding every built-in command.
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    commands::register_builtin_commands(&mut registry);
    registry
}

/// Resolves settings for a parsed command line.
///
/// Starts from `--config` (TOML, or JSON by extension) or the defaults,
/// applies `FORMWORK_*` environment overrides, then `--log-level`.
pub fn load_settings(matches: &clap::ArgMatches) -> FormworkResult<Settings> {
    let mut settings = match matches.get_one::<String>("config") {
        Some(path) => settings_loader::from_file(path)?,
        None => Settings::default(),
    };
    settings_loader::apply_env_overrides(&mut settings);
    if let Some(level) = matches.get_one::<String>("log-level") {
        settings.log_level.clone_from(level);
    }
    Ok(settings)
}
