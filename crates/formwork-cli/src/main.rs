use std::io;
use std::process::ExitCode;

use formwork_cli::{default_registry, load_settings};
use formwork_core::logging::setup_logging;

fn main() -> ExitCode {
    let registry = default_registry();
    let matches = registry.build_cli().get_matches();

    let settings = match load_settings(&matches) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("formwork: {err}");
            return ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1));
        }
    };
    setup_logging(&settings);

    let mut out = io::stdout().lock();
    match registry.execute(&matches, &settings, &mut out) {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("formwork: {err}");
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}
