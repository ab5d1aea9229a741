//! Settings for formwork hosts.
//!
//! [`Settings`] holds the handful of knobs a host (the CLI, or an embedding
//! application) needs: logging configuration and output formatting. Use
//! [`settings_loader`](crate::settings_loader) to build one from a file and
//! the environment.

use serde::{Deserialize, Serialize};

/// The complete set of formwork settings.
///
/// # Examples
///
/// ```
/// use formwork_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled. Debug mode uses human-readable logs.
    pub debug: bool,
    /// An `EnvFilter` directive, e.g. `"info"` or `"formwork_forms=debug"`.
    pub log_level: String,
    /// Whether submit results are printed as indented JSON.
    pub pretty_output: bool,
    /// The demo form used when a command does not name one.
    pub default_form: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            pretty_output: false,
            default_form: "basic".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
        assert!(!s.pretty_output);
        assert_eq!(s.default_form, "basic");
    }

    #[test]
    fn test_serde_round_trip() {
        let s = Settings {
            debug: false,
            log_level: "warn".into(),
            pretty_output: true,
            default_form: "signup".into(),
        };
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
