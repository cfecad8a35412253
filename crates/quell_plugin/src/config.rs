//! Plugin configuration parsed from host-supplied arguments.

use quell_pipeline::PluginError;
use std::fmt;
use std::str::FromStr;

/// What the plugin does with matched unreported-exception diagnostics.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Mode {
    /// Demote matched diagnostics to warnings (the default).
    #[default]
    Warn,
    /// Suppress matched diagnostics entirely.
    NoWarn,
}

impl Mode {
    /// Parses the plugin argument list.
    ///
    /// No argument selects [`Mode::Warn`]; `"warn"` and `"nowarn"` select
    /// the corresponding mode; anything else is a configuration error,
    /// raised before any context state is touched.
    pub fn parse_args(args: &[String]) -> Result<Mode, PluginError> {
        match args {
            [] => Ok(Mode::Warn),
            [arg] => arg.parse(),
            _ => Err(PluginError::Configuration(format!(
                "expected at most one parameter, got {}",
                args.len()
            ))),
        }
    }
}

impl FromStr for Mode {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warn" => Ok(Mode::Warn),
            "nowarn" => Ok(Mode::NoWarn),
            other => Err(PluginError::Configuration(format!(
                "'{other}' is not a valid plugin parameter (expected \"warn\" or \"nowarn\")"
            ))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Warn => write!(f, "warn"),
            Mode::NoWarn => write!(f, "nowarn"),
        }
    }
}
