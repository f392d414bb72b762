//! CLI error type.

use std::fmt;

use earkmets::mets::MetsError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Settings are missing or inconsistent.
    Config(String),
    /// A library operation failed.
    Mets(MetsError),
    /// Command output could not be produced.
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Mets(e) => write!(f, "{}", e),
            CliError::Output(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Mets(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MetsError> for CliError {
    fn from(e: MetsError) -> Self {
        match e {
            MetsError::MissingOption(_) | MetsError::InvalidConfig(_) => {
                CliError::Config(e.to_string())
            }
            other => CliError::Mets(other),
        }
    }
}
