//! Error types for engine bring-up, registry construction and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a subsystem initializer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SubsystemError(pub String);

impl SubsystemError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Why an engine initialization attempt ended in the failed outcome.
///
/// The subsystem name is kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Subsystem '{name}' failed to initialize: {source}")]
    SubsystemInit {
        name: String,
        #[source]
        source: SubsystemError,
    },

    #[error("Fault during initialization{}: {message}", in_subsystem(.subsystem))]
    Fault {
        subsystem: Option<String>,
        message: String,
    },

    #[error("Game data directory not found under {}", .0.display())]
    DataDirNotFound(PathBuf),
}

fn in_subsystem(subsystem: &Option<String>) -> String {
    match subsystem {
        Some(name) => format!(" in subsystem '{}'", name),
        None => String::new(),
    }
}

impl LifecycleError {
    /// Name of the subsystem the failure is attributed to, if any.
    pub fn subsystem(&self) -> Option<&str> {
        match self {
            LifecycleError::SubsystemInit { name, .. } => Some(name),
            LifecycleError::Fault { subsystem, .. } => subsystem.as_deref(),
            _ => None,
        }
    }
}

/// Invalid registry layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Subsystem '{0}' registered twice")]
    DuplicateName(String),

    #[error("Subsystems '{first}' and '{second}' share shutdown slot {slot}")]
    DuplicateShutdownSlot {
        slot: u16,
        first: String,
        second: String,
    },
}

/// Errors reading or writing the engine options file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not determine the user home directory")]
    NoHomeDir,

    #[error("Game data directory has to be set in the config file")]
    MissingDataDir,

    #[error("Invalid resolution '{0}', expected WIDTHxHEIGHT")]
    InvalidResolution(String),

    #[error("Unknown resource version '{0}'")]
    UnknownResourceVersion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_error_names_subsystem() {
        let err = LifecycleError::SubsystemInit {
            name: "lighting".to_string(),
            source: SubsystemError::new("no light tables"),
        };
        assert_eq!(err.subsystem(), Some("lighting"));
        assert_eq!(
            err.to_string(),
            "Subsystem 'lighting' failed to initialize: no light tables"
        );
    }

    #[test]
    fn test_fault_message() {
        let named = LifecycleError::Fault {
            subsystem: Some("world".to_string()),
            message: "boom".to_string(),
        };
        assert_eq!(named.to_string(), "Fault during initialization in subsystem 'world': boom");

        let anonymous = LifecycleError::Fault {
            subsystem: None,
            message: "boom".to_string(),
        };
        assert_eq!(anonymous.to_string(), "Fault during initialization: boom");
        assert_eq!(anonymous.subsystem(), None);
    }
}
