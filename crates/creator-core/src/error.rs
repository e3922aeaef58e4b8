//! Error types for project creation

use thiserror::Error;

/// Result type alias using creator-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Project creation error types
#[derive(Error, Debug)]
pub enum Error {
    /// Project name failed package-name validation
    #[error("Invalid project name: \"{name}\"")]
    InvalidProjectName {
        name: String,
        errors: Vec<String>,
        warnings: Vec<String>,
    },

    /// Preset name resolved to nothing
    #[error("preset \"{name}\" not found.")]
    PresetNotFound { name: String, available: Vec<String> },

    /// Inline preset was not valid JSON
    #[error("CLI inline preset is not valid JSON: {input}")]
    InvalidInlinePreset {
        input: String,
        #[source]
        source: serde_json::Error,
    },

    /// Preset failed structural validation
    #[error("invalid preset options: {reason}")]
    InvalidPreset { reason: String },

    /// Remote preset could not be fetched
    #[error("Failed fetching remote preset {name}")]
    RemotePreset {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// Local preset file could not be loaded
    #[error("Failed loading local preset {path}")]
    LocalPreset {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// Saved options file exists but cannot be parsed
    #[error("Error loading saved preferences: {path} may be corrupted or have syntax errors")]
    InvalidOptionsFile {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A plugin generator or prompt provider failed
    #[error("Plugin {id} failed")]
    Plugin {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    /// A completion hook failed
    #[error("Completion hook failed")]
    Hook {
        #[source]
        source: anyhow::Error,
    },

    /// Dependency installation failed
    #[error("{manager} install failed: {message}")]
    Install { manager: String, message: String },

    /// Git operation failed
    #[error("Git operation failed: {message}")]
    Git { message: String },

    /// Interactive prompt failed or was interrupted
    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid preset error
    pub fn invalid_preset(reason: impl Into<String>) -> Self {
        Self::InvalidPreset {
            reason: reason.into(),
        }
    }

    /// Create a git operation error
    pub fn git(message: impl Into<String>) -> Self {
        Self::Git {
            message: message.into(),
        }
    }

    /// Create a plugin error
    pub fn plugin(id: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Plugin {
            id: id.into(),
            source,
        }
    }

    /// Process exit status for this error. Every creation failure is fatal.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Extra lines shown under the error message (validation details, available presets)
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectName {
                errors, warnings, ..
            } => errors
                .iter()
                .map(|e| format!("Error: {}", e))
                .chain(warnings.iter().map(|w| format!("Warning: {}", w)))
                .collect(),
            Self::PresetNotFound { available, .. } if available.is_empty() => vec![
                "you don't seem to have any saved preset.".to_string(),
                "run in manual mode to create a preset.".to_string(),
            ],
            Self::PresetNotFound { available, .. } => {
                let mut lines = vec!["available presets:".to_string()];
                lines.extend(available.iter().cloned());
                lines
            }
            Self::InvalidOptionsFile { source, .. } => vec![
                format!("({})", source),
                "Please fix or delete it and re-run in manual mode.".to_string(),
            ],
            _ => {
                let mut lines = Vec::new();
                let mut source = std::error::Error::source(self);
                while let Some(cause) = source {
                    lines.push(format!("Caused by: {}", cause));
                    source = cause.source();
                }
                lines
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_not_found_lists_available() {
        let err = Error::PresetNotFound {
            name: "missing".to_string(),
            available: vec!["mine".to_string(), "Default (Vue 3)".to_string()],
        };
        assert_eq!(err.exit_code(), 1);
        let details = err.details();
        assert_eq!(details[0], "available presets:");
        assert!(details.contains(&"mine".to_string()));
    }

    #[test]
    fn test_preset_not_found_without_saved_presets_hints() {
        let err = Error::PresetNotFound {
            name: "missing".to_string(),
            available: Vec::new(),
        };
        assert!(err.details()[0].contains("saved preset"));
    }

    #[test]
    fn test_remote_preset_keeps_cause() {
        let err = Error::RemotePreset {
            name: "owner/repo".to_string(),
            source: anyhow::anyhow!("HTTP 404"),
        };
        assert!(err.details().iter().any(|l| l.contains("HTTP 404")));
    }
}
