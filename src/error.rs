//! Error types for the sops buildpack
//!
//! All modules use `BuildpackResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for buildpack operations
pub type BuildpackResult<T> = Result<T, BuildpackError>;

/// All errors that can occur during a build
#[derive(Error, Debug)]
pub enum BuildpackError {
    // Invocation errors
    #[error("expected <build_dir> <cache_dir> <env_dir>, received {received} arguments")]
    ContractViolation { received: usize },

    #[error("{role} directory was not supplied by the platform")]
    MissingDirectory { role: &'static str },

    // Configuration errors
    #[error("required config var {0} is not set")]
    MissingConfigVar(&'static str),

    #[error("failed to read config var {name} from {path}")]
    ConfigRead {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Fetch errors
    #[error("failed to download {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("downloaded artifact from {url} is empty")]
    EmptyArtifact { url: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl BuildpackError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a fetch error for a URL
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Process exit status for this error.
    ///
    /// The argument-count contract is distinguishable from ordinary
    /// failures: `2 + argument_count`, capped at the u8 range.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ContractViolation { received } => (received + 2).min(u8::MAX as usize) as u8,
            _ => 1,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingConfigVar("SOPS_VERSION") => {
                Some("Run: heroku config:set SOPS_VERSION=<version>")
            }
            Self::Fetch { .. } | Self::EmptyArtifact { .. } => {
                Some("Check that the requested SOPS_VERSION has a published release artifact")
            }
            _ => None,
        }
    }
}
