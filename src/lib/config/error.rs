use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("environment variable '{var}' holding the API key is not set or blank")]
    MissingCredential { var: String },

    #[error("iteration limit must be at least 1")]
    InvalidIterationLimit,

    #[error("inference timeout must be at least 1 second")]
    InvalidTimeout,

    #[error("at least one query is required in [agent] queries")]
    EmptyQueries,

    #[error("server '{server}' is missing required field 'command'")]
    MissingServerCommand { server: String },
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::NotFound { path } => {
                format!("Config file {} does not exist.", path.display())
            }
            ConfigError::MissingCredential { var } => format!(
                "Set {var} in the environment or in config/.env before running the agent."
            ),
            other => other.to_string(),
        }
    }
}
