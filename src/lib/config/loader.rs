use super::agent::RawAgent;
use super::error::ConfigError;
use super::gateway::RawGateway;
use super::server::{RawServer, ServerConfig};
use super::{AppConfig, CONFIG_PATH};
use crate::constants::ENV_PATHS;
use dotenvy::from_filename;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use tracing::debug;

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub agent: RawAgent,
    #[serde(default)]
    pub gateway: RawGateway,
    pub server: Option<RawServer>,
}

/// Loads `config/.env` then `.env`. Variables already set are kept.
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        for path in ENV_PATHS {
            if from_filename(path).is_ok() {
                debug!(path, "Loaded environment file");
            }
        }
    });
}

/// Load and validate configuration from a file path.
///
/// Without an explicit path a missing default file yields the built-in
/// defaults; an explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    match path {
        Some(path) => read_config(path),
        None => {
            let default_path = Path::new(CONFIG_PATH);
            if default_path.exists() {
                read_config(default_path)
            } else {
                debug!(path = CONFIG_PATH, "No configuration file; using defaults");
                Ok(AppConfig::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading agent configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content, path)
}

pub(super) fn parse_config(content: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<AppConfig, ConfigError> {
    if parsed.agent.iteration_limit == Some(0) {
        return Err(ConfigError::InvalidIterationLimit);
    }
    if parsed.gateway.timeout_secs == Some(0) {
        return Err(ConfigError::InvalidTimeout);
    }
    if let Some(queries) = &parsed.agent.queries {
        if queries.iter().all(|query| query.trim().is_empty()) {
            return Err(ConfigError::EmptyQueries);
        }
    }

    let server = match parsed.server {
        None => ServerConfig::default(),
        Some(raw) => {
            let has_command = raw
                .command
                .as_deref()
                .is_some_and(|command| !command.trim().is_empty());
            if !has_command {
                return Err(ConfigError::MissingServerCommand { server: raw.name() });
            }
            ServerConfig::from(raw)
        }
    };

    let mut agent = super::AgentSettings::from(parsed.agent);
    agent.queries.retain(|query| !query.trim().is_empty());

    Ok(AppConfig {
        agent,
        gateway: parsed.gateway.into(),
        server,
    })
}
