use serde::Deserialize;
use std::env;
use tracing::warn;

use super::error::ConfigError;
use crate::constants::{
    DEFAULT_API_KEY_ENV, DEFAULT_GEMINI_API_PATH, DEFAULT_GEMINI_ENDPOINT, DEFAULT_MODEL,
    DEFAULT_PROVIDER, DEFAULT_TIMEOUT_SECS,
};

/// Inference settings from the `[gateway]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub provider: String,
    pub endpoint: String,
    pub api_path: String,
    pub model: String,
    /// Name of the environment variable holding the key, never the key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            api_path: DEFAULT_GEMINI_API_PATH.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GatewaySettings {
    /// Reads the credential named by `api_key_env`. Missing or blank is fatal.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        let var = self.api_key_env.trim();
        match env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            Ok(_) => {
                warn!(provider = %self.provider, env_var = var, "API key environment variable is blank");
                Err(ConfigError::MissingCredential { var: var.to_string() })
            }
            Err(err) => {
                warn!(provider = %self.provider, env_var = var, %err, "API key environment variable is not set");
                Err(ConfigError::MissingCredential { var: var.to_string() })
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawGateway {
    pub provider: Option<String>,
    pub endpoint: Option<String>,
    pub api_path: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl From<RawGateway> for GatewaySettings {
    fn from(raw: RawGateway) -> Self {
        let defaults = GatewaySettings::default();
        Self {
            provider: raw.provider.unwrap_or(defaults.provider),
            endpoint: raw.endpoint.unwrap_or(defaults.endpoint),
            api_path: raw.api_path.unwrap_or(defaults.api_path),
            model: raw.model.unwrap_or(defaults.model),
            api_key_env: raw.api_key_env.unwrap_or(defaults.api_key_env),
            timeout_secs: raw.timeout_secs.unwrap_or(defaults.timeout_secs),
        }
    }
}
