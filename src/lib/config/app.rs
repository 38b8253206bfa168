use super::agent::AgentSettings;
use super::error::ConfigError;
use super::gateway::GatewaySettings;
use super::server::ServerConfig;
use std::path::Path;

/// Application configuration loaded from agent.toml
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub agent: AgentSettings,
    pub gateway: GatewaySettings,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Parse and validate TOML text. `origin` only labels errors.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        super::loader::parse_config(content, origin)
    }
}
