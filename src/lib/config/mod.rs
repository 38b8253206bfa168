pub mod agent;
pub mod app;
pub mod error;
pub mod gateway;
pub mod loader;
pub mod server;

pub use crate::constants::CONFIG_PATH;

pub use agent::{AgentSettings, PromptSettings};
pub use app::AppConfig;
pub use error::ConfigError;
pub use gateway::GatewaySettings;
pub use loader::ensure_env_loaded;
pub use server::ServerConfig;
