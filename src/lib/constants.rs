//! Application constants
//!
//! Single source of truth for paths and built-in defaults.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/agent.toml";

/// Environment files loaded before the config, first match per variable wins
pub const ENV_PATHS: [&str; 2] = ["config/.env", ".env"];

pub const DEFAULT_ITERATION_LIMIT: usize = 3;

/// `0` replays every prior iteration into the prompt
pub const DEFAULT_HISTORY_WINDOW: usize = 0;

pub const DEFAULT_TIMEOUT_SECS: u64 = 2000;

pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_API_PATH: &str = "v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

pub const DEFAULT_SERVER_NAME: &str = "keynote";
pub const DEFAULT_SERVER_COMMAND: &str = "python";
pub const DEFAULT_SERVER_ARGS: [&str; 1] = ["mcp_server.py"];
