use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::constants::{DEFAULT_SERVER_ARGS, DEFAULT_SERVER_COMMAND, DEFAULT_SERVER_NAME};

/// How to launch the tool host subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub name: String,
    pub command: PathBuf,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub workdir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVER_NAME.to_string(),
            command: PathBuf::from(DEFAULT_SERVER_COMMAND),
            args: DEFAULT_SERVER_ARGS.iter().map(|arg| arg.to_string()).collect(),
            env: HashMap::new(),
            workdir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawServer {
    pub name: Option<String>,
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    pub workdir: Option<String>,
}

impl RawServer {
    pub(crate) fn name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string())
    }
}

impl From<RawServer> for ServerConfig {
    fn from(raw: RawServer) -> Self {
        let expand = |s: &str| -> String {
            shellexpand::full(s)
                .map(|cow| cow.into_owned())
                .unwrap_or_else(|_| s.to_string())
        };

        let name = raw.name();
        let command = PathBuf::from(expand(raw.command.as_deref().unwrap_or(DEFAULT_SERVER_COMMAND)));
        let workdir = raw.workdir.map(|d| PathBuf::from(expand(&d)));
        let args = raw.args.into_iter().map(|arg| expand(&arg)).collect();

        Self {
            name,
            command,
            args,
            env: raw.env,
            workdir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn expands_env_vars_in_command_and_args() {
        unsafe {
            env::set_var("TEST_MCP_ROOT", "/path/to/mcp");
            env::set_var("TEST_ARG", "example-arg");
        }

        let raw = RawServer {
            name: Some("keynote".to_string()),
            command: Some("${TEST_MCP_ROOT}/server".to_string()),
            args: vec!["--flag".to_string(), "${TEST_ARG}".to_string()],
            env: HashMap::new(),
            workdir: Some("${TEST_MCP_ROOT}/work".to_string()),
        };

        let config = ServerConfig::from(raw);

        assert_eq!(config.command, PathBuf::from("/path/to/mcp/server"));
        assert_eq!(config.args, vec!["--flag", "example-arg"]);
        assert_eq!(config.workdir, Some(PathBuf::from("/path/to/mcp/work")));

        unsafe {
            env::remove_var("TEST_MCP_ROOT");
            env::remove_var("TEST_ARG");
        }
    }

    #[test]
    fn defaults_launch_python_server() {
        let config = ServerConfig::default();
        assert_eq!(config.command, PathBuf::from("python"));
        assert_eq!(config.args, vec!["mcp_server.py"]);
        assert_eq!(config.name, "keynote");
    }
}
