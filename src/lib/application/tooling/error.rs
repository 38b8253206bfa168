use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("MCP server '{server}' session is not initialised")]
    NotInitialized { server: String },
    #[error("failed to spawn MCP server '{server}': {source}")]
    Spawn {
        server: String,
        #[source]
        source: std::io::Error,
    },
    #[error("MCP server '{server}' transport error: {message}")]
    Transport { server: String, message: String },
    #[error("MCP server '{server}' message could not be encoded: {source}")]
    InvalidJson {
        server: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("MCP server '{server}' returned JSON-RPC error {code}: {message}")]
    Rpc {
        server: String,
        code: i64,
        message: String,
    },
    #[error("MCP server '{server}' terminated unexpectedly")]
    Terminated { server: String },
    #[error("tool '{tool}' is not offered by MCP server '{server}'")]
    UnknownTool { server: String, tool: String },
    #[error("MCP server '{server}' protocol violation: {message}")]
    Protocol { server: String, message: String },
}

impl ChannelError {
    pub fn user_message(&self) -> String {
        match self {
            ChannelError::Spawn { server, .. } => {
                format!("Could not start tool host '{server}'. Check the server command in the configuration.")
            }
            ChannelError::Terminated { server } => {
                format!("Tool host '{server}' exited before the run finished.")
            }
            other => other.to_string(),
        }
    }
}
