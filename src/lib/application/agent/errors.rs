use crate::application::tooling::ChannelError;
use thiserror::Error;

use super::binding::CoercionError;

/// Errors that stop a run before the loop starts.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("tool discovery failed: {0}")]
    Discovery(#[from] ChannelError),
    #[error("no query configured for the agent")]
    NoQueries,
}

impl AgentError {
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Discovery(err) => err.user_message(),
            AgentError::NoQueries => {
                "Nothing to do: configure at least one query or pass one on the command line."
                    .to_string()
            }
        }
    }
}

/// Iteration-level failures. Each one is recorded and ends the run.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    #[error("failed to execute tool '{tool}': {source}")]
    Channel {
        tool: String,
        #[source]
        source: ChannelError,
    },
    #[error("malformed model response: {preview}")]
    Malformed { preview: String },
}
