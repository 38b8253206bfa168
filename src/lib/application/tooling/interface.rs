use async_trait::async_trait;

use super::error::ChannelError;
use super::result::ToolResult;
use crate::domain::{BoundArguments, CatalogEntry};

/// Handshake outcome of `initialize`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionAck {
    pub protocol_version: String,
    pub server_name: Option<String>,
    pub instructions: Option<String>,
}

/// Request/response link to one tool host. Exclusive: one call in flight.
#[async_trait]
pub trait ToolSession: Send {
    async fn initialize(&mut self) -> Result<SessionAck, ChannelError>;

    async fn list_tools(&mut self) -> Result<Vec<CatalogEntry>, ChannelError>;

    /// Fails with [`ChannelError::UnknownTool`] before anything is sent when
    /// `name` is not among the discovered tools.
    async fn call_tool(
        &mut self,
        name: &str,
        arguments: &BoundArguments,
    ) -> Result<ToolResult, ChannelError>;
}
