//! Tool host bootstrapped as a child process speaking MCP over stdio.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

use super::error::ChannelError;
use super::interface::{SessionAck, ToolSession};
use super::result::ToolResult;
use super::session::McpSession;
use crate::config::ServerConfig;
use crate::domain::{BoundArguments, CatalogEntry};

/// Time the host gets to exit on its own after stdin closes.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub type StdioSession = McpSession<BufReader<ChildStdout>, BufWriter<ChildStdin>>;

/// Owns the child process for the lifetime of one agent run.
///
/// The child is spawned with `kill_on_drop`, so it is reaped even when the
/// owning future is dropped or unwinds; [`StdioToolHost::shutdown`] is the
/// orderly path.
pub struct StdioToolHost {
    name: String,
    child: Child,
    session: StdioSession,
}

impl StdioToolHost {
    pub fn spawn(server: &ServerConfig) -> Result<Self, ChannelError> {
        let mut command = Command::new(&server.command);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &server.workdir {
            command.current_dir(dir);
        }
        if !server.args.is_empty() {
            command.args(&server.args);
        }
        for (key, value) in &server.env {
            command.env(key, value);
        }

        let mut child = command.spawn().map_err(|source| ChannelError::Spawn {
            server: server.name.clone(),
            source,
        })?;

        let transport_error = |message: &str| ChannelError::Transport {
            server: server.name.clone(),
            message: message.to_string(),
        };
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| transport_error("failed to capture server stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| transport_error("failed to capture server stdout"))?;

        info!(
            server = %server.name,
            command = %server.command.display(),
            pid = child.id(),
            "Spawned MCP tool host"
        );

        Ok(Self {
            name: server.name.clone(),
            child,
            session: McpSession::new(
                server.name.clone(),
                BufReader::new(stdout),
                BufWriter::new(stdin),
            ),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// OS process id of the host, while it has not been reaped.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn session(&self) -> &StdioSession {
        &self.session
    }

    /// Closes stdin, gives the host a moment to exit, then kills it.
    pub async fn shutdown(self) {
        let Self {
            name,
            mut child,
            mut session,
        } = self;
        session.close().await;
        // Shutting down a pipe writer does not close the fd; dropping it does.
        drop(session);

        match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
            Ok(Ok(status)) => {
                debug!(server = %name, %status, "MCP tool host exited");
                return;
            }
            Ok(Err(err)) => {
                warn!(server = %name, %err, "failed to wait for MCP tool host");
            }
            Err(_) => {
                debug!(server = %name, "MCP tool host still running after grace period");
            }
        }

        if let Err(err) = child.kill().await {
            debug!(
                server = %name,
                %err,
                "failed to kill MCP server process (may have already exited)"
            );
        }
        info!(server = %name, "MCP tool host terminated");
    }
}

#[async_trait]
impl ToolSession for StdioToolHost {
    async fn initialize(&mut self) -> Result<SessionAck, ChannelError> {
        self.session.initialize().await
    }

    async fn list_tools(&mut self) -> Result<Vec<CatalogEntry>, ChannelError> {
        self.session.list_tools().await
    }

    async fn call_tool(
        &mut self,
        name: &str,
        arguments: &BoundArguments,
    ) -> Result<ToolResult, ChannelError> {
        self.session.call_tool(name, arguments).await
    }
}
