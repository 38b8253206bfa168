//! JSON-RPC 2.0 session with an MCP tool host, one JSON object per line.
//!
//! The session is generic over its byte streams so the same code drives a
//! child process's stdio and in-memory pipes. Exactly one request is in
//! flight at a time: after writing a request the session reads inbound lines
//! until the matching response arrives, answering host pings and logging
//! notifications on the way.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashSet;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{debug, info, warn};

use super::error::ChannelError;
use super::interface::{SessionAck, ToolSession};
use super::result::ToolResult;
use crate::domain::{BoundArguments, CatalogEntry};

pub const PROTOCOL_VERSION: &str = "2025-06-18";

pub struct McpSession<R, W> {
    server: String,
    lines: Lines<R>,
    writer: W,
    next_id: u64,
    initialized: bool,
    known_tools: Option<HashSet<String>>,
    instructions: Option<String>,
}

impl<R, W> McpSession<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(server: impl Into<String>, reader: R, writer: W) -> Self {
        Self {
            server: server.into(),
            lines: reader.lines(),
            writer,
            next_id: 1,
            initialized: false,
            known_tools: None,
            instructions: None,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    async fn handshake(&mut self) -> Result<SessionAck, ChannelError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": {}
        });
        let result = self.send_request("initialize", params).await?;

        let protocol_version = result
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION)
            .to_string();
        let server_name = result
            .get("serverInfo")
            .and_then(|info| info.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);
        self.instructions = result
            .get("instructions")
            .and_then(Value::as_str)
            .map(str::to_string);

        self.send_notification("notifications/initialized", json!({}))
            .await?;
        self.initialized = true;

        info!(
            server = %self.server,
            protocol = %protocol_version,
            remote = server_name.as_deref().unwrap_or("unknown"),
            "MCP session initialised"
        );
        Ok(SessionAck {
            protocol_version,
            server_name,
            instructions: self.instructions.clone(),
        })
    }

    async fn fetch_tools(&mut self) -> Result<Vec<CatalogEntry>, ChannelError> {
        self.ensure_initialized()?;
        let result = self.send_request("tools/list", json!({})).await?;
        let listing = result
            .get("tools")
            .and_then(Value::as_array)
            .ok_or_else(|| self.protocol_error("tools/list result has no tools array"))?;

        let entries: Vec<CatalogEntry> = listing.iter().map(CatalogEntry::from_listing).collect();
        for (index, entry) in entries.iter().enumerate() {
            if let CatalogEntry::Unreadable { reason } = entry {
                warn!(server = %self.server, index, %reason, "Skipping unreadable tool metadata");
            }
        }
        self.known_tools = Some(
            entries
                .iter()
                .filter_map(CatalogEntry::descriptor)
                .map(|descriptor| descriptor.name.clone())
                .collect(),
        );
        debug!(server = %self.server, count = entries.len(), "Tool catalogue refreshed");
        Ok(entries)
    }

    async fn invoke(
        &mut self,
        name: &str,
        arguments: &BoundArguments,
    ) -> Result<ToolResult, ChannelError> {
        self.ensure_initialized()?;
        if self.known_tools.is_none() {
            self.fetch_tools().await?;
        }
        let known = self
            .known_tools
            .as_ref()
            .map(|tools| tools.contains(name))
            .unwrap_or(false);
        if !known {
            warn!(server = %self.server, tool = name, "Refusing to call undiscovered tool");
            return Err(ChannelError::UnknownTool {
                server: self.server.clone(),
                tool: name.to_string(),
            });
        }

        let params = json!({
            "name": name,
            "arguments": arguments.to_json(),
        });
        debug!(server = %self.server, tool = name, %arguments, "Dispatching tools/call");
        let response = self.send_request("tools/call", params).await?;
        let result = ToolResult::from_response(&response);
        if result.is_error {
            warn!(server = %self.server, tool = name, "Tool host reported an error result");
        }
        Ok(result)
    }

    async fn send_request(&mut self, method: &str, params: Value) -> Result<Value, ChannelError> {
        let id = self.next_request_id();
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        });
        self.write_message(&payload).await?;
        self.await_response(&id).await
    }

    async fn await_response(&mut self, id: &str) -> Result<Value, ChannelError> {
        loop {
            let raw = match self.lines.next_line().await {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    return Err(ChannelError::Terminated {
                        server: self.server.clone(),
                    });
                }
                Err(source) => return Err(self.transport_error(source.to_string())),
            };

            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('\u{1b}') {
                debug!(
                    server = %self.server,
                    line = trimmed,
                    "skipping non-JSON ANSI log line from MCP server"
                );
                continue;
            }

            let value = match serde_json::from_str::<Value>(trimmed) {
                Ok(value) => value,
                Err(source) => {
                    warn!(
                        server = %self.server,
                        line = trimmed,
                        %source,
                        "received invalid JSON from MCP server"
                    );
                    continue;
                }
            };

            match (value.get("id").cloned(), value.get("method").is_some()) {
                (Some(request_id), true) => self.handle_server_request(request_id, &value).await?,
                (Some(response_id), false) => {
                    if response_key(&response_id).as_deref() == Some(id) {
                        return self.unpack_response(value);
                    }
                    debug!(
                        server = %self.server,
                        response_id = %response_id,
                        "received response for unknown request"
                    );
                }
                (None, true) => self.handle_notification(&value),
                (None, false) => {
                    debug!(server = %self.server, "ignoring message without id or method");
                }
            }
        }
    }

    fn unpack_response(&self, mut value: Value) -> Result<Value, ChannelError> {
        if let Some(error) = value.get("error") {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(-32000);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(ChannelError::Rpc {
                server: self.server.clone(),
                code,
                message,
            });
        }
        Ok(value
            .get_mut("result")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }

    async fn handle_server_request(&mut self, id: Value, value: &Value) -> Result<(), ChannelError> {
        let method = value
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if method == "ping" {
            return self.send_response(id, json!({})).await;
        }
        warn!(
            server = %self.server,
            method = %method,
            "server sent unsupported request"
        );
        let error = json!({
            "code": -32601,
            "message": format!("client does not implement method '{method}'"),
        });
        self.send_error(id, error).await
    }

    fn handle_notification(&mut self, value: &Value) {
        let Some(method) = value.get("method").and_then(Value::as_str) else {
            return;
        };
        debug!(server = %self.server, method, "received notification from server");
        if method == "notifications/tools/list_changed" {
            // The catalogue is fixed for the run; only note the change.
            info!(server = %self.server, "Tool host reports a changed tool list");
        }
    }

    async fn send_notification(&mut self, method: &str, params: Value) -> Result<(), ChannelError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params
        });
        self.write_message(&payload).await
    }

    async fn send_response(&mut self, id: Value, result: Value) -> Result<(), ChannelError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": result
        });
        self.write_message(&payload).await
    }

    async fn send_error(&mut self, id: Value, error: Value) -> Result<(), ChannelError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": error
        });
        self.write_message(&payload).await
    }

    async fn write_message(&mut self, message: &Value) -> Result<(), ChannelError> {
        let encoded =
            serde_json::to_string(message).map_err(|source| ChannelError::InvalidJson {
                server: self.server.clone(),
                source,
            })?;

        let server = &self.server;
        let transport = |source: std::io::Error| ChannelError::Transport {
            server: server.clone(),
            message: source.to_string(),
        };
        let writer = &mut self.writer;
        writer
            .write_all(encoded.as_bytes())
            .await
            .map_err(transport)?;
        writer.write_all(b"\n").await.map_err(transport)?;
        writer.flush().await.map_err(transport)?;
        Ok(())
    }

    /// Closes the write half so the host sees end-of-input.
    pub async fn close(&mut self) {
        if let Err(err) = self.writer.shutdown().await {
            debug!(server = %self.server, %err, "failed to close MCP session writer");
        }
        self.initialized = false;
        self.known_tools = None;
    }

    fn ensure_initialized(&self) -> Result<(), ChannelError> {
        if self.initialized {
            Ok(())
        } else {
            Err(ChannelError::NotInitialized {
                server: self.server.clone(),
            })
        }
    }

    fn next_request_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("req-{id}")
    }

    fn transport_error(&self, message: impl Into<String>) -> ChannelError {
        ChannelError::Transport {
            server: self.server.clone(),
            message: message.into(),
        }
    }

    fn protocol_error(&self, message: impl Into<String>) -> ChannelError {
        ChannelError::Protocol {
            server: self.server.clone(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl<R, W> ToolSession for McpSession<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn initialize(&mut self) -> Result<SessionAck, ChannelError> {
        self.handshake().await
    }

    async fn list_tools(&mut self) -> Result<Vec<CatalogEntry>, ChannelError> {
        self.fetch_tools().await
    }

    async fn call_tool(
        &mut self,
        name: &str,
        arguments: &BoundArguments,
    ) -> Result<ToolResult, ChannelError> {
        self.invoke(name, arguments).await
    }
}

fn response_key(id: &Value) -> Option<String> {
    match id {
        Value::String(value) => Some(value.clone()),
        Value::Number(num) => Some(num.to_string()),
        _ => None,
    }
}
