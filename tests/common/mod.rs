//! In-process MCP tool host speaking line-delimited JSON-RPC over a duplex pipe.

#![allow(dead_code)]

use linecall_agent::tooling::McpSession;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{
    AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf, duplex, split,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub type PipeSession = McpSession<BufReader<ReadHalf<DuplexStream>>, WriteHalf<DuplexStream>>;

#[derive(Clone, Copy, Default)]
pub struct HostBehaviour {
    /// Ping the client and emit log noise before answering `tools/list`.
    pub chatty: bool,
    /// Send an unsupported request before answering `tools/list`.
    pub unsupported_request: bool,
    /// Hang up instead of answering `tools/list`.
    pub exit_on_list: bool,
}

pub struct FakeHost {
    pub received: Arc<Mutex<Vec<Value>>>,
    pub task: JoinHandle<()>,
}

impl FakeHost {
    pub async fn received(&self) -> Vec<Value> {
        self.received.lock().await.clone()
    }

    pub async fn calls(&self) -> Vec<Value> {
        self.received()
            .await
            .into_iter()
            .filter(|message| message["method"] == "tools/call")
            .map(|message| message["params"].clone())
            .collect()
    }
}

pub fn tool_listing() -> Value {
    json!([
        {
            "name": "create_keynote_with_text",
            "description": "Create a presentation with one text box",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "text": {"type": "string"},
                    "width": {"type": "integer"},
                    "height": {"type": "integer"}
                },
                "required": ["text"]
            }
        },
        {"description": "entry without a name"},
        {"name": "explode", "inputSchema": {"type": "object", "properties": {}}},
        {"name": "raw_status"}
    ])
}

pub fn connect(behaviour: HostBehaviour) -> (PipeSession, FakeHost) {
    let (client_io, host_io) = duplex(64 * 1024);
    let (client_read, client_write) = split(client_io);
    let session = McpSession::new("fake-keynote", BufReader::new(client_read), client_write);

    let received = Arc::new(Mutex::new(Vec::new()));
    let task = tokio::spawn(serve(host_io, behaviour, received.clone()));
    (session, FakeHost { received, task })
}

async fn serve(io: DuplexStream, behaviour: HostBehaviour, received: Arc<Mutex<Vec<Value>>>) {
    let (read, mut write) = split(io);
    let mut lines = BufReader::new(read).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(message) = serde_json::from_str::<Value>(&line) else {
            continue;
        };
        received.lock().await.push(message.clone());

        let Some(method) = message.get("method").and_then(Value::as_str) else {
            continue;
        };
        let Some(id) = message.get("id").cloned() else {
            continue;
        };

        let mut outgoing = Vec::new();
        match method {
            "initialize" => outgoing.push(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": "2025-06-18",
                    "serverInfo": {"name": "fake-keynote", "version": "0.1.0"},
                    "capabilities": {"tools": {}},
                    "instructions": "Slides are saved to the desktop."
                }
            })
            .to_string()),
            "tools/list" => {
                if behaviour.exit_on_list {
                    return;
                }
                if behaviour.chatty {
                    outgoing.push("\u{1b}[32mINFO\u{1b}[0m listing tools".to_string());
                    outgoing.push("not json at all".to_string());
                    outgoing.push(String::new());
                    outgoing.push(
                        json!({"jsonrpc": "2.0", "id": "host-1", "method": "ping"}).to_string(),
                    );
                    outgoing.push(
                        json!({"jsonrpc": "2.0", "method": "notifications/tools/list_changed"})
                            .to_string(),
                    );
                    outgoing.push(json!({"jsonrpc": "2.0", "id": "req-999", "result": {}}).to_string());
                }
                if behaviour.unsupported_request {
                    outgoing.push(
                        json!({"jsonrpc": "2.0", "id": 77, "method": "sampling/createMessage", "params": {}})
                            .to_string(),
                    );
                }
                outgoing.push(
                    json!({"jsonrpc": "2.0", "id": id, "result": {"tools": tool_listing()}})
                        .to_string(),
                );
            }
            "tools/call" => {
                let name = message["params"]["name"].as_str().unwrap_or_default();
                let reply = match name {
                    "explode" => json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "error": {"code": -32000, "message": "keynote is not running"}
                    }),
                    "raw_status" => json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "result": {"status": "idle"}
                    }),
                    _ => json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "result": {
                            "content": [
                                {"type": "text", "text": format!("{name} ok")},
                                {"type": "image", "data": "AAAA", "mimeType": "image/png"}
                            ],
                            "isError": false
                        }
                    }),
                };
                outgoing.push(reply.to_string());
            }
            _ => outgoing.push(
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": {"code": -32601, "message": "method not found"}
                })
                .to_string(),
            ),
        }

        for line in outgoing {
            if write.write_all(line.as_bytes()).await.is_err()
                || write.write_all(b"\n").await.is_err()
            {
                return;
            }
        }
        if write.flush().await.is_err() {
            return;
        }
    }
}
