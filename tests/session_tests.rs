// MCP session tests against an in-process tool host over duplex pipes.

mod common;

use common::{HostBehaviour, connect};
use linecall_agent::domain::{ArgValue, BoundArguments, CatalogEntry, ParamType};
use linecall_agent::tooling::{ChannelError, ContentItem, ToolPayload, ToolSession};
use serde_json::json;

#[tokio::test]
async fn handshake_sends_initialize_then_initialized_notification() {
    let (mut session, host) = connect(HostBehaviour::default());

    let ack = session.initialize().await.expect("initialize succeeds");
    assert_eq!(ack.protocol_version, "2025-06-18");
    assert_eq!(ack.server_name.as_deref(), Some("fake-keynote"));
    assert_eq!(ack.instructions.as_deref(), Some("Slides are saved to the desktop."));
    assert!(session.is_initialized());

    // The host records the notification once the next request arrives.
    session.list_tools().await.expect("tools listed");
    let received = host.received().await;
    assert_eq!(received[0]["method"], "initialize");
    assert_eq!(received[0]["id"], "req-1");
    assert_eq!(received[0]["params"]["protocolVersion"], "2025-06-18");
    assert_eq!(received[1]["method"], "notifications/initialized");
    assert!(received[1].get("id").is_none());
    assert_eq!(received[2]["id"], "req-2");
}

#[tokio::test]
async fn requests_before_initialize_are_rejected() {
    let (mut session, host) = connect(HostBehaviour::default());

    let err = session.list_tools().await.unwrap_err();
    assert!(matches!(err, ChannelError::NotInitialized { .. }));
    assert!(host.received().await.is_empty());
}

#[tokio::test]
async fn listing_keeps_order_and_unreadable_slots() {
    let (mut session, _host) = connect(HostBehaviour::default());
    session.initialize().await.unwrap();

    let entries = session.list_tools().await.expect("tools listed");
    assert_eq!(entries.len(), 4);

    let keynote = entries[0].descriptor().expect("readable");
    let names: Vec<_> = keynote.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["text", "width", "height"]);
    assert_eq!(keynote.parameters[1].declared_type, ParamType::Integer);
    assert!(keynote.parameters[0].required);
    assert!(!keynote.parameters[2].required);

    assert!(matches!(entries[1], CatalogEntry::Unreadable { .. }));
    assert_eq!(
        entries[2].descriptor().map(|d| d.description.as_str()),
        Some("No description available")
    );
}

#[tokio::test]
async fn host_noise_pings_and_stray_responses_are_handled() {
    let behaviour = HostBehaviour {
        chatty: true,
        unsupported_request: true,
        ..HostBehaviour::default()
    };
    let (mut session, host) = connect(behaviour);
    session.initialize().await.unwrap();

    let entries = session.list_tools().await.expect("listing survives noise");
    assert_eq!(entries.len(), 4);

    // Make one more round trip so the host has read the client's replies.
    session
        .call_tool("raw_status", &BoundArguments::new())
        .await
        .unwrap();

    let received = host.received().await;
    let pong = received
        .iter()
        .find(|message| message["id"] == "host-1")
        .expect("ping answered");
    assert_eq!(pong["result"], json!({}));

    let refusal = received
        .iter()
        .find(|message| message["id"] == 77)
        .expect("unsupported request answered");
    assert_eq!(refusal["error"]["code"], -32601);
}

#[tokio::test]
async fn call_sends_named_arguments_and_decodes_content() {
    let (mut session, host) = connect(HostBehaviour::default());
    session.initialize().await.unwrap();
    session.list_tools().await.unwrap();

    let mut arguments = BoundArguments::new();
    arguments.insert("text", ArgValue::Text("Hello World".into()));
    arguments.insert("width", ArgValue::Integer(540));
    arguments.insert("height", ArgValue::Integer(430));

    let result = session
        .call_tool("create_keynote_with_text", &arguments)
        .await
        .expect("call succeeds");

    assert!(!result.is_error);
    match &result.payload {
        ToolPayload::Items(items) => {
            assert_eq!(items[0], ContentItem::Text("create_keynote_with_text ok".into()));
            assert!(matches!(&items[1], ContentItem::Opaque(raw) if raw.contains("image/png")));
        }
        other => panic!("unexpected payload {other:?}"),
    }

    let calls = host.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        json!({
            "name": "create_keynote_with_text",
            "arguments": {"text": "Hello World", "width": 540, "height": 430}
        })
    );
}

#[tokio::test]
async fn result_without_content_is_stringified() {
    let (mut session, _host) = connect(HostBehaviour::default());
    session.initialize().await.unwrap();

    let result = session
        .call_tool("raw_status", &BoundArguments::new())
        .await
        .expect("call succeeds");
    assert_eq!(result.payload, ToolPayload::Opaque(r#"{"status":"idle"}"#.into()));
}

#[tokio::test]
async fn undiscovered_tool_is_refused_locally() {
    let (mut session, host) = connect(HostBehaviour::default());
    session.initialize().await.unwrap();
    session.list_tools().await.unwrap();

    let err = session
        .call_tool("delete_everything", &BoundArguments::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ChannelError::UnknownTool { tool, .. } if tool == "delete_everything"));
    assert!(host.calls().await.is_empty());
}

#[tokio::test]
async fn rpc_error_surfaces_code_and_message() {
    let (mut session, _host) = connect(HostBehaviour::default());
    session.initialize().await.unwrap();

    let err = session
        .call_tool("explode", &BoundArguments::new())
        .await
        .unwrap_err();
    match err {
        ChannelError::Rpc { code, message, .. } => {
            assert_eq!(code, -32000);
            assert_eq!(message, "keynote is not running");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn host_hangup_is_terminated() {
    let behaviour = HostBehaviour {
        exit_on_list: true,
        ..HostBehaviour::default()
    };
    let (mut session, _host) = connect(behaviour);
    session.initialize().await.unwrap();

    let err = session.list_tools().await.unwrap_err();
    assert!(matches!(err, ChannelError::Terminated { .. }));
}
