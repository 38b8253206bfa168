// Tool host process lifecycle: spawning and teardown of real child processes.
#![cfg(unix)]

use linecall_agent::config::ServerConfig;
use linecall_agent::tooling::{ChannelError, StdioToolHost};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn server(command: &str, args: &[&str]) -> ServerConfig {
    ServerConfig {
        name: "keynote".into(),
        command: PathBuf::from(command),
        args: args.iter().map(|arg| arg.to_string()).collect(),
        ..ServerConfig::default()
    }
}

#[tokio::test]
async fn missing_command_is_a_spawn_error() {
    let result = StdioToolHost::spawn(&server("/nonexistent/linecall-tool-host", &[]));
    match result {
        Err(ChannelError::Spawn { server, .. }) => assert_eq!(server, "keynote"),
        Err(other) => panic!("expected spawn error, got {other}"),
        Ok(_) => panic!("expected spawn error, got a running host"),
    }
}

#[tokio::test]
async fn host_exiting_on_stdin_eof_shuts_down_promptly() {
    let host = StdioToolHost::spawn(&server("cat", &[])).expect("spawn cat");
    assert_eq!(host.name(), "keynote");
    assert!(host.id().is_some());

    let started = Instant::now();
    host.shutdown().await;
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn host_ignoring_stdin_is_killed_after_grace_period() {
    let host = StdioToolHost::spawn(&server("sleep", &["30"])).expect("spawn sleep");
    let pid = host.id().expect("running host has a pid");

    let started = Instant::now();
    host.shutdown().await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(2), "returned before the grace period: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "shutdown took {elapsed:?}");
    if cfg!(target_os = "linux") {
        assert!(
            !std::path::Path::new(&format!("/proc/{pid}")).exists(),
            "host process {pid} was not reaped"
        );
    }
}
