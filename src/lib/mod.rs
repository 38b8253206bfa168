pub mod application;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{agent, registry, tooling};
pub use cli::Cli;
pub use config::{AppConfig, ConfigError};
pub use infrastructure::model;

use agent::{Agent, AgentError, AgentOptions, AgentOutcome};
use model::GatewayFactory;
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;
use tooling::{StdioToolHost, ToolSession};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub async fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    init_tracing(cli.quiet);
    info!("Starting linecall-agent");
    debug!(
        config = ?cli.config,
        max_iterations = ?cli.max_iterations,
        model = ?cli.model,
        timeout_secs = ?cli.timeout_secs,
        "CLI arguments parsed"
    );

    let config_path = cli.config.as_deref().map(Path::new);
    let mut file_config = AppConfig::load(config_path).inspect_err(|err| {
        error!(%err, "{}", err.user_message());
    })?;
    if let Some(path) = config_path {
        info!(path = %path.display(), "Loaded configuration from file");
    } else {
        info!("Loaded configuration using default path or defaults");
    }
    apply_cli_overrides(&cli, &mut file_config)?;

    let api_key = file_config.gateway.resolve_api_key().inspect_err(|err| {
        error!(%err, "{}", err.user_message());
    })?;
    let gateway = GatewayFactory::create(&file_config.gateway, api_key)?;
    let agent = Agent::new(gateway, AgentOptions::from_config(&file_config));

    let mut host = StdioToolHost::spawn(&file_config.server)?;
    let result = tokio::select! {
        result = drive(&agent, &mut host) => result,
        signal = shutdown_signal() => {
            warn!(signal, "Interrupted; shutting down tool host");
            Err("interrupted".into())
        }
    };
    host.shutdown().await;

    let outcome = result?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    info!(reason = %outcome.reason, "Agent execution finished");
    Ok(if outcome.reason.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn drive(
    agent: &Agent<dyn model::InferenceGateway>,
    host: &mut StdioToolHost,
) -> Result<AgentOutcome, Box<dyn Error>> {
    let ack = host
        .initialize()
        .await
        .map_err(AgentError::from)
        .inspect_err(|err| error!(%err, "{}", err.user_message()))?;
    info!(
        server = host.name(),
        protocol = %ack.protocol_version,
        peer = ?ack.server_name,
        "Tool host initialized"
    );
    let outcome = agent
        .run(host)
        .await
        .inspect_err(|err| error!(%err, "{}", err.user_message()))?;
    Ok(outcome)
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM, naming the signal received.
/// The SIGTERM handler is installed before the future is first polled.
fn shutdown_signal() -> impl Future<Output = &'static str> {
    #[cfg(unix)]
    let terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .inspect_err(|err| warn!(%err, "failed to install SIGTERM handler"))
        .ok();

    async move {
        #[cfg(unix)]
        if let Some(mut terminate) = terminate {
            return tokio::select! {
                _ = tokio::signal::ctrl_c() => "SIGINT",
                _ = terminate.recv() => "SIGTERM",
            };
        }
        let _ = tokio::signal::ctrl_c().await;
        "SIGINT"
    }
}

fn init_tracing(quiet: bool) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = if quiet {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
    });
}

fn apply_cli_overrides(cli: &Cli, config: &mut AppConfig) -> Result<(), ConfigError> {
    if let Some(limit) = cli.max_iterations {
        if limit == 0 {
            return Err(ConfigError::InvalidIterationLimit);
        }
        info!(limit, "Overriding iteration limit from CLI flag");
        config.agent.iteration_limit = limit;
    }
    if let Some(model) = &cli.model {
        info!(model = %model, "Overriding model from CLI flag");
        config.gateway.model = model.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        if secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        info!(secs, "Overriding inference timeout from CLI flag");
        config.gateway.timeout_secs = secs;
    }
    if let Some(query) = cli.query_text() {
        match config.agent.queries.first_mut() {
            Some(first) => *first = query,
            None => config.agent.queries.push(query),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_replace_first_query_only() {
        let cli = Cli {
            max_iterations: Some(9),
            model: Some("gemini-1.5-flash".into()),
            timeout_secs: Some(12),
            query: vec!["Build".into(), "a deck".into()],
            ..Cli::default()
        };
        let mut config = AppConfig::default();
        apply_cli_overrides(&cli, &mut config).unwrap();

        assert_eq!(config.agent.iteration_limit, 9);
        assert_eq!(config.gateway.model, "gemini-1.5-flash");
        assert_eq!(config.gateway.timeout_secs, 12);
        assert_eq!(config.agent.queries[0], "Build a deck");
        assert_eq!(config.agent.queries.len(), 2);
    }

    #[test]
    fn zero_iteration_override_is_rejected() {
        let cli = Cli {
            max_iterations: Some(0),
            ..Cli::default()
        };
        let mut config = AppConfig::default();
        assert!(matches!(
            apply_cli_overrides(&cli, &mut config),
            Err(ConfigError::InvalidIterationLimit)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sigterm_resolves_shutdown_signal() {
        let signal = shutdown_signal();
        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .expect("run kill");
        assert!(status.success());

        let received = tokio::time::timeout(std::time::Duration::from_secs(5), signal)
            .await
            .expect("signal observed");
        assert_eq!(received, "SIGTERM");
    }

    #[test]
    fn zero_timeout_override_is_rejected() {
        let cli = Cli {
            timeout_secs: Some(0),
            ..Cli::default()
        };
        let mut config = AppConfig::default();
        assert!(matches!(
            apply_cli_overrides(&cli, &mut config),
            Err(ConfigError::InvalidTimeout)
        ));
        assert_eq!(config.gateway.timeout_secs, AppConfig::default().gateway.timeout_secs);
    }
}
