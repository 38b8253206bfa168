use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    name = "linecall-agent",
    version,
    about = "Bounded tool-calling agent over an MCP stdio tool host"
)]
pub struct Cli {
    /// Path to agent.toml; defaults to config/agent.toml when present
    #[arg(long)]
    pub config: Option<String>,
    #[arg(long)]
    pub max_iterations: Option<usize>,
    #[arg(long)]
    pub model: Option<String>,
    /// Per-inference timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Disable log output
    #[arg(long, short)]
    pub quiet: bool,
    /// Replaces the first scheduled query
    pub query: Vec<String>,
}

impl Cli {
    pub fn query_text(&self) -> Option<String> {
        let joined = self.query.join(" ");
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides_and_positional_query() {
        let cli = Cli::parse_from([
            "linecall-agent",
            "--max-iterations",
            "4",
            "--model",
            "gemini-1.5-pro",
            "--quiet",
            "Create",
            "a deck",
        ]);
        assert_eq!(cli.max_iterations, Some(4));
        assert_eq!(cli.model.as_deref(), Some("gemini-1.5-pro"));
        assert!(cli.quiet);
        assert_eq!(cli.query_text().as_deref(), Some("Create a deck"));
    }

    #[test]
    fn blank_query_is_none() {
        let cli = Cli::parse_from(["linecall-agent", " "]);
        assert_eq!(cli.query_text(), None);
    }
}
