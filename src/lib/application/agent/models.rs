use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use super::state::{IterationRecord, TerminalReason};
use crate::config::{AppConfig, PromptSettings};
use crate::constants::{DEFAULT_HISTORY_WINDOW, DEFAULT_ITERATION_LIMIT, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub iteration_limit: usize,
    /// Most recent records replayed into each prompt; `0` replays all.
    pub history_window: usize,
    pub inference_timeout: Duration,
    /// Iteration `i` uses `queries[min(i, len - 1)]`.
    pub queries: Vec<String>,
    pub prompt: PromptSettings,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            iteration_limit: DEFAULT_ITERATION_LIMIT,
            history_window: DEFAULT_HISTORY_WINDOW,
            inference_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            queries: PromptSettings::default_queries(),
            prompt: PromptSettings::default(),
        }
    }
}

impl AgentOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            iteration_limit: config.agent.iteration_limit,
            history_window: config.agent.history_window,
            inference_timeout: Duration::from_secs(config.gateway.timeout_secs),
            queries: config.agent.queries.clone(),
            prompt: config.agent.prompt.clone(),
        }
    }

    pub fn query_for(&self, iteration: usize) -> Option<&str> {
        let last = self.queries.len().checked_sub(1)?;
        self.queries.get(iteration.min(last)).map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentOutcome {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub reason: TerminalReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_answer: Option<String>,
    pub iterations: usize,
    pub dispatches: usize,
    pub history: Vec<IterationRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_schedule_repeats_last_entry() {
        let options = AgentOptions {
            queries: vec!["create".into(), "edit".into()],
            ..AgentOptions::default()
        };
        assert_eq!(options.query_for(0), Some("create"));
        assert_eq!(options.query_for(1), Some("edit"));
        assert_eq!(options.query_for(7), Some("edit"));

        let empty = AgentOptions {
            queries: Vec::new(),
            ..AgentOptions::default()
        };
        assert_eq!(empty.query_for(0), None);
    }
}
