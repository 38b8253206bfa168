//! Loop-scoped state. One value per run, owned by the runner and consumed
//! when the run terminates.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use super::errors::ToolError;
use super::models::AgentOutcome;
use crate::application::tooling::ToolResult;
use crate::domain::BoundArguments;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalReason {
    FinalAnswer,
    ToolError,
    InferenceFailure,
    BudgetExhausted,
}

impl TerminalReason {
    /// Whether the process should exit successfully.
    pub fn is_success(self) -> bool {
        matches!(self, TerminalReason::FinalAnswer | TerminalReason::BudgetExhausted)
    }
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TerminalReason::FinalAnswer => "final answer",
            TerminalReason::ToolError => "tool error",
            TerminalReason::InferenceFailure => "inference failure",
            TerminalReason::BudgetExhausted => "iteration budget exhausted",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationRecord {
    pub index: usize,
    pub tool_called: Option<String>,
    pub arguments: Option<BoundArguments>,
    pub success: bool,
    /// Sentence replayed into every later prompt.
    pub result_summary: String,
}

#[derive(Debug)]
pub struct LoopState {
    iteration_count: usize,
    iteration_limit: usize,
    history: Vec<IterationRecord>,
    terminal: Option<TerminalReason>,
    final_answer: Option<String>,
    dispatches: usize,
}

impl LoopState {
    pub fn new(iteration_limit: usize) -> Self {
        Self {
            iteration_count: 0,
            iteration_limit,
            history: Vec::new(),
            terminal: None,
            final_answer: None,
            dispatches: 0,
        }
    }

    pub fn iteration(&self) -> usize {
        self.iteration_count
    }

    pub fn iteration_limit(&self) -> usize {
        self.iteration_limit
    }

    pub fn budget_exhausted(&self) -> bool {
        self.iteration_count >= self.iteration_limit
    }

    pub fn history(&self) -> &[IterationRecord] {
        &self.history
    }

    pub fn dispatches(&self) -> usize {
        self.dispatches
    }

    pub fn terminal(&self) -> Option<TerminalReason> {
        self.terminal
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// Counts a request actually sent to the tool host.
    pub fn note_dispatch(&mut self) {
        self.dispatches += 1;
    }

    /// Appends a success record and advances to the next iteration.
    pub fn record_success(&mut self, tool: &str, arguments: BoundArguments, result: &ToolResult) {
        let summary = format!(
            "In iteration {}, you called {tool} with {arguments} parameters, and the function returned {}.",
            self.iteration_count + 1,
            result.render()
        );
        self.history.push(IterationRecord {
            index: self.iteration_count,
            tool_called: Some(tool.to_string()),
            arguments: Some(arguments),
            success: true,
            result_summary: summary,
        });
        self.iteration_count += 1;
    }

    pub fn record_failure(
        &mut self,
        tool: Option<String>,
        arguments: Option<BoundArguments>,
        error: &ToolError,
    ) {
        self.history.push(IterationRecord {
            index: self.iteration_count,
            tool_called: tool,
            arguments,
            success: false,
            result_summary: format!("Error in iteration {}: {error}", self.iteration_count + 1),
        });
    }

    pub fn set_final_answer(&mut self, message: String) {
        self.final_answer = Some(message);
    }

    pub fn terminate(&mut self, reason: TerminalReason) {
        if self.terminal.is_none() {
            self.terminal = Some(reason);
        }
    }

    /// Flattened summaries of the most recent `window` records (`0` keeps
    /// all), preceded by a note when older ones were left out.
    pub fn context_summary(&self, window: usize) -> Option<String> {
        if self.history.is_empty() {
            return None;
        }
        let skipped = match window {
            0 => 0,
            n => self.history.len().saturating_sub(n),
        };
        let mut parts = Vec::with_capacity(self.history.len() - skipped + 1);
        if skipped > 0 {
            parts.push(format!("({skipped} earlier iterations omitted)"));
        }
        parts.extend(
            self.history[skipped..]
                .iter()
                .map(|record| record.result_summary.clone()),
        );
        Some(parts.join(" "))
    }

    /// Ends the run, consuming the state. A state that never terminated
    /// reports budget exhaustion.
    pub fn finish(self, run_id: Uuid, started_at: DateTime<Utc>) -> AgentOutcome {
        AgentOutcome {
            run_id,
            started_at,
            finished_at: Utc::now(),
            reason: self.terminal().unwrap_or(TerminalReason::BudgetExhausted),
            final_answer: self.final_answer,
            iterations: self.iteration_count,
            dispatches: self.dispatches,
            history: self.history,
        }
    }
}
