use chrono::Utc;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use super::binding::bind_arguments;
use super::directive::{CommandLine, parse_command};
use super::errors::{AgentError, ToolError};
use super::instructions::Instructions;
use super::models::{AgentOptions, AgentOutcome};
use super::state::{LoopState, TerminalReason};
use crate::application::registry::ToolRegistry;
use crate::application::tooling::ToolSession;
use crate::model::{InferenceGateway, ModelError};

const PREVIEW_CHARS: usize = 160;

pub struct Agent<G: InferenceGateway + ?Sized> {
    gateway: Arc<G>,
    options: AgentOptions,
}

impl<G: InferenceGateway + ?Sized> Agent<G> {
    pub fn new(gateway: Arc<G>, options: AgentOptions) -> Self {
        Self { gateway, options }
    }

    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    /// Drives one run to a terminal reason. `session` must already be
    /// initialized; shutting it down stays with the caller.
    pub async fn run<S>(&self, session: &mut S) -> Result<AgentOutcome, AgentError>
    where
        S: ToolSession + ?Sized,
    {
        if self.options.queries.is_empty() {
            return Err(AgentError::NoQueries);
        }
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = info_span!("agent_run", %run_id, gateway = self.gateway.id());

        async move {
            info!(limit = self.options.iteration_limit, "Agent run started");
            let registry = ToolRegistry::discover(session).await?;
            let instructions = Instructions::compose(&self.options.prompt, &registry.catalog());
            let mut state = LoopState::new(self.options.iteration_limit);

            self.drive(&registry, &instructions, &mut state, session).await;
            let outcome = state.finish(run_id, started_at);
            info!(
                reason = %outcome.reason,
                iterations = outcome.iterations,
                dispatches = outcome.dispatches,
                "Agent run finished"
            );
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    /// Steps the loop until `state` records a terminal reason.
    async fn drive<S>(
        &self,
        registry: &ToolRegistry,
        instructions: &Instructions,
        state: &mut LoopState,
        session: &mut S,
    ) where
        S: ToolSession + ?Sized,
    {
        while !state.is_terminal() {
            if state.budget_exhausted() {
                warn!(limit = state.iteration_limit(), "Iteration budget exhausted");
                state.terminate(TerminalReason::BudgetExhausted);
                continue;
            }

            let iteration = state.iteration();
            let Some(query) = self.options.query_for(iteration) else {
                state.terminate(TerminalReason::BudgetExhausted);
                continue;
            };
            let context = state.context_summary(self.options.history_window);
            let prompt = instructions.prompt(query, context.as_deref());
            debug!(iteration, prompt_len = prompt.len(), "Submitting prompt to gateway");

            let response = match timeout(
                self.options.inference_timeout,
                self.gateway.generate(&prompt),
            )
            .await
            {
                Ok(Ok(text)) => text,
                Ok(Err(err)) => {
                    warn!(iteration, %err, "Inference failed");
                    state.terminate(TerminalReason::InferenceFailure);
                    continue;
                }
                Err(_) => {
                    let err = ModelError::timeout(self.gateway.id(), self.options.inference_timeout);
                    warn!(iteration, %err, "Inference timed out");
                    state.terminate(TerminalReason::InferenceFailure);
                    continue;
                }
            };
            debug!(iteration, response = %preview(&response), "Model responded");

            match parse_command(&response) {
                CommandLine::FinalAnswer { message } => {
                    info!(iteration, "Model returned final answer");
                    state.set_final_answer(message);
                    state.terminate(TerminalReason::FinalAnswer);
                }
                CommandLine::Malformed => {
                    let error = ToolError::Malformed {
                        preview: preview(&response),
                    };
                    warn!(iteration, %error, "Unrecognized model response");
                    state.record_failure(None, None, &error);
                    state.terminate(TerminalReason::ToolError);
                }
                CommandLine::ToolInvocation {
                    tool_name,
                    raw_args,
                } => {
                    if let Err(error) =
                        dispatch(registry, state, session, tool_name, &raw_args).await
                    {
                        warn!(iteration, %error, "Tool dispatch failed");
                        state.terminate(TerminalReason::ToolError);
                    }
                }
            }
        }
    }
}

/// Resolves, binds and invokes one tool, recording the outcome either way.
async fn dispatch<S>(
    registry: &ToolRegistry,
    state: &mut LoopState,
    session: &mut S,
    tool_name: String,
    raw_args: &[String],
) -> Result<(), ToolError>
where
    S: ToolSession + ?Sized,
{
    let Some(descriptor) = registry.lookup(&tool_name) else {
        let error = ToolError::UnknownTool(tool_name.clone());
        state.record_failure(Some(tool_name), None, &error);
        return Err(error);
    };

    let arguments = match bind_arguments(&descriptor.parameters, raw_args) {
        Ok(arguments) => arguments,
        Err(err) => {
            let error = ToolError::from(err);
            state.record_failure(Some(tool_name), None, &error);
            return Err(error);
        }
    };

    info!(tool = %tool_name, arguments = %arguments, "Dispatching tool call");
    state.note_dispatch();
    match session.call_tool(&tool_name, &arguments).await {
        Ok(result) => {
            if result.is_error {
                warn!(tool = %tool_name, "Tool host flagged the call as an error");
            }
            state.record_success(&tool_name, arguments, &result);
            Ok(())
        }
        Err(source) => {
            let error = ToolError::Channel {
                tool: tool_name.clone(),
                source,
            };
            state.record_failure(Some(tool_name), Some(arguments), &error);
            Err(error)
        }
    }
}

fn preview(text: &str) -> String {
    let trimmed = text.trim();
    let mut cut: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    if cut.len() < trimmed.len() {
        cut.push_str("...");
    }
    cut
}
