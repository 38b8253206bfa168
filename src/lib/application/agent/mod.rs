//! # Agent Module
//!
//! Bounded prompt/act loop over a single tool session.
//!
//! Each iteration builds a prompt from the fixed preamble, the scheduled
//! query and prior iteration summaries, asks the inference gateway for one
//! command line, and either finishes or dispatches one tool call.
//!
//! ## Key Types
//!
//! - [`Agent`] - The loop driver
//! - [`AgentOptions`] - Budget, timeout, query schedule and prompt text
//! - [`AgentOutcome`] - Report of a finished run
//! - [`LoopState`] - Per-run state, consumed when the run ends

mod binding;
mod directive;
mod errors;
mod instructions;
mod literal;
mod models;
mod runner;
mod state;

pub use binding::{CoercionError, bind_arguments, coerce};
pub use directive::{
    ARGUMENT_DELIMITER, CommandLine, FINAL_ANSWER_PREFIX, FUNCTION_CALL_PREFIX, parse_command,
};
pub use errors::{AgentError, ToolError};
pub use instructions::Instructions;
pub use literal::{LiteralError, parse_literal};
pub use models::{AgentOptions, AgentOutcome};
pub use runner::Agent;
pub use state::{IterationRecord, LoopState, TerminalReason};
