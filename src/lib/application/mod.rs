//! # Application Module
//!
//! ## Submodules
//!
//! - [`agent`] - Bounded prompt/act loop and the one-line command grammar
//! - [`registry`] - Tools discovered on the host and their prompt catalog
//! - [`tooling`] - MCP session over a line-delimited stream and the stdio host

pub mod agent;
pub mod registry;
pub mod tooling;
