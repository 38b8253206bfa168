//! Core data types shared by the registry, the session channel and the agent loop.

pub mod tool;
pub mod value;

pub use tool::{CatalogEntry, DescriptorError, ParamType, ParameterSpec, ToolDescriptor};
pub use value::{ArgValue, BoundArguments};
