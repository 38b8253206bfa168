//! Model infrastructure module
//!
//! Inference gateways that turn one prompt into one completion.
//!
//! # Structure
//! - `types` - Error type
//! - `traits` - InferenceGateway trait
//! - `factory` - Builds the configured gateway
//! - `clients` - HTTP client implementations

pub mod clients;
pub mod factory;
pub mod traits;
pub mod types;

pub use factory::GatewayFactory;
pub use traits::InferenceGateway;
pub use types::ModelError;
