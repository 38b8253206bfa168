//! Model traits

use super::types::ModelError;
use async_trait::async_trait;

/// Single-turn text completion. Callers own timeouts and cancellation.
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Identifier used in logs and errors.
    fn id(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}
