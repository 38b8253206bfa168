//! Gateway factory - creates the configured client

use super::clients::GeminiClient;
use super::traits::InferenceGateway;
use super::types::ModelError;
use crate::config::GatewaySettings;
use std::sync::Arc;
use tracing::info;

pub struct GatewayFactory;

impl GatewayFactory {
    /// Supported types: `gemini`, `google`, `google-ai`.
    pub fn create(
        settings: &GatewaySettings,
        api_key: String,
    ) -> Result<Arc<dyn InferenceGateway>, ModelError> {
        match settings.provider.to_lowercase().as_str() {
            "gemini" | "google" | "google-ai" => {
                info!(
                    provider = settings.provider.as_str(),
                    model = settings.model.as_str(),
                    "Using Gemini inference gateway"
                );
                Ok(Arc::new(GeminiClient::new(settings, Some(api_key))))
            }
            other => Err(ModelError::unsupported_provider(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_rejected() {
        let settings = GatewaySettings {
            provider: "ollama".into(),
            ..GatewaySettings::default()
        };
        let err = GatewayFactory::create(&settings, "key".into()).err().unwrap();
        assert!(matches!(err, ModelError::UnsupportedProvider { .. }));
    }

    #[test]
    fn gemini_aliases_resolve() {
        for provider in ["gemini", "Google", "google-ai"] {
            let settings = GatewaySettings {
                provider: provider.into(),
                ..GatewaySettings::default()
            };
            let gateway = GatewayFactory::create(&settings, "key".into()).unwrap();
            assert_eq!(gateway.id(), provider);
        }
    }
}
