//! Gemini client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::GatewaySettings;
use crate::infrastructure::model::traits::InferenceGateway;
use crate::infrastructure::model::types::ModelError;

/// Gemini `generateContent` client for Google AI
#[derive(Clone)]
pub struct GeminiClient {
    base: HttpClientBase,
    api_path: String,
    model: String,
}

impl GeminiClient {
    pub fn new(settings: &GatewaySettings, api_key: Option<String>) -> Self {
        Self {
            base: HttpClientBase::new(
                settings.provider.clone(),
                settings.endpoint.clone(),
                api_key,
            ),
            api_path: settings.api_path.clone(),
            model: settings.model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_model_url(&self) -> String {
        let path = format!(
            "{}/{}:generateContent",
            self.api_path.trim_matches('/'),
            self.model
        );
        self.base.build_url(&path)
    }
}

#[async_trait]
impl InferenceGateway for GeminiClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let url = self.build_model_url();
        let payload = GenerateRequest::user_prompt(prompt);

        info!(
            provider = self.base.id.as_str(),
            model = self.model.as_str(),
            prompt_len = prompt.len(),
            "Sending request to Gemini"
        );

        let response: GenerateResponse = self.base.post_with_query_key(&url, &payload).await?;
        debug!("Received response from Gemini");

        response
            .first_text()
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing text"))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

impl<'a> GenerateRequest<'a> {
    fn user_prompt(prompt: &'a str) -> Self {
        Self {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .unwrap_or_default()
            .into_iter()
            .flat_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_wraps_prompt_as_user_turn() {
        let body = serde_json::to_value(GenerateRequest::user_prompt("hi")).unwrap();
        assert_eq!(
            body,
            json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn first_text_part_wins() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"inlineData": {}}, {"text": "FINAL_ANSWER: [a]"}]}},
                {"content": {"parts": [{"text": "FINAL_ANSWER: [b]"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("FINAL_ANSWER: [a]"));

        let empty: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_text(), None);
    }

    #[test]
    fn model_url_includes_api_path_and_model() {
        let settings = GatewaySettings::default();
        let client = GeminiClient::new(&settings, Some("k".into()));
        assert_eq!(
            client.build_model_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(client.id(), "gemini");
    }
}
