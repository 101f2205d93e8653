use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{GenerationClient, GenerationError};

#[derive(Debug, Clone)]
/// Configuration for the Gemini `generateContent` endpoint.
pub struct GoogleConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone)]
/// Gemini client behind the [`GenerationClient`] seam.
pub struct GoogleClient {
    client: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleClient {
    pub fn new(config: GoogleConfig) -> Result<Self, GenerationError> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(
                config.request_timeout_ms.max(1),
            ))
            .build()?;

        Ok(Self { client, config })
    }

    fn generate_content_url(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        if base.contains(":generateContent") {
            return base.replace("{model}", &self.config.model);
        }
        format!("{base}/models/{}:generateContent", self.config.model)
    }
}

#[async_trait]
impl GenerationClient for GoogleClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = build_generate_content_body(prompt);
        let response = self
            .client
            .post(self.generate_content_url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(GenerationError::HttpStatus {
                status: status.as_u16(),
                body: raw,
            });
        }

        parse_generate_content_response(&raw)
    }
}

fn build_generate_content_body(prompt: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }],
        }],
    })
}

fn parse_generate_content_response(raw: &str) -> Result<String, GenerationError> {
    let parsed: GenerateContentResponse = serde_json::from_str(raw)?;
    let candidate = parsed
        .candidates
        .and_then(|mut candidates| candidates.drain(..).next())
        .ok_or(GenerationError::EmptyResponse)?;

    let parts = candidate
        .content
        .and_then(|content| content.parts)
        .unwrap_or_default();
    let text = parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<GenerateContentCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentCandidate {
    content: Option<GenerateContentContent>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentContent {
    parts: Option<Vec<GenerateContentPart>>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentPart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::{
        build_generate_content_body, parse_generate_content_response, GoogleClient, GoogleConfig,
    };
    use crate::{GenerationClient, GenerationError};

    fn client_for(base: String) -> GoogleClient {
        GoogleClient::new(GoogleConfig {
            api_base: base,
            api_key: "test-key".to_string(),
            model: "gemini-1.5-pro".to_string(),
            request_timeout_ms: 5_000,
        })
        .expect("client")
    }

    #[test]
    fn rejects_blank_api_key() {
        let result = GoogleClient::new(GoogleConfig {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: "  ".to_string(),
            model: "gemini-1.5-pro".to_string(),
            request_timeout_ms: 5_000,
        });
        assert!(matches!(result, Err(GenerationError::MissingApiKey)));
    }

    #[test]
    fn body_wraps_prompt_as_single_user_turn() {
        let body = build_generate_content_body("Décrire la clavicule");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Décrire la clavicule"
        );
    }

    #[test]
    fn extracts_and_joins_candidate_text_parts() {
        let raw = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "  Première partie. " },
                    { "text": "" },
                    { "text": "Seconde partie." }
                ]}
            }]
        })
        .to_string();
        let text = parse_generate_content_response(&raw).expect("text");
        assert_eq!(text, "Première partie.\nSeconde partie.");
    }

    #[test]
    fn empty_candidates_and_blank_parts_are_empty_responses() {
        for raw in [
            json!({}).to_string(),
            json!({ "candidates": [] }).to_string(),
            json!({ "candidates": [{ "content": { "parts": [] } }] }).to_string(),
            json!({ "candidates": [{ "content": { "parts": [{ "text": "   " }] } }] }).to_string(),
        ] {
            assert!(matches!(
                parse_generate_content_response(&raw),
                Err(GenerationError::EmptyResponse)
            ));
        }
    }

    #[tokio::test]
    async fn generate_posts_prompt_and_returns_text() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/models/gemini-1.5-pro:generateContent")
                .query_param("key", "test-key")
                .body_includes("Décrire : Clavicule.");
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "La clavicule est un os pair." }] }
                }]
            }));
        });

        let client = client_for(server.base_url());
        let text = client.generate("Décrire : Clavicule.").await.expect("text");
        assert_eq!(text, "La clavicule est un os pair.");
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn generate_surfaces_http_status_without_retrying() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/models/gemini-1.5-pro:generateContent");
            then.status(503).body("overloaded");
        });

        let client = client_for(server.base_url());
        let error = client.generate("prompt").await.expect_err("error");
        assert!(matches!(
            error,
            GenerationError::HttpStatus { status: 503, .. }
        ));
        // A single attempt only: re-selecting the leaf is the retry.
        mock.assert_calls(1);
    }
}
