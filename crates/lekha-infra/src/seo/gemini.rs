//! Gemini-backed SEO assistant.
//!
//! Any failure (no key, transport error, non-2xx, unparseable text) degrades
//! to the offline heuristic; callers always get a suggestion.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use lekha_core::ports::SeoAssistant;
use lekha_core::seo::{SeoSuggestion, build_prompt, fallback_suggestion, parse_suggestion};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// `None` or empty disables the provider entirely.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum GeminiError {
    #[error("Gemini request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gemini returned status {status}")]
    Status { status: u16, body: String },

    #[error("Gemini response could not be parsed into suggestions")]
    Unparseable,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, empty when absent.
    fn first_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default()
    }
}

pub struct GeminiSeoAssistant {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiSeoAssistant {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn request(
        &self,
        api_key: &str,
        title: &str,
        content: &str,
    ) -> Result<SeoSuggestion, GeminiError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(title, content) }] }],
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": 1024,
            }
        });

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.json::<GenerateResponse>().await?.first_text();
        parse_suggestion(&text, title).ok_or(GeminiError::Unparseable)
    }
}

#[async_trait]
impl SeoAssistant for GeminiSeoAssistant {
    async fn generate(&self, title: &str, content: &str) -> SeoSuggestion {
        let Some(api_key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) else {
            return fallback_suggestion(title, content);
        };

        match self.request(api_key, title, content).await {
            Ok(suggestion) => suggestion,
            Err(GeminiError::Status { status, body }) => {
                tracing::warn!(status, body = %body, "Gemini API error");
                fallback_suggestion(title, content)
            }
            Err(GeminiError::Unparseable) => {
                tracing::warn!("Gemini response was not a JSON suggestion bundle");
                fallback_suggestion(title, content)
            }
            Err(e) => {
                tracing::error!(error = %e, "Gemini API exception");
                fallback_suggestion(title, content)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TITLE: &str = "Getting Started with Rust";
    const CONTENT: &str = "<p>Rust is a systems programming language focused on safety, speed and concurrency.</p>";

    fn assistant(server: &MockServer, timeout: Duration) -> GeminiSeoAssistant {
        GeminiSeoAssistant::new(GeminiConfig {
            api_key: Some("test-key".to_string()),
            base_url: server.uri(),
            timeout,
            ..Default::default()
        })
    }

    fn reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
    }

    #[tokio::test]
    async fn test_no_key_uses_fallback_without_calling_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let assistant = GeminiSeoAssistant::new(GeminiConfig {
            api_key: Some(String::new()),
            base_url: server.uri(),
            ..Default::default()
        });
        let suggestion = assistant.generate(TITLE, CONTENT).await;

        assert!(!suggestion.success);
        assert_eq!(suggestion.seo_score, 50);
        assert_eq!(suggestion.meta_title, TITLE);
    }

    #[tokio::test]
    async fn test_fenced_json_is_parsed_and_clamped() {
        let server = MockServer::start().await;
        let text = format!(
            "```json\n{}\n```",
            json!({
                "meta_title": "x".repeat(80),
                "meta_description": "Learn Rust basics",
                "focus_keyword": "rust basics",
                "keywords": ["a", "b", "c", "d", "e", "f"],
                "excerpt": "Short summary.",
                "seo_score": 140,
                "tips": ["Add images"]
            })
        );
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": { "topK": 40, "maxOutputTokens": 1024 }
            })))
            .respond_with(reply(&text))
            .expect(1)
            .mount(&server)
            .await;

        let suggestion = assistant(&server, Duration::from_secs(5))
            .generate(TITLE, CONTENT)
            .await;

        assert!(suggestion.success);
        assert_eq!(suggestion.meta_title.chars().count(), 60);
        assert_eq!(suggestion.keywords.len(), 5);
        assert_eq!(suggestion.seo_score, 100);
        assert_eq!(suggestion.focus_keyword, "rust basics");
    }

    #[tokio::test]
    async fn test_server_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let suggestion = assistant(&server, Duration::from_secs(5))
            .generate(TITLE, CONTENT)
            .await;

        assert!(!suggestion.success);
        assert_eq!(suggestion.tips.len(), 3);
    }

    #[tokio::test]
    async fn test_prose_reply_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply("Sorry, I cannot help with that."))
            .mount(&server)
            .await;

        let suggestion = assistant(&server, Duration::from_secs(5))
            .generate(TITLE, CONTENT)
            .await;

        assert!(!suggestion.success);
    }

    #[tokio::test]
    async fn test_empty_candidates_fall_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let suggestion = assistant(&server, Duration::from_secs(5))
            .generate(TITLE, CONTENT)
            .await;

        assert!(!suggestion.success);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply("{}").set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let suggestion = assistant(&server, Duration::from_millis(50))
            .generate(TITLE, CONTENT)
            .await;

        assert!(!suggestion.success);
    }
}
