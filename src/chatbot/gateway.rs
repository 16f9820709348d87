use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::ChatbotError;
use crate::config::ChatbotConfig;
use crate::model::Todo;
use crate::summary;

/// Forwards chat messages, together with a digest of the todo list, to a
/// Gemini-style `generateContent` endpoint.
pub struct ChatbotGateway {
    client: reqwest::Client,
    base_url: Url,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for ChatbotGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatbotGateway")
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ChatbotGateway {
    pub fn new(config: &ChatbotConfig) -> Self {
        if config.api_key.is_none() {
            warn!("No chatbot api key configured, chatbot requests will fail.");
        }
        Self {
            client: reqwest::Client::new(),
            base_url: config.url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/models/{}:generateContent",
            self.base_url.as_str().trim_end_matches('/'),
            self.model
        )
    }

    #[instrument(skip(self, todos), fields(todos = todos.len()))]
    pub async fn reply(&self, message: &str, todos: &[Todo]) -> Result<String, ChatbotError> {
        let api_key = self.api_key.as_deref().ok_or(ChatbotError::MissingApiKey)?;
        let request = GenerateContentRequest::user(build_prompt(message, todos));

        // the request url carries the api key, keep it out of the errors
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|err| ChatbotError::Http(err.without_url()))?;

        let status = response.status();
        info!(status = status.as_u16(), "chatbot upstream replied");
        let body = response
            .text()
            .await
            .map_err(|err| ChatbotError::Http(err.without_url()))?;
        debug!(body = body.as_str(), "chatbot upstream body");

        if !status.is_success() {
            return Err(ChatbotError::Status(status));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|err| ChatbotError::UnexpectedShape(err.to_string()))?;
        parsed
            .first_text()
            .ok_or_else(|| ChatbotError::UnexpectedShape("no candidate text".into()))
    }
}

pub fn build_prompt(message: &str, todos: &[Todo]) -> String {
    format!(
        "You are a helpful task assistant. Here is the user's current to-do list:\n\n\
         {}\n\
         Now answer this question concisely: {}\n",
        summary::digest(todos),
        message
    )
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn user(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part { text: Some(prompt) }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    // candidates[0].content.parts[0].text
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}
