use thiserror::Error;

// Upstream (generative-language API) failures
#[derive(Debug, Error)]
pub enum ChatbotError {
    #[error("no api key configured")]
    MissingApiKey,
    #[error("http call resulted in error: {0}")]
    Http(reqwest::Error),
    #[error("upstream replied with status {0}")]
    Status(reqwest::StatusCode),
    #[error("unexpected upstream response: {0}")]
    UnexpectedShape(String),
}

impl ChatbotError {
    /// Fixed text shown to the user in place of the upstream error.
    pub fn fallback_reply(&self) -> &'static str {
        match self {
            ChatbotError::MissingApiKey | ChatbotError::Http(_) => "Could not reach the assistant.",
            ChatbotError::Status(_) => "Assistant request failed.",
            ChatbotError::UnexpectedShape(_) => "Error reading assistant response.",
        }
    }
}
