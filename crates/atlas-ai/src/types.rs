use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
/// Enumerates generation-boundary failures.
pub enum GenerationError {
    #[error("missing API key")]
    MissingApiKey,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned non-success status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("provider response contained no usable text")]
    EmptyResponse,
}

#[async_trait]
/// Trait contract for the external content-generation collaborator.
pub trait GenerationClient: Send + Sync {
    /// Produces the generated description for `prompt`, trimmed and
    /// non-empty on success.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
