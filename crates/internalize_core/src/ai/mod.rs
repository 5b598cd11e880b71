//! Text-generation collaborator contract.
//!
//! # Responsibility
//! - Define the seam between the capture workflow and an AI model.
//! - Classify upstream failures so callers can show a useful message.
//!
//! # Invariants
//! - Implementations make exactly one request per `generate` call; no retries.
//! - Prompt text and image bytes are never logged.

pub mod gemini;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use gemini::GeminiClient;

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Inline image sent alongside the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// IANA media type, e.g. `image/png`.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// One generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub image: Option<ImagePayload>,
}

/// Upstream failure of a generation call.
#[derive(Debug)]
pub enum GenerationError {
    /// No API key is configured.
    MissingApiKey,
    /// Provider rejected the credentials.
    InvalidCredentials(String),
    /// Provider throttled the request.
    RateLimited(String),
    /// Requested model does not exist.
    ModelNotFound(String),
    /// Any other non-success HTTP status.
    Http { status: u16, body: String },
    /// Request never completed.
    Transport(reqwest::Error),
    /// Response arrived but carried no usable text.
    EmptyResponse,
    /// Response body could not be decoded.
    InvalidResponse(String),
}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "no API key configured for text generation"),
            Self::InvalidCredentials(body) => write!(f, "API credentials rejected: {body}"),
            Self::RateLimited(body) => write!(f, "rate limited by provider: {body}"),
            Self::ModelNotFound(model) => write!(f, "model not found: {model}"),
            Self::Http { status, body } => write!(f, "provider returned status {status}: {body}"),
            Self::Transport(err) => write!(f, "request failed: {err}"),
            Self::EmptyResponse => write!(f, "provider returned no text"),
            Self::InvalidResponse(message) => write!(f, "invalid provider response: {message}"),
        }
    }
}

impl Error for GenerationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// AI model that turns a prompt into free text.
pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerationResult<String>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, request: &GenerationRequest) -> GenerationResult<String> {
        (**self).generate(request)
    }
}
