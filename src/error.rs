//! Error types shared across the page runtime and the widgets.

use thiserror::Error;

/// Errors raised by the document model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The selector string could not be parsed.
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector {
        /// The offending selector text.
        selector: String,
        /// What the parser choked on.
        reason: String,
    },

    /// An element the component requires is absent from the page.
    #[error("Missing element: {0}")]
    MissingElement(String),
}

/// Errors raised while exchanging a message with the chatbot endpoint.
#[derive(Error, Debug)]
pub enum ChatError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid endpoint URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The endpoint answered with a non-2xx status.
    #[error("Endpoint returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The body was not a `{"response": string}` object.
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Error reported by a speech capture session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}")]
pub struct SpeechError {
    /// Raw platform error code (e.g. `no-speech`, `not-allowed`).
    pub code: String,
}

impl SpeechError {
    /// Create an error from a platform code.
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Result type alias for document operations.
pub type DomResult<T> = std::result::Result<T, DomError>;
