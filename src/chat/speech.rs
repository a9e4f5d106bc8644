//! Speech input capability.
//!
//! Whether speech recognition exists is decided once, when the widget is
//! built, and carried as a [`SpeechCapability`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::SpeechConfig;
use crate::error::SpeechError;

/// Settings for one capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    /// BCP-47 language tag.
    pub lang: String,
    /// Whether partial transcripts are reported.
    pub interim_results: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
            interim_results: false,
        }
    }
}

impl From<&SpeechConfig> for RecognitionConfig {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            lang: config.lang.clone(),
            interim_results: config.interim_results,
        }
    }
}

/// A speech recognition engine.
///
/// One call to [`capture`](Self::capture) is one session: it starts when the
/// future is first polled and ends when it resolves.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync + fmt::Debug {
    /// Resolves to the first final transcript, `None` if the session ended
    /// without one, or the platform error.
    async fn capture(&self, config: &RecognitionConfig) -> Result<Option<String>, SpeechError>;
}

/// Speech support resolved at startup.
#[derive(Clone, Default)]
pub enum SpeechCapability {
    Available(Arc<dyn SpeechRecognizer>),
    #[default]
    Unsupported,
}

impl SpeechCapability {
    /// Resolve the capability from an optional engine.
    pub fn detect(recognizer: Option<Arc<dyn SpeechRecognizer>>) -> Self {
        recognizer.map_or(Self::Unsupported, Self::Available)
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl fmt::Debug for SpeechCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(recognizer) => f.debug_tuple("Available").field(recognizer).finish(),
            Self::Unsupported => f.write_str("Unsupported"),
        }
    }
}
