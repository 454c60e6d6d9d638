//! Text-to-speech synthesis

pub mod azure;
pub mod ssml;

use async_trait::async_trait;
use bytes::Bytes;
use textcast_core::AppError;
use thiserror::Error;

pub use azure::AzureSpeechSynthesizer;
pub use ssml::build_ssml;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech request failed: {0}")]
    Request(String),

    #[error("Speech service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Speech service returned no audio")]
    EmptyAudio,

    #[error("Speech configuration error: {0}")]
    Config(String),
}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        AppError::Speech(err.to_string())
    }
}

/// Voice used to narrate descriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceProfile {
    pub language: String,
    pub voice: String,
    pub style: String,
    pub style_degree: String,
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self {
            language: "ja-JP".to_string(),
            voice: "ja-JP-DaichiNeural".to_string(),
            style: "customerservice".to_string(),
            style_degree: "3".to_string(),
        }
    }
}

/// Turns an SSML document into WAV audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, ssml: &str) -> Result<Bytes, SpeechError>;
}
