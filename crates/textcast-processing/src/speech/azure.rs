//! Azure Cognitive Services text-to-speech over REST

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;

use super::{SpeechError, SpeechSynthesizer};

const OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";
const USER_AGENT: &str = concat!("textcast/", env!("CARGO_PKG_VERSION"));

pub struct AzureSpeechSynthesizer {
    http_client: Client,
    subscription_key: String,
    endpoint: String,
}

impl Debug for AzureSpeechSynthesizer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AzureSpeechSynthesizer")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Regional TTS endpoint, e.g. `https://japaneast.tts.speech.microsoft.com/cognitiveservices/v1`.
pub fn regional_endpoint(region: &str) -> String {
    format!(
        "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
        region
    )
}

impl AzureSpeechSynthesizer {
    /// `endpoint` overrides the regional endpoint derived from `region`.
    pub fn new(
        subscription_key: String,
        region: &str,
        endpoint: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SpeechError> {
        if subscription_key.is_empty() {
            return Err(SpeechError::Config(
                "speech subscription key is empty".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SpeechError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            subscription_key,
            endpoint: endpoint.unwrap_or_else(|| regional_endpoint(region)),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for AzureSpeechSynthesizer {
    async fn synthesize(&self, ssml: &str) -> Result<Bytes, SpeechError> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .header("User-Agent", USER_AGENT)
            .body(ssml.to_string())
            .send()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "Speech synthesis request rejected"
            );
            return Err(SpeechError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;

        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        tracing::info!(
            size_bytes = audio.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Speech synthesis successful"
        );

        Ok(audio)
    }
}
