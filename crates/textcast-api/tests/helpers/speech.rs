use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use textcast_processing::{
    AudioFormat, AudioTranscoder, SpeechError, SpeechSynthesizer, TranscodeError,
};

pub const FAKE_WAV: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

/// Synthesizer returning a fixed WAV payload and recording every SSML document.
#[derive(Default)]
pub struct FakeSynthesizer {
    calls: AtomicUsize,
    documents: Mutex<Vec<String>>,
    fail: bool,
}

impl FakeSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request is rejected as the real service does for a bad key.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn documents(&self) -> Vec<String> {
        self.documents.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, ssml: &str) -> Result<Bytes, SpeechError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.documents.lock().unwrap().push(ssml.to_string());
        if self.fail {
            return Err(SpeechError::Service {
                status: 401,
                body: "Unauthorized".to_string(),
            });
        }
        Ok(Bytes::from_static(FAKE_WAV))
    }
}

/// Transcoder that copies the input so the pipeline can run without ffmpeg.
pub struct CopyTranscoder;

#[async_trait]
impl AudioTranscoder for CopyTranscoder {
    async fn transcode(
        &self,
        input_path: &Path,
        output_path: &Path,
        _format: AudioFormat,
    ) -> Result<(), TranscodeError> {
        tokio::fs::copy(input_path, output_path).await?;
        Ok(())
    }
}
