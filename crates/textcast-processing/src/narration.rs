//! Narration pipeline: text to SSML, SSML to WAV, WAV to a compressed file.
//!
//! Every intermediate file lives in a per-call temporary directory owned by
//! the returned [`NarratedAudio`]. Dropping it (or any early return) removes
//! the directory and everything in it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use textcast_core::naming::audio_filename;
use textcast_core::AppError;
use thiserror::Error;

use crate::speech::{build_ssml, SpeechError, SpeechSynthesizer, VoiceProfile};
use crate::transcode::{AudioFormat, AudioTranscoder, TranscodeError};

#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("Nothing to narrate: text is empty")]
    EmptyText,

    #[error(transparent)]
    Synthesis(#[from] SpeechError),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error("Narration IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<NarrationError> for AppError {
    fn from(err: NarrationError) -> Self {
        match err {
            NarrationError::EmptyText => AppError::InvalidInput(err.to_string()),
            NarrationError::Synthesis(e) => e.into(),
            NarrationError::Transcode(e) => e.into(),
            NarrationError::Io(e) => e.into(),
        }
    }
}

/// A narrated audio file on local disk.
#[derive(Debug)]
pub struct NarratedAudio {
    _dir: TempDir,
    path: PathBuf,
    filename: String,
    format: AudioFormat,
}

impl NarratedAudio {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

pub struct Narrator {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    transcoder: Arc<dyn AudioTranscoder>,
    voice: VoiceProfile,
    format: AudioFormat,
    work_dir: Option<PathBuf>,
}

impl Narrator {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        transcoder: Arc<dyn AudioTranscoder>,
        voice: VoiceProfile,
    ) -> Self {
        Self {
            synthesizer,
            transcoder,
            voice,
            format: AudioFormat::default(),
            work_dir: None,
        }
    }

    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = format;
        self
    }

    /// Parent directory for temporary files; the system temp dir otherwise.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(work_dir.into());
        self
    }

    fn scratch_dir(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("narration-");
        match &self.work_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
    }

    #[tracing::instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn narrate(&self, text: &str) -> Result<NarratedAudio, NarrationError> {
        if text.trim().is_empty() {
            return Err(NarrationError::EmptyText);
        }

        let dir = self.scratch_dir()?;
        let filename = audio_filename(text, self.format.extension());
        let wav_path = dir.path().join("speech.wav");
        let output_path = dir.path().join(&filename);

        let ssml = build_ssml(text, &self.voice);
        let wav = self.synthesizer.synthesize(&ssml).await?;
        tokio::fs::write(&wav_path, &wav).await?;

        self.transcoder
            .transcode(&wav_path, &output_path, self.format)
            .await?;

        if let Err(e) = tokio::fs::remove_file(&wav_path).await {
            tracing::warn!(error = %e, path = %wav_path.display(), "Failed to remove intermediate WAV");
        }

        tracing::debug!(filename = %filename, "Narration ready");

        Ok(NarratedAudio {
            _dir: dir,
            path: output_path,
            filename,
            format: self.format,
        })
    }
}
