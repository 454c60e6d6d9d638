//! Audio transcoding through ffmpeg

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use std::process::Stdio;
use std::str::FromStr;

use async_trait::async_trait;
use textcast_core::AppError;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to execute ffmpeg: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("FFmpeg transcode failed: {0}")]
    Failed(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),
}

impl From<TranscodeError> for AppError {
    fn from(err: TranscodeError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Compressed output formats for narrated audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    #[default]
    Mp3,
    Aac,
    Ogg,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Aac => "aac",
            AudioFormat::Ogg => "ogg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Aac => "audio/aac",
            AudioFormat::Ogg => "audio/ogg",
        }
    }

    fn codec(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "libmp3lame",
            AudioFormat::Aac => "aac",
            AudioFormat::Ogg => "libvorbis",
        }
    }

    fn container(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Aac => "adts",
            AudioFormat::Ogg => "ogg",
        }
    }
}

impl FromStr for AudioFormat {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mp3" => Ok(AudioFormat::Mp3),
            "aac" => Ok(AudioFormat::Aac),
            "ogg" => Ok(AudioFormat::Ogg),
            other => Err(TranscodeError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl Display for AudioFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

/// Converts an audio file on disk into another format.
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    async fn transcode(
        &self,
        input_path: &Path,
        output_path: &Path,
        format: AudioFormat,
    ) -> Result<(), TranscodeError>;
}

pub struct FfmpegTranscoder {
    ffmpeg_path: String,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    fn args(input_path: &Path, output_path: &Path, format: AudioFormat) -> Vec<String> {
        vec![
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
            "-acodec".to_string(),
            format.codec().to_string(),
            "-f".to_string(),
            format.container().to_string(),
            "-y".to_string(),
            output_path.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        input_path: &Path,
        output_path: &Path,
        format: AudioFormat,
    ) -> Result<(), TranscodeError> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffmpeg_path)
            .args(Self::args(input_path, output_path, format))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscodeError::Failed(stderr.trim().to_string()));
        }

        tracing::debug!(
            input = %input_path.display(),
            output = %output_path.display(),
            format = %format,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Audio transcode complete"
        );

        Ok(())
    }
}
