//! Narration pipeline setup

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use textcast_core::Config;
use textcast_processing::{
    AudioFormat, AzureSpeechSynthesizer, FfmpegTranscoder, Narrator, VoiceProfile,
};

pub fn voice_profile(config: &Config) -> VoiceProfile {
    VoiceProfile {
        language: config.speech_language().to_string(),
        voice: config.speech_voice().to_string(),
        style: config.speech_style().to_string(),
        style_degree: config.speech_style_degree().to_string(),
    }
}

pub fn setup_narrator(config: &Config) -> Result<Arc<Narrator>> {
    let synthesizer = AzureSpeechSynthesizer::new(
        config.azure_speech_key().to_string(),
        config.azure_service_region(),
        config.speech_endpoint().map(String::from),
        Duration::from_secs(config.speech_timeout_secs()),
    )
    .context("Failed to create speech client")?;

    let format: AudioFormat = config
        .speech_output_format()
        .parse()
        .context("Invalid SPEECH_OUTPUT_FORMAT")?;

    let mut narrator = Narrator::new(
        Arc::new(synthesizer),
        Arc::new(FfmpegTranscoder::new(config.ffmpeg_path())),
        voice_profile(config),
    )
    .with_format(format);

    if let Some(dir) = config.audio_work_dir() {
        narrator = narrator.with_work_dir(dir);
    }

    tracing::info!(
        region = %config.azure_service_region(),
        voice = %config.speech_voice(),
        format = ?format,
        "Narration pipeline initialized"
    );

    Ok(Arc::new(narrator))
}
