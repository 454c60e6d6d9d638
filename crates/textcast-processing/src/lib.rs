//! Textcast Processing Library
//!
//! Speech synthesis, audio transcoding and the narration pipeline that ties
//! them together.

pub mod narration;
pub mod speech;
pub mod transcode;

pub use narration::{NarratedAudio, NarrationError, Narrator};
pub use speech::{AzureSpeechSynthesizer, SpeechError, SpeechSynthesizer, VoiceProfile};
pub use transcode::{AudioFormat, AudioTranscoder, FfmpegTranscoder, TranscodeError};
