//! Record identifiers and stored object names.

use chrono::Utc;
use uuid::Uuid;

const AUDIO_STEM_MAX_LEN: usize = 32;

fn filename_timestamp() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

fn random_hex() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Extension of `original_name` (text after the last `.`), reduced to ASCII
/// alphanumerics. Empty when there is no dot.
fn sanitized_extension(original_name: &str) -> String {
    original_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            ext.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Collision-resistant storage filename: `{YYYYmmdd_HHMMSS}_{32 hex}.{ext}`.
///
/// The extension of the client-supplied name is kept so the stored object
/// stays recognizable; everything else about the original name is discarded.
/// A name without extension produces a trailing `.`.
pub fn generate_unique_filename(original_name: &str) -> String {
    format!(
        "{}_{}.{}",
        filename_timestamp(),
        random_hex(),
        sanitized_extension(original_name)
    )
}

/// Fresh identifier for an extended upload record.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Filename for synthesized audio, prefixed with a readable stem taken from
/// the narrated text when it contains usable ASCII characters.
pub fn audio_filename(description: &str, extension: &str) -> String {
    let stem: String = description
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(AUDIO_STEM_MAX_LEN)
        .collect();
    let stem = stem.trim_matches('_');

    if stem.is_empty() {
        format!("{}_{}.{}", filename_timestamp(), random_hex(), extension)
    } else {
        format!(
            "{}_{}_{}.{}",
            stem,
            filename_timestamp(),
            random_hex(),
            extension
        )
    }
}

/// UTC timestamp used as part of record keys, microsecond precision.
pub fn upload_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}
