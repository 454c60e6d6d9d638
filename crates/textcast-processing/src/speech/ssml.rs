use super::VoiceProfile;

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// SSML document narrating `text` with the given voice and speaking style.
pub fn build_ssml(text: &str, voice: &VoiceProfile) -> String {
    format!(
        concat!(
            r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" "#,
            r#"xmlns:mstts="https://www.w3.org/2001/mstts" xml:lang="{lang}">"#,
            r#"<voice name="{voice}">"#,
            r#"<mstts:express-as style="{style}" styledegree="{degree}">"#,
            "{text}",
            "</mstts:express-as></voice></speak>"
        ),
        lang = escape_xml(&voice.language),
        voice = escape_xml(&voice.voice),
        style = escape_xml(&voice.style),
        degree = escape_xml(&voice.style_degree),
        text = escape_xml(text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssml_uses_voice_profile() {
        let ssml = build_ssml("こんにちは", &VoiceProfile::default());
        assert!(ssml.contains(r#"xml:lang="ja-JP""#));
        assert!(ssml.contains(r#"<voice name="ja-JP-DaichiNeural">"#));
        assert!(ssml.contains(r#"style="customerservice" styledegree="3""#));
        assert!(ssml.contains("こんにちは"));
    }

    #[test]
    fn test_ssml_escapes_markup_in_text() {
        let ssml = build_ssml("<b>Tom & Jerry</b>", &VoiceProfile::default());
        assert!(ssml.contains("&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"));
        assert!(!ssml.contains("<b>"));
    }
}
