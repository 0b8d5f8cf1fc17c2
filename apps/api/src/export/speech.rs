//! Interview-question speech synthesis.
//!
//! The question text is sanitized first: markdown emphasis characters are
//! removed and leading list bullets/enumerators are stripped, so the voice
//! does not read formatting aloud.

use std::time::Duration;

use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const TTS_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
const TTS_VOICE: &str = "Kore";

/// Strips markdown decoration so the synthesized voice reads only words.
pub fn sanitize_for_speech(text: &str) -> String {
    let mut cleaned = String::new();
    for line in text.lines() {
        let line = strip_list_prefix(line.trim_start());
        let line: String = line.chars().filter(|c| !matches!(c, '*' | '_' | '#')).collect();
        if !line.trim().is_empty() {
            if !cleaned.is_empty() {
                cleaned.push(' ');
            }
            cleaned.push_str(line.trim());
        }
    }
    cleaned
}

fn strip_list_prefix(line: &str) -> &str {
    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return rest.trim_start();
        }
    }
    // Enumerators like "1. " or "2) ".
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest.trim_start();
        }
    }
    line
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("TTS API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("TTS response carried no audio payload")]
    NoAudio,
}

/// Synthesized audio plus its reported MIME type.
pub struct SpeechAudio {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TtsRequest<'a> {
    contents: Vec<TtsContent<'a>>,
    generation_config: TtsGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct TtsContent<'a> {
    parts: Vec<TtsPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TtsPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TtsGenerationConfig<'a> {
    response_modalities: [&'a str; 1],
    speech_config: SpeechConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig<'a> {
    voice_config: VoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig<'a> {
    prebuilt_voice_config: PrebuiltVoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig<'a> {
    voice_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct TtsResponse {
    #[serde(default)]
    candidates: Vec<TtsCandidate>,
}

#[derive(Debug, Deserialize)]
struct TtsCandidate {
    content: TtsResponseContent,
}

#[derive(Debug, Deserialize)]
struct TtsResponseContent {
    #[serde(default)]
    parts: Vec<TtsResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TtsResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Thin client for the provider's speech-capable model.
#[derive(Clone)]
pub struct SpeechClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SpeechClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url: TTS_API_URL.to_string(),
        }
    }

    /// Synthesizes already-sanitized text into audio bytes.
    pub async fn synthesize(&self, text: &str) -> Result<SpeechAudio, SpeechError> {
        let request_body = TtsRequest {
            contents: vec![TtsContent {
                parts: vec![TtsPart { text }],
            }],
            generation_config: TtsGenerationConfig {
                response_modalities: ["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: TTS_VOICE,
                        },
                    },
                },
            },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, TTS_MODEL);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| SpeechError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SpeechError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(SpeechError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: TtsResponse = serde_json::from_str(&body).map_err(|e| SpeechError::Api {
            status: status.as_u16(),
            message: format!("unparseable response body: {e}"),
        })?;

        let inline = parsed
            .candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .find_map(|p| p.inline_data)
            .ok_or(SpeechError::NoAudio)?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|_| SpeechError::NoAudio)?;

        debug!("Synthesized {} bytes of {}", bytes.len(), inline.mime_type);
        Ok(SpeechAudio {
            bytes,
            mime_type: inline.mime_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_removes_emphasis_characters() {
        assert_eq!(
            sanitize_for_speech("**¿Por qué _Rust_?**"),
            "¿Por qué Rust?"
        );
    }

    #[test]
    fn test_sanitize_strips_leading_bullets_and_enumerators() {
        assert_eq!(sanitize_for_speech("- primera pregunta"), "primera pregunta");
        assert_eq!(sanitize_for_speech("• segunda pregunta"), "segunda pregunta");
        assert_eq!(sanitize_for_speech("1. tercera pregunta"), "tercera pregunta");
        assert_eq!(sanitize_for_speech("2) cuarta pregunta"), "cuarta pregunta");
    }

    #[test]
    fn test_sanitize_joins_lines_and_drops_empties() {
        assert_eq!(
            sanitize_for_speech("## Pregunta\n\n* Cuéntame de una vez que\nfallaste."),
            "Pregunta Cuéntame de una vez que fallaste."
        );
    }

    #[test]
    fn test_sanitize_keeps_inline_numbers() {
        assert_eq!(
            sanitize_for_speech("¿Manejaste 3 servicios?"),
            "¿Manejaste 3 servicios?"
        );
    }
}
