//! Narrated-audio synthesis for posts.
//!
//! Calls the external text-to-speech HTTP API with a post's plain text and
//! stores the returned MP3 under the uploads directory.

use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};
use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Serialize)]
struct SynthesisInput {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection {
    language_code: String,
    ssml_gender: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest {
    input: SynthesisInput,
    voice: VoiceSelection,
    audio_config: AudioConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

/// Client for the external text-to-speech API.
#[derive(Clone)]
pub struct NarrationService {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    uploads_dir: String,
}

impl NarrationService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.tts_api_url.clone(),
            api_key: config.tts_api_key.clone(),
            uploads_dir: config.uploads_dir.clone(),
        }
    }

    /// Synthesizes narration for a post's content and returns the URL path
    /// of the stored MP3.
    pub async fn narrate(&self, post_id: &str, content: &str) -> ServiceResult<String> {
        let plain_text = strip_html(content);

        let request = SynthesizeRequest {
            input: SynthesisInput { text: plain_text },
            voice: VoiceSelection {
                language_code: "en-US".to_string(),
                ssml_gender: "NEUTRAL".to_string(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3".to_string(),
            },
        };

        let mut builder = self
            .client
            .post(&self.api_url)
            .timeout(Duration::from_secs(30))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.query(&[("key", key)]);
        }

        let response = builder.send().await.map_err(|e| {
            ServiceError::external_service(format!("Speech synthesis request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(ServiceError::external_service(format!(
                "Speech synthesis failed with status {}",
                response.status()
            )));
        }

        let body: SynthesizeResponse = response.json().await.map_err(|e| {
            ServiceError::external_service(format!("Speech synthesis response invalid: {}", e))
        })?;

        let audio = general_purpose::STANDARD
            .decode(&body.audio_content)
            .map_err(|_| {
                ServiceError::external_service("Speech synthesis returned invalid audio")
            })?;

        let file_name = format!("audio_{}_{}.mp3", post_id, Utc::now().timestamp_millis());
        tokio::fs::create_dir_all(&self.uploads_dir)
            .await
            .map_err(|e| {
                ServiceError::internal_error(format!("Failed to create uploads dir: {}", e))
            })?;
        let file_path = Path::new(&self.uploads_dir).join(&file_name);
        tokio::fs::write(&file_path, &audio).await.map_err(|e| {
            ServiceError::internal_error(format!("Failed to write audio file: {}", e))
        })?;

        Ok(format!("/uploads/{}", file_name))
    }
}

/// Removes HTML tags from rendered post content, leaving the text to narrate.
fn strip_html(content: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid pattern"));
    re.replace_all(content, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_removes_tags() {
        assert_eq!(
            strip_html("<p>Hello <strong>world</strong></p>"),
            "Hello world"
        );
        assert_eq!(strip_html("no tags here"), "no tags here");
        assert_eq!(strip_html("<br/><img src=\"x.png\">text"), "text");
    }
}
