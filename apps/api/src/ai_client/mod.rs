//! AI client — the single point of entry for both external AI calls:
//! Whisper transcription and GPT-4 chat completion.
//!
//! No other module may call the OpenAI API directly. The handler depends on
//! the `AiBackend` trait, so the parsing core and the HTTP layer stay
//! testable without the services.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Transcription model for audio uploads.
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";
/// Completion model for the coaching analysis.
pub const COMPLETION_MODEL: &str = "gpt-4";
const COMPLETION_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("completion returned no content")]
    EmptyCompletion,
}

/// The two upstream AI calls the analysis pipeline needs, behind one seam.
///
/// Carried in `AppState` as `Arc<dyn AiBackend>`.
#[async_trait]
pub trait AiBackend: Send + Sync {
    /// Transcribes raw audio bytes to plain text.
    async fn transcribe(&self, audio: Bytes, mime: &str, filename: &str)
        -> Result<String, AiError>;

    /// Sends a system + user prompt pair and returns the free-text response.
    async fn complete(&self, system: &str, user: &str) -> Result<String, AiError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI-backed implementation of `AiBackend`.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url,
        }
    }

    async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(AiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl AiBackend for OpenAiClient {
    async fn transcribe(
        &self,
        audio: Bytes,
        mime: &str,
        filename: &str,
    ) -> Result<String, AiError> {
        let part = Part::bytes(audio.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime)?;
        let form = Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .text("response_format", "text")
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let response = Self::error_for_status(response).await?;
        let transcript = response.text().await?;

        debug!("transcription complete: {} chars", transcript.len());
        Ok(transcript)
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, AiError> {
        let request_body = ChatRequest {
            model: COMPLETION_MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: COMPLETION_TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let response = Self::error_for_status(response).await?;
        let chat: ChatResponse = response.json().await?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(AiError::EmptyCompletion)?;

        debug!("completion received: {} chars", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_serializes_messages_in_order() {
        let request = ChatRequest {
            model: COMPLETION_MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
            temperature: COMPLETION_TEMPERATURE,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_chat_response_missing_content_is_none() {
        let chat: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert_eq!(chat.choices[0].message.content, None);
    }

    #[test]
    fn test_chat_response_parses_content() {
        let chat: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"1. Overall Score\nSCORE: 8"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            chat.choices[0].message.content.as_deref(),
            Some("1. Overall Score\nSCORE: 8")
        );
    }
}
