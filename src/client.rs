//! HTTP client for the multimodal inference backend
//!
//! Speaks the backend's wire protocol: multipart POSTs for the multimodal
//! and transcription endpoints, a GET with a percent-encoded path segment
//! for synthesis, and a plain-text health probe.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Config;
use crate::{Error, Result};

/// Response from the multimodal query endpoint
#[derive(Debug, Deserialize)]
struct MultimodalResponse {
    response: Option<String>,
    error: Option<String>,
}

/// Response from the transcription endpoint
#[derive(Debug, Deserialize)]
struct AsrResponse {
    transcription: Option<String>,
    error: Option<String>,
}

/// Client for the multimodal inference backend
///
/// Each operation issues exactly one request; no retries. The request
/// timeout comes from [`Config`] and applies to every call.
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.server.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Query the vision-language model with an image and a prompt
    ///
    /// An empty prompt asks the backend for a plain description of the
    /// image; a non-empty prompt carries the conversation transcript.
    ///
    /// # Errors
    ///
    /// Returns transport, status, decode, or backend failures
    pub async fn query_multimodal(&self, image: &[u8], prompt: &str) -> Result<String> {
        tracing::debug!(
            image_bytes = image.len(),
            prompt_chars = prompt.len(),
            "starting multimodal query"
        );

        let form = reqwest::multipart::Form::new()
            .text("prompt", prompt.to_string())
            .part(
                "file",
                reqwest::multipart::Part::bytes(image.to_vec())
                    .file_name("image.jpg")
                    .mime_str("image/jpeg")
                    .map_err(|e| Error::Config(e.to_string()))?,
            );

        let response = self
            .client
            .post(format!("{}/multimodal", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "multimodal request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        let text = fold_multimodal(status, response.text().await?)?;
        tracing::info!(chars = text.len(), "multimodal query complete");
        Ok(text)
    }

    /// Transcribe recorded speech to text
    ///
    /// # Arguments
    ///
    /// * `audio` - WAV bytes, mono, 16 kHz, 16-bit PCM
    ///
    /// # Errors
    ///
    /// Returns transport, status, decode, or backend failures
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting transcription");

        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(audio.to_vec())
                .file_name("audio.wav")
                .mime_str("audio/wav")
                .map_err(|e| Error::Config(e.to_string()))?,
        );

        let response = self
            .client
            .post(format!("{}/asr", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "transcription request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        let text = fold_asr(status, response.text().await?)?;
        tracing::info!(transcript = %text, "transcription complete");
        Ok(text)
    }

    /// Synthesize speech for a line of text
    ///
    /// The text travels percent-encoded in the URL path; the response body
    /// is the audio payload, returned verbatim.
    ///
    /// # Errors
    ///
    /// Returns transport or status failures, or a decode failure for an
    /// empty body
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        tracing::debug!(chars = text.len(), "starting speech synthesis");

        let url = format!("{}/tts/{}", self.base_url, urlencoding::encode(text));

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!(error = %e, "synthesis request failed");
            e
        })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "synthesis error status");
            return Err(Error::Status { status, body });
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(Error::Decode("synthesis returned an empty body".to_string()));
        }

        tracing::info!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }

    /// Probe backend connectivity
    ///
    /// # Errors
    ///
    /// Returns transport or status failures
    pub async fn health(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/hello", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status { status, body });
        }

        Ok(response.text().await?)
    }
}

/// Fold a multimodal reply into a typed result
///
/// `response` wins when present (it may be empty; the backend declining to
/// answer is not a failure here); a reported `error` is a backend failure
/// even on a non-success status, since the backend pairs its error payloads
/// with 4xx statuses. The status only decides when the body is not a
/// decodable payload.
fn fold_multimodal(status: StatusCode, body: String) -> Result<String> {
    match serde_json::from_str::<MultimodalResponse>(&body) {
        Ok(MultimodalResponse {
            response: Some(text),
            ..
        }) => Ok(text),
        Ok(MultimodalResponse {
            error: Some(message),
            ..
        }) => {
            tracing::error!(error = %message, "backend reported failure");
            Err(Error::Backend(message))
        }
        decoded => fold_unusable(status, body, decoded.err()),
    }
}

/// Fold a transcription reply into a typed result
fn fold_asr(status: StatusCode, body: String) -> Result<String> {
    match serde_json::from_str::<AsrResponse>(&body) {
        Ok(AsrResponse {
            transcription: Some(text),
            ..
        }) => Ok(text),
        Ok(AsrResponse {
            error: Some(message),
            ..
        }) => {
            tracing::error!(error = %message, "backend reported failure");
            Err(Error::Backend(message))
        }
        decoded => fold_unusable(status, body, decoded.err()),
    }
}

/// Classify a body that carried neither a result nor a reported error
fn fold_unusable<T>(
    status: StatusCode,
    body: String,
    parse_error: Option<serde_json::Error>,
) -> Result<T> {
    if status.is_success() {
        let reason = parse_error.map_or_else(
            || "payload carries neither a result nor an error field".to_string(),
            |e| format!("malformed payload: {e}"),
        );
        tracing::error!(body = %body, "decode failure: {reason}");
        return Err(Error::Decode(reason));
    }

    tracing::error!(status = %status, body = %body, "backend error status");
    Err(Error::Status { status, body })
}
