//! HTTP client for the remote companion service.
//!
//! Four endpoints: chat, speech synthesis, history, and memory clear.
//! Reply decoding is deliberately tolerant; missing fields fall back to
//! defaults instead of failing the round trip.

use crate::config::ApiConfig;
use crate::emotion::Emotion;
use crate::error::{ClientError, Result};
use base64::Engine as _;
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;

/// A parsed reply from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Reply text to reveal and speak.
    pub text: String,
    /// Detected emotion, `Neutral` when absent or unrecognized.
    pub emotion: Emotion,
    /// Whether the server asserted a high-priority condition.
    pub crisis: bool,
}

/// Outcome of a remote synthesis request.
#[derive(Debug, Clone)]
pub enum SynthesisOutcome {
    /// Playable audio payload (raw bytes or decoded base64).
    Audio(Bytes),
    /// The server asked the client to use its local voice.
    Fallback,
}

/// One user/bot exchange from the server-side history, chronological
/// ascending.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryEntry {
    /// What the user said.
    #[serde(default)]
    pub user_msg: String,
    /// What the companion answered.
    #[serde(default)]
    pub bot_msg: String,
}

#[derive(Debug, Deserialize)]
struct ChatReplyWire {
    #[serde(default)]
    response: String,
    #[serde(default)]
    emotion: Option<String>,
    #[serde(default)]
    crisis: bool,
}

#[derive(Debug, Deserialize)]
struct SynthesisReplyWire {
    #[serde(default)]
    audio: Option<String>,
    #[serde(default)]
    fallback: bool,
}

#[derive(Debug, Deserialize)]
struct HistoryWire {
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

/// HTTP client for the companion endpoints.
///
/// Cheap to clone; all calls share one connection pool.
#[derive(Debug, Clone)]
pub struct RemoteApi {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteApi {
    /// Create a client for the configured base URL.
    ///
    /// Requests carry no timeout; a stalled call resolves only when the
    /// transport itself gives up.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    /// Send one user message and parse the companion's reply.
    ///
    /// # Errors
    ///
    /// `Server` for a non-success status, `Transport` when the endpoint
    /// is unreachable or the body is undecodable.
    pub async fn chat(&self, message: &str) -> Result<ChatReply> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("chat request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
            });
        }

        let wire: ChatReplyWire = response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("chat reply undecodable: {e}")))?;

        Ok(ChatReply {
            text: wire.response,
            emotion: wire
                .emotion
                .as_deref()
                .map(Emotion::parse)
                .unwrap_or_default(),
            crisis: wire.crisis,
        })
    }

    /// Request synthesized audio for `text`.
    ///
    /// The reply is interpreted by declared content shape: an `audio/*`
    /// body is the payload itself; a JSON body either carries base64
    /// audio or delegates to the local voice. A JSON body with neither
    /// is treated as a delegation.
    ///
    /// # Errors
    ///
    /// `Synthesis` for any status, transport, or decode failure; callers
    /// degrade to the local tier.
    pub async fn synthesize(&self, text: &str) -> Result<SynthesisOutcome> {
        let url = format!("{}/api/tts", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| ClientError::Synthesis(format!("synthesis request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Synthesis(format!(
                "synthesis endpoint returned HTTP {status}"
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        if content_type.starts_with("audio/") {
            let audio = response
                .bytes()
                .await
                .map_err(|e| ClientError::Synthesis(format!("audio body unreadable: {e}")))?;
            return Ok(SynthesisOutcome::Audio(audio));
        }

        let wire: SynthesisReplyWire = response
            .json()
            .await
            .map_err(|e| ClientError::Synthesis(format!("synthesis reply undecodable: {e}")))?;

        if let Some(encoded) = wire.audio {
            let decoded = base64::engine::general_purpose::STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| ClientError::Synthesis(format!("audio payload not base64: {e}")))?;
            return Ok(SynthesisOutcome::Audio(Bytes::from(decoded)));
        }

        if !wire.fallback {
            debug!("synthesis reply carried neither audio nor a fallback marker");
        }
        Ok(SynthesisOutcome::Fallback)
    }

    /// Fetch recent server-side history, chronological ascending.
    ///
    /// # Errors
    ///
    /// `Server` for a non-success status, `Transport` otherwise.
    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        let url = format!("{}/api/history", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("history request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
            });
        }

        let wire: HistoryWire = response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("history reply undecodable: {e}")))?;
        Ok(wire.history)
    }

    /// Ask the server to clear its conversation memory.
    ///
    /// # Errors
    ///
    /// `Server` for a non-success status, `Transport` otherwise. Callers
    /// fire and forget this and ignore the outcome.
    pub async fn clear_memory(&self) -> Result<()> {
        let url = format!("{}/api/clear_memory", self.base_url);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("memory clear request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
