//! Tiered text-to-speech resolution.
//!
//! Replies are spoken through the remote synthesis endpoint when it can
//! produce audio, and through the host's local voice otherwise. At most
//! one local utterance is active at any time; starting a new one cancels
//! the previous.
//!
//! Host playback and local synthesis are capability traits selected once
//! at startup. An absent capability gets its `Null*` variant and the
//! resolver degrades through it without branching anywhere else.

use crate::api::{RemoteApi, SynthesisOutcome};
use crate::config::VoiceConfig;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

/// A host voice available for local synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    /// Voice name as reported by the host.
    pub name: String,
    /// Locale tag as reported by the host (e.g. "en-US").
    pub locale: String,
}

/// Handle of a started local utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtteranceId(Uuid);

impl UtteranceId {
    /// Mint a fresh utterance handle.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UtteranceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Host playback for remote-synthesized audio.
///
/// `play` resolves once playback ends and must release whatever resource
/// backs the payload before returning.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Play a decoded audio payload to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot play the payload; the
    /// resolver then falls through to the local voice.
    async fn play(&self, audio: bytes::Bytes) -> Result<()>;
}

/// Host-provided local speech synthesis.
pub trait LocalSynthesizer: Send + Sync {
    /// Voices the host can speak with.
    fn voices(&self) -> Vec<VoiceInfo>;

    /// Start speaking `text`, optionally with a specific voice.
    fn speak(&self, text: &str, voice: Option<&VoiceInfo>) -> UtteranceId;

    /// Stop the active utterance, if any.
    fn cancel(&self);
}

/// Playback variant for hosts without an audio output channel.
///
/// Always reports the payload as unplayable, so speech degrades to the
/// local tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudioSink;

#[async_trait]
impl AudioSink for NullAudioSink {
    async fn play(&self, _audio: bytes::Bytes) -> Result<()> {
        Err(ClientError::Synthesis("no audio output available".into()))
    }
}

/// Synthesis variant for hosts without a local voice. All calls no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSynthesizer;

impl LocalSynthesizer for NullSynthesizer {
    fn voices(&self) -> Vec<VoiceInfo> {
        Vec::new()
    }

    fn speak(&self, _text: &str, _voice: Option<&VoiceInfo>) -> UtteranceId {
        UtteranceId::new()
    }

    fn cancel(&self) {}
}

/// Volatile voice output state.
#[derive(Debug)]
struct VoiceSession {
    enabled: bool,
    active_utterance: Option<UtteranceId>,
}

/// Resolves reply text to spoken audio, remote tier first.
pub struct VoiceOutputResolver {
    api: Arc<RemoteApi>,
    sink: Arc<dyn AudioSink>,
    local: Arc<dyn LocalSynthesizer>,
    preferred_locales: Vec<String>,
    session: Mutex<VoiceSession>,
}

impl VoiceOutputResolver {
    /// Create a resolver over the given host capabilities.
    #[must_use]
    pub fn new(
        api: Arc<RemoteApi>,
        sink: Arc<dyn AudioSink>,
        local: Arc<dyn LocalSynthesizer>,
        config: &VoiceConfig,
    ) -> Self {
        Self {
            api,
            sink,
            local,
            preferred_locales: config.preferred_locales.clone(),
            session: Mutex::new(VoiceSession {
                enabled: config.enabled,
                active_utterance: None,
            }),
        }
    }

    /// Turn spoken replies on or off.
    pub fn set_enabled(&self, enabled: bool) {
        if let Ok(mut session) = self.session.lock() {
            session.enabled = enabled;
        }
    }

    /// Whether spoken replies are currently enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.session.lock().map(|s| s.enabled).unwrap_or(false)
    }

    /// Handle of the most recently started local utterance, if any.
    #[must_use]
    pub fn active_utterance(&self) -> Option<UtteranceId> {
        self.session
            .lock()
            .map(|s| s.active_utterance)
            .unwrap_or(None)
    }

    /// Speak `text`, remote tier first.
    ///
    /// No-op when voice output is disabled. Never fails: a tier that
    /// cannot produce audio hands over to the next, and the last tier's
    /// failures are logged and dropped.
    pub async fn speak(&self, text: &str) {
        if !self.is_enabled() {
            return;
        }
        match self.api.synthesize(text).await {
            Ok(SynthesisOutcome::Audio(audio)) => {
                if let Err(e) = self.sink.play(audio).await {
                    warn!("remote audio unplayable, using local voice: {e}");
                    self.speak_local(text);
                }
            }
            Ok(SynthesisOutcome::Fallback) => {
                debug!("synthesis endpoint delegated to the local voice");
                self.speak_local(text);
            }
            Err(e) => {
                warn!("remote synthesis unavailable: {e}");
                self.speak_local(text);
            }
        }
    }

    /// Speak through the host voice only, bypassing the remote tier.
    ///
    /// Used directly when the remote collaborator is known unreachable;
    /// not gated by the enabled flag, matching the offline fallback and
    /// guided prompts which always voice their fixed lines.
    pub fn speak_local(&self, text: &str) {
        // Cancel-before-speak keeps at most one utterance active.
        self.local.cancel();
        let voices = self.local.voices();
        let voice = pick_voice(&voices, &self.preferred_locales);
        let id = self.local.speak(text, voice.as_ref());
        if let Ok(mut session) = self.session.lock() {
            session.active_utterance = Some(id);
        }
    }
}

/// Choose a voice whose locale matches any preferred pattern, falling
/// back to the first available voice.
fn pick_voice(voices: &[VoiceInfo], preferred: &[String]) -> Option<VoiceInfo> {
    voices
        .iter()
        .find(|v| {
            preferred
                .iter()
                .any(|p| v.locale.to_ascii_lowercase().contains(&p.to_ascii_lowercase()))
        })
        .or_else(|| voices.first())
        .cloned()
}
