//! Top-level message orchestration.
//!
//! One dispatch covers the whole round trip: chat request, cache update,
//! emotion indicator, spoken reply, progressive reveal, and the optional
//! crisis alert. Dispatches are not queued across user messages; the
//! typing indicator is a visual cue, not a lock.

use crate::api::{ChatReply, RemoteApi};
use crate::cache::{Interaction, InteractionCache};
use crate::config::ClientConfig;
use crate::crisis::CrisisAlertController;
use crate::error::ClientError;
use crate::reveal::RevealAnimator;
use crate::surface::ChatSurface;
use crate::tts::VoiceOutputResolver;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Failure bubble when the chat endpoint answers with an error status.
pub const SERVER_FAILURE_MESSAGE: &str = "Sorry, I couldn't reach Solace. Try again.";

/// Notice bubble when the service cannot be reached at all.
pub const OFFLINE_NOTICE: &str =
    "We're offline or the server had an error. Solace will still try to support you locally.";

/// Supportive reply used while offline, also spoken via the local voice.
pub const OFFLINE_REPLY: &str = "I hear you. Tell me more about what's on your mind.";

/// Orchestrates user messages through the remote service and out to the
/// surface, voice, cache, and crisis alert.
pub struct MessageDispatcher {
    api: Arc<RemoteApi>,
    surface: Arc<dyn ChatSurface>,
    voice: Arc<VoiceOutputResolver>,
    reveal: RevealAnimator,
    crisis: CrisisAlertController,
    cache: Mutex<InteractionCache>,
}

impl MessageDispatcher {
    /// Wire a dispatcher over the given collaborators.
    #[must_use]
    pub fn new(
        api: Arc<RemoteApi>,
        surface: Arc<dyn ChatSurface>,
        voice: Arc<VoiceOutputResolver>,
        config: &ClientConfig,
    ) -> Self {
        let crisis = CrisisAlertController::new(
            Arc::clone(&surface),
            Duration::from_millis(config.crisis.dwell_ms),
        );
        Self {
            api,
            surface,
            voice,
            reveal: RevealAnimator::new(&config.reveal),
            crisis,
            cache: Mutex::new(InteractionCache::new(config.cache.capacity)),
        }
    }

    /// Handle raw input from the input field or a voice transcript.
    ///
    /// Empty input is a no-op. The input field is cleared synchronously
    /// before any asynchronous work begins, so no two dispatches for the
    /// same user action can overlap.
    pub async fn send_user_message(&self, raw: &str) {
        let text = raw.trim();
        if text.is_empty() {
            return;
        }
        self.surface.append_user(text);
        self.surface.clear_input();
        self.dispatch(text).await;
    }

    async fn dispatch(&self, text: &str) {
        self.surface.set_typing(true);
        let outcome = self.api.chat(text).await;
        // Deactivated before any rendering, on every exit path.
        self.surface.set_typing(false);

        match outcome {
            Ok(reply) => self.handle_reply(text, reply).await,
            Err(ClientError::Server { status }) => {
                warn!("chat endpoint returned HTTP {status}");
                self.surface.append_bot(SERVER_FAILURE_MESSAGE);
            }
            Err(e) => {
                warn!("chat request failed: {e}");
                self.surface.append_bot(OFFLINE_NOTICE);
                self.surface.append_bot(OFFLINE_REPLY);
                // The remote collaborator is unreachable, so the spoken
                // fallback goes straight to the local tier.
                self.voice.speak_local(OFFLINE_REPLY);
            }
        }
    }

    async fn handle_reply(&self, user_text: &str, reply: ChatReply) {
        debug!(emotion = %reply.emotion, crisis = reply.crisis, "companion replied");
        self.record_interaction(user_text, &reply);
        self.surface.set_emotion(reply.emotion);

        let slot = self.surface.open_bot_slot();

        // Spoken reply runs concurrently with the reveal; neither waits
        // for the other, and speak failures are swallowed by the
        // resolver, so the task result is deliberately dropped.
        let voice = Arc::clone(&self.voice);
        let spoken = reply.text.clone();
        tokio::spawn(async move {
            voice.speak(&spoken).await;
        });

        self.reveal.reveal(&reply.text, slot.as_ref()).await;

        if reply.crisis {
            self.crisis.show();
        }
    }

    fn record_interaction(&self, user_text: &str, reply: &ChatReply) {
        let Ok(mut cache) = self.cache.lock() else {
            return;
        };
        cache.push(Interaction {
            timestamp: Utc::now(),
            user_text: user_text.to_owned(),
            bot_text: reply.text.clone(),
            emotion: reply.emotion,
        });
        self.surface.show_memory_preview(&cache.preview());
    }

    /// Fetch server history and adopt it as the local cache contents.
    ///
    /// Called once at startup; failure leaves the cache empty and is not
    /// surfaced.
    pub async fn hydrate_memory(&self) {
        match self.api.history().await {
            Ok(entries) => {
                let Ok(mut cache) = self.cache.lock() else {
                    return;
                };
                cache.hydrate(&entries);
                self.surface.show_memory_preview(&cache.preview());
                info!("hydrated {} cached interactions", cache.len());
            }
            Err(e) => debug!("history unavailable: {e}"),
        }
    }

    /// Clear the local cache and ask the server to do the same.
    ///
    /// The local clear is authoritative for display. The remote clear is
    /// spawned fire-and-forget and its failure deliberately ignored.
    pub fn clear_memory(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
            self.surface.show_memory_preview(&cache.preview());
        }
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            if let Err(e) = api.clear_memory().await {
                debug!("remote memory clear failed: {e}");
            }
        });
    }

    /// Turn spoken replies on or off for the session.
    pub fn set_voice_enabled(&self, enabled: bool) {
        self.voice.set_enabled(enabled);
    }

    /// Snapshot of the cached interactions, newest first.
    #[must_use]
    pub fn cached_interactions(&self) -> Vec<Interaction> {
        self.cache
            .lock()
            .map(|c| c.iter().cloned().collect())
            .unwrap_or_default()
    }
}
