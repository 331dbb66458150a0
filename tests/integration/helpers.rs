//! Shared fakes and builders for integration tests.

use solace::api::RemoteApi;
use solace::config::ClientConfig;
use solace::dispatcher::MessageDispatcher;
use solace::emotion::Emotion;
use solace::surface::{ChatSurface, RevealTarget};
use solace::tts::{AudioSink, LocalSynthesizer, UtteranceId, VoiceInfo, VoiceOutputResolver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// A bot bubble slot capturing everything revealed into it.
#[derive(Default)]
pub(crate) struct SlotTarget {
    content: Mutex<String>,
}

impl SlotTarget {
    pub(crate) fn content(&self) -> String {
        self.content.lock().unwrap().clone()
    }
}

impl RevealTarget for SlotTarget {
    fn clear(&self) {
        self.content.lock().unwrap().clear();
    }

    fn append(&self, chunk: &str) {
        self.content.lock().unwrap().push_str(chunk);
    }
}

/// Surface that records every call for assertions.
#[derive(Default)]
pub(crate) struct RecordingSurface {
    /// Finished bubbles as `(who, text)` pairs.
    pub bubbles: Mutex<Vec<(String, String)>>,
    /// Every typing indicator transition, in order.
    pub typing: Mutex<Vec<bool>>,
    pub emotion: Mutex<Option<Emotion>>,
    pub crisis_visible: AtomicBool,
    /// Latches true if the crisis alert was ever shown.
    pub crisis_was_shown: AtomicBool,
    pub preview: Mutex<Vec<String>>,
    pub input: Mutex<String>,
    pub slots: Mutex<Vec<Arc<SlotTarget>>>,
}

impl RecordingSurface {
    pub(crate) fn bubbles(&self) -> Vec<(String, String)> {
        self.bubbles.lock().unwrap().clone()
    }

    pub(crate) fn bot_texts(&self) -> Vec<String> {
        self.bubbles()
            .into_iter()
            .filter(|(who, _)| who == "bot")
            .map(|(_, text)| text)
            .collect()
    }

    pub(crate) fn typing(&self) -> Vec<bool> {
        self.typing.lock().unwrap().clone()
    }

    pub(crate) fn slots(&self) -> Vec<Arc<SlotTarget>> {
        self.slots.lock().unwrap().clone()
    }
}

impl ChatSurface for RecordingSurface {
    fn append_user(&self, text: &str) {
        self.bubbles
            .lock()
            .unwrap()
            .push(("user".to_owned(), text.to_owned()));
    }

    fn append_bot(&self, text: &str) {
        self.bubbles
            .lock()
            .unwrap()
            .push(("bot".to_owned(), text.to_owned()));
    }

    fn open_bot_slot(&self) -> Arc<dyn RevealTarget> {
        let slot = Arc::new(SlotTarget::default());
        self.slots.lock().unwrap().push(Arc::clone(&slot));
        slot
    }

    fn set_typing(&self, active: bool) {
        self.typing.lock().unwrap().push(active);
    }

    fn set_emotion(&self, emotion: Emotion) {
        *self.emotion.lock().unwrap() = Some(emotion);
    }

    fn set_listening(&self, _active: bool) {}

    fn set_crisis_visible(&self, visible: bool) {
        self.crisis_visible.store(visible, Ordering::SeqCst);
        if visible {
            self.crisis_was_shown.store(true, Ordering::SeqCst);
        }
    }

    fn show_memory_preview(&self, lines: &[String]) {
        *self.preview.lock().unwrap() = lines.to_vec();
    }

    fn set_input(&self, text: &str) {
        *self.input.lock().unwrap() = text.to_owned();
    }

    fn clear_input(&self) {
        self.input.lock().unwrap().clear();
    }
}

/// Local synthesizer recording the order of cancel/speak calls.
#[derive(Default)]
pub(crate) struct RecordingSynthesizer {
    pub calls: Mutex<Vec<String>>,
}

impl RecordingSynthesizer {
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn spoken(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("speak:").map(str::to_owned))
            .collect()
    }
}

impl LocalSynthesizer for RecordingSynthesizer {
    fn voices(&self) -> Vec<VoiceInfo> {
        vec![VoiceInfo {
            name: "test-voice".to_owned(),
            locale: "en-US".to_owned(),
        }]
    }

    fn speak(&self, text: &str, _voice: Option<&VoiceInfo>) -> UtteranceId {
        self.calls.lock().unwrap().push(format!("speak:{text}"));
        UtteranceId::new()
    }

    fn cancel(&self) {
        self.calls.lock().unwrap().push("cancel".to_owned());
    }
}

/// Audio sink recording every payload it played.
#[derive(Default)]
pub(crate) struct RecordingSink {
    pub played: Mutex<Vec<bytes::Bytes>>,
}

impl RecordingSink {
    pub(crate) fn played(&self) -> Vec<bytes::Bytes> {
        self.played.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AudioSink for RecordingSink {
    async fn play(&self, audio: bytes::Bytes) -> solace::Result<()> {
        self.played.lock().unwrap().push(audio);
        Ok(())
    }
}

/// Sink that cannot play anything, like a host without audio output.
pub(crate) struct FailingSink;

#[async_trait::async_trait]
impl AudioSink for FailingSink {
    async fn play(&self, _audio: bytes::Bytes) -> solace::Result<()> {
        Err(solace::ClientError::Synthesis("playback refused".into()))
    }
}

/// Everything a dispatcher test needs, wired over recording fakes.
pub(crate) struct Harness {
    pub surface: Arc<RecordingSurface>,
    pub synth: Arc<RecordingSynthesizer>,
    pub sink: Arc<RecordingSink>,
    pub dispatcher: Arc<MessageDispatcher>,
}

/// Config pointing at `base_url` with pacing shortened for tests.
pub(crate) fn fast_config(base_url: &str) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api.base_url = base_url.to_owned();
    config.reveal.step_delay_ms = 1;
    config.crisis.dwell_ms = 150;
    config
}

pub(crate) fn harness(base_url: &str) -> Harness {
    harness_with_config(fast_config(base_url))
}

pub(crate) fn harness_with_config(config: ClientConfig) -> Harness {
    let api = Arc::new(RemoteApi::new(&config.api));
    let surface = Arc::new(RecordingSurface::default());
    let synth = Arc::new(RecordingSynthesizer::default());
    let sink = Arc::new(RecordingSink::default());
    let voice = Arc::new(VoiceOutputResolver::new(
        Arc::clone(&api),
        Arc::clone(&sink) as Arc<dyn AudioSink>,
        Arc::clone(&synth) as Arc<dyn LocalSynthesizer>,
        &config.voice,
    ));
    let dispatcher = Arc::new(MessageDispatcher::new(
        api,
        Arc::clone(&surface) as Arc<dyn ChatSurface>,
        voice,
        &config,
    ));
    Harness {
        surface,
        synth,
        sink,
        dispatcher,
    }
}

/// Give spawned fire-and-forget tasks time to land.
pub(crate) async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
}
