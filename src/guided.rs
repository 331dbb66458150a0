//! Guided self-support exercises.
//!
//! Short scripted behaviors that ride on the same surface and voice
//! machinery as chat replies. None of these touch the remote chat
//! endpoint; the sleep wind-down is the only one that uses the tiered
//! voice path.

use crate::config::GuidedConfig;
use crate::surface::ChatSurface;
use crate::tts::VoiceOutputResolver;
use std::sync::Arc;
use std::time::Duration;

const BREATH_INTRO: &str = "Let's do a short 4-7-8 breath with me.";
const BREATH_SPOKEN_INTRO: &str = "Let's do a short breathing exercise together.";
const BREATH_STEPS: [&str; 3] = ["Breathe in 4", "Hold 7", "Exhale 8"];
const JOURNAL_PROMPT: &str = "Let's write a short journal entry. What's on your mind today?";
const SLEEP_WIND_DOWN: &str =
    "Relax. Close your eyes. Imagine a soft warm place. I will tell you a calming story.";
const CHECK_IN_PROMPT: &str = "Hi, how are you feeling right now, on a scale of 1 to 10?";

/// Runs the scripted guided behaviors.
pub struct GuidedExercises {
    surface: Arc<dyn ChatSurface>,
    voice: Arc<VoiceOutputResolver>,
    cycles: u32,
    inhale: Duration,
    hold: Duration,
    exhale: Duration,
}

impl GuidedExercises {
    /// Wire the exercises over the surface and voice resolver.
    #[must_use]
    pub fn new(
        surface: Arc<dyn ChatSurface>,
        voice: Arc<VoiceOutputResolver>,
        config: &GuidedConfig,
    ) -> Self {
        Self {
            surface,
            voice,
            cycles: config.breath_cycles,
            inhale: Duration::from_millis(config.inhale_ms),
            hold: Duration::from_millis(config.hold_ms),
            exhale: Duration::from_millis(config.exhale_ms),
        }
    }

    /// Paced 4-7-8 breathing rounds.
    ///
    /// Returns once the last round has finished.
    pub async fn breathing(&self) {
        self.surface.append_bot(BREATH_INTRO);
        self.voice.speak_local(BREATH_SPOKEN_INTRO);
        for _ in 0..self.cycles {
            self.surface.append_bot(BREATH_STEPS[0]);
            tokio::time::sleep(self.inhale).await;
            self.surface.append_bot(BREATH_STEPS[1]);
            tokio::time::sleep(self.hold).await;
            self.surface.append_bot(BREATH_STEPS[2]);
            tokio::time::sleep(self.exhale).await;
        }
    }

    /// Journal prompt, spoken with the local voice.
    pub fn journal(&self) {
        self.surface.append_bot(JOURNAL_PROMPT);
        self.voice.speak_local(JOURNAL_PROMPT);
    }

    /// Calming wind-down, spoken through the full tiered resolver.
    pub async fn sleep_wind_down(&self) {
        self.surface.append_bot(SLEEP_WIND_DOWN);
        self.voice.speak(SLEEP_WIND_DOWN).await;
    }

    /// Quick mood check-in, spoken with the local voice.
    pub fn check_in(&self) {
        self.surface.append_bot(CHECK_IN_PROMPT);
        self.voice.speak_local(CHECK_IN_PROMPT);
    }
}
