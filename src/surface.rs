//! Seam to the page surface that displays the conversation.
//!
//! Markup and styling live in an external collaborator; the core only
//! drives it through these operations. Implementations must tolerate
//! being called from any task.

use crate::emotion::Emotion;
use std::sync::Arc;

/// A bot bubble being progressively filled by the reveal animator.
pub trait RevealTarget: Send + Sync {
    /// Remove any displayed content.
    fn clear(&self);

    /// Append a chunk of characters to the displayed content.
    fn append(&self, chunk: &str);
}

/// Operations the orchestrator performs against the page surface.
pub trait ChatSurface: Send + Sync {
    /// Append a finished user bubble.
    fn append_user(&self, text: &str);

    /// Append a finished bot bubble.
    fn append_bot(&self, text: &str);

    /// Open an empty bot bubble to be filled by the reveal animator.
    fn open_bot_slot(&self) -> Arc<dyn RevealTarget>;

    /// Show or hide the busy/typing indicator.
    fn set_typing(&self, active: bool);

    /// Update the emotion indicator.
    fn set_emotion(&self, emotion: Emotion);

    /// Show or hide the listening cue on the voice input control.
    fn set_listening(&self, active: bool);

    /// Show or hide the crisis alert.
    fn set_crisis_visible(&self, visible: bool);

    /// Replace the memory preview with the given lines.
    fn show_memory_preview(&self, lines: &[String]);

    /// Put text into the input field (voice transcripts land here).
    fn set_input(&self, text: &str);

    /// Empty the input field.
    fn clear_input(&self);
}
