//! Emotion tag attached to each companion reply.
//!
//! The remote collaborator classifies the user's message and returns one
//! of five tags with its reply. The tag only drives the surface's
//! emotion indicator and the memory preview; classification itself is
//! server-side.

use serde::{Deserialize, Serialize};

/// Emotion detected by the remote collaborator for one exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Sadness or grief.
    Sad,
    /// Worry or anxiety.
    Anxious,
    /// Anger or frustration.
    Angry,
    /// Positive or upbeat mood.
    Positive,
    /// No strong signal, or an unrecognized tag.
    #[default]
    Neutral,
}

impl Emotion {
    /// Parse a server-provided tag. Unknown or empty tags map to
    /// [`Emotion::Neutral`].
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "sad" => Self::Sad,
            "anxious" => Self::Anxious,
            "angry" => Self::Angry,
            "positive" => Self::Positive,
            _ => Self::Neutral,
        }
    }

    /// Glyph shown by the surface's emotion indicator.
    #[must_use]
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Sad => "\u{1F622}",
            Self::Anxious => "\u{1F61F}",
            Self::Angry => "\u{1F620}",
            Self::Positive => "\u{1F60A}",
            Self::Neutral => "\u{1F610}",
        }
    }

    /// Lowercase tag name, as used in memory preview lines.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Sad => "sad",
            Self::Anxious => "anxious",
            Self::Angry => "angry",
            Self::Positive => "positive",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
