//! Configuration types for the companion client.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Remote companion service connection settings.
    pub api: ApiConfig,
    /// Voice output settings.
    pub voice: VoiceConfig,
    /// Progressive text reveal pacing.
    pub reveal: RevealConfig,
    /// Interaction cache settings.
    pub cache: CacheConfig,
    /// Crisis alert settings.
    pub crisis: CrisisConfig,
    /// Guided exercise pacing.
    pub guided: GuidedConfig,
}

/// Remote companion service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the companion service.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".to_owned(),
        }
    }
}

/// Voice output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Whether spoken replies are enabled at startup.
    pub enabled: bool,
    /// Locale patterns for choosing a local voice. A voice whose locale
    /// tag contains any pattern (case-insensitive) is preferred; if none
    /// matches, the first available voice is used.
    pub preferred_locales: Vec<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            preferred_locales: vec![
                "en-US".to_owned(),
                "en_GB".to_owned(),
                "English".to_owned(),
            ],
        }
    }
}

/// Progressive text reveal pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Characters appended per step.
    pub chars_per_step: usize,
    /// Pause between steps in milliseconds.
    pub step_delay_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            chars_per_step: 6,
            step_delay_ms: 18,
        }
    }
}

/// Interaction cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of interactions retained locally.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

/// Crisis alert settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrisisConfig {
    /// How long the alert stays visible, in milliseconds.
    pub dwell_ms: u64,
}

impl Default for CrisisConfig {
    fn default() -> Self {
        Self { dwell_ms: 15_000 }
    }
}

/// Guided breathing exercise pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidedConfig {
    /// Number of breathing rounds per exercise.
    pub breath_cycles: u32,
    /// Inhale step duration in milliseconds.
    pub inhale_ms: u64,
    /// Hold step duration in milliseconds.
    pub hold_ms: u64,
    /// Exhale step duration in milliseconds.
    pub exhale_ms: u64,
}

impl Default for GuidedConfig {
    fn default() -> Self {
        Self {
            breath_cycles: 3,
            inhale_ms: 4_000,
            hold_ms: 7_000,
            exhale_ms: 8_000,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::ClientError::Config(e.to_string()))
    }
}
