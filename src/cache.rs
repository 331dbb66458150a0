//! Bounded, newest-first cache of recent interactions.
//!
//! The cache backs the surface's memory preview and nothing else; it is
//! not persisted. It can be hydrated once from server-side history and
//! cleared explicitly.

use crate::api::HistoryEntry;
use crate::emotion::Emotion;
use chrono::{DateTime, Local, Utc};
use std::collections::VecDeque;

/// Number of server history entries adopted during hydration.
const HYDRATE_LIMIT: usize = 6;

/// Number of entries shown in the memory preview.
const PREVIEW_LIMIT: usize = 6;

/// User text prefix length in preview lines.
const PREVIEW_PREFIX_CHARS: usize = 28;

/// One recorded user/bot exchange. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    /// When the exchange completed.
    pub timestamp: DateTime<Utc>,
    /// What the user sent.
    pub user_text: String,
    /// What the companion answered.
    pub bot_text: String,
    /// Emotion tag attached to the reply.
    pub emotion: Emotion,
}

/// Bounded interaction cache, newest entry at index 0.
#[derive(Debug, Clone)]
pub struct InteractionCache {
    entries: VecDeque<Interaction>,
    capacity: usize,
}

impl InteractionCache {
    /// Create an empty cache holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, evicting the oldest entry past capacity.
    pub fn push(&mut self, interaction: Interaction) {
        self.entries.push_front(interaction);
        self.entries.truncate(self.capacity);
    }

    /// Replace the cache contents with recent server history.
    ///
    /// Takes the last [`HYDRATE_LIMIT`] entries of the chronologically
    /// ascending server list and reverses them so the newest exchange
    /// lands at index 0. History carries no emotion, so entries are
    /// tagged `Neutral`.
    pub fn hydrate(&mut self, entries: &[HistoryEntry]) {
        let start = entries.len().saturating_sub(HYDRATE_LIMIT);
        self.entries = entries[start..]
            .iter()
            .rev()
            .map(|h| Interaction {
                timestamp: Utc::now(),
                user_text: h.user_msg.clone(),
                bot_text: h.bot_msg.clone(),
                emotion: Emotion::Neutral,
            })
            .collect();
        self.entries.truncate(self.capacity);
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Render preview lines for the newest [`PREVIEW_LIMIT`] entries.
    ///
    /// Read-only; the user text is truncated to a short prefix.
    #[must_use]
    pub fn preview(&self) -> Vec<String> {
        self.entries
            .iter()
            .take(PREVIEW_LIMIT)
            .map(|i| {
                let prefix: String = i.user_text.chars().take(PREVIEW_PREFIX_CHARS).collect();
                let local = i.timestamp.with_timezone(&Local);
                format!("{}: {} -> {}", local.format("%Y-%m-%d %H:%M:%S"), prefix, i.emotion)
            })
            .collect()
    }

    /// Number of cached interactions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate newest-first.
    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.entries.iter()
    }
}
