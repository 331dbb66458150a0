//! Progressive character reveal for bot replies.
//!
//! Appends characters to a display target in small batches with a short
//! pause between batches, so replies appear to be typed. Pacing is
//! independent of any concurrent speech playback; the two are not
//! synchronized and may finish at different moments.

use crate::config::RevealConfig;
use crate::surface::RevealTarget;
use std::time::Duration;

/// Paces text into a display target in small character batches.
#[derive(Debug, Clone)]
pub struct RevealAnimator {
    chars_per_step: usize,
    step_delay: Duration,
}

impl RevealAnimator {
    /// Create an animator with the configured pacing.
    #[must_use]
    pub fn new(config: &RevealConfig) -> Self {
        Self {
            chars_per_step: config.chars_per_step.max(1),
            step_delay: Duration::from_millis(config.step_delay_ms),
        }
    }

    /// Clear `target` and reveal `text` into it, batch by batch.
    ///
    /// Returns only once every character has been appended. An empty
    /// `text` clears the target and suspends zero times. Calling this
    /// again on the same target restarts from an empty bubble.
    pub async fn reveal(&self, text: &str, target: &dyn RevealTarget) {
        target.clear();
        let mut first = true;
        for chunk in paced_chunks(text, self.chars_per_step) {
            if !first {
                tokio::time::sleep(self.step_delay).await;
            }
            first = false;
            target.append(chunk);
        }
    }
}

/// Split `text` into batches of at most `size` characters, respecting
/// character boundaries.
///
/// This is the cooperative half of the reveal: each yielded batch is one
/// unit of display work, and the consumer decides how to pace them.
pub fn paced_chunks(text: &str, size: usize) -> PacedChunks<'_> {
    PacedChunks {
        rest: text,
        size: size.max(1),
    }
}

/// Iterator over fixed-size character batches of a string.
#[derive(Debug, Clone)]
pub struct PacedChunks<'a> {
    rest: &'a str,
    size: usize,
}

impl<'a> Iterator for PacedChunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let split = self
            .rest
            .char_indices()
            .nth(self.size)
            .map_or(self.rest.len(), |(i, _)| i);
        let (head, tail) = self.rest.split_at(split);
        self.rest = tail;
        Some(head)
    }
}
