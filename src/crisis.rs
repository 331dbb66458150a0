//! Timed crisis alert visibility.

use crate::surface::ChatSurface;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Shows the crisis alert and hides it again after a fixed dwell.
///
/// A repeat `show` while the alert is visible restarts the dwell instead
/// of stacking a second alert.
pub struct CrisisAlertController {
    surface: Arc<dyn ChatSurface>,
    dwell: Duration,
    pending_hide: Mutex<Option<CancellationToken>>,
}

impl CrisisAlertController {
    /// Create a controller hiding the alert `dwell` after each `show`.
    #[must_use]
    pub fn new(surface: Arc<dyn ChatSurface>, dwell: Duration) -> Self {
        Self {
            surface,
            dwell,
            pending_hide: Mutex::new(None),
        }
    }

    /// Make the alert visible and (re)arm the hide timer.
    pub fn show(&self) {
        info!("crisis alert raised, dwell {:?}", self.dwell);
        self.surface.set_crisis_visible(true);

        let token = CancellationToken::new();
        if let Ok(mut pending) = self.pending_hide.lock()
            && let Some(previous) = pending.replace(token.clone())
        {
            previous.cancel();
        }

        let surface = Arc::clone(&self.surface);
        let dwell = self.dwell;
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(dwell) => {
                    surface.set_crisis_visible(false);
                }
            }
        });
    }
}
