//! Spoken input capture as a small state machine.
//!
//! The host's speech recognition capability is event driven: `start` and
//! `stop` are requests, and the actual lifecycle arrives as events. The
//! capture tracks a three-state machine over those events and forwards
//! recognized transcripts to the dispatcher as if the user had typed
//! them.
//!
//! ```text
//! Idle --start--> Listening --stop/end--> Idle
//!                 Listening --error--> Error --end--> Idle
//! ```

use crate::dispatcher::MessageDispatcher;
use crate::error::{ClientError, Result};
use crate::surface::ChatSurface;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// State of the recognition session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaptureState {
    /// Not listening.
    #[default]
    Idle,
    /// The host microphone session is open.
    Listening,
    /// The host reported a recognition error; cleared by the session end.
    Error,
}

/// Events emitted by the host recognition capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Recognition began listening.
    Started,
    /// Best transcript alternative for a finished utterance.
    Result(String),
    /// Listening ended, by request or natural end of speech.
    Ended,
    /// Host-reported recognition error.
    Error(String),
}

/// Host speech recognition capability.
///
/// Implementations emit [`RecognitionEvent`]s on the channel handed to
/// [`VoiceInputCapture::spawn`].
pub trait SpeechRecognition: Send + Sync {
    /// Request that listening begin.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the request, e.g. because a
    /// session is already open.
    fn start(&self) -> Result<()>;

    /// Request that listening stop.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the request.
    fn stop(&self) -> Result<()>;
}

/// Variant for hosts without speech recognition. Never emits events, so
/// the capture stays permanently idle and no state machine runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecognizer;

impl SpeechRecognition for NullRecognizer {
    fn start(&self) -> Result<()> {
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        Ok(())
    }
}

/// Spoken input capture over a host recognition capability.
pub struct VoiceInputCapture {
    recognizer: Arc<dyn SpeechRecognition>,
    state: Arc<Mutex<CaptureState>>,
}

impl VoiceInputCapture {
    /// Start the capture's event loop and return the control handle.
    ///
    /// Recognized transcripts are written into the input field and sent
    /// through the dispatcher automatically (hands-free send).
    pub fn spawn(
        recognizer: Arc<dyn SpeechRecognition>,
        mut events: mpsc::Receiver<RecognitionEvent>,
        dispatcher: Arc<MessageDispatcher>,
        surface: Arc<dyn ChatSurface>,
    ) -> Arc<Self> {
        let capture = Arc::new(Self {
            recognizer,
            state: Arc::new(Mutex::new(CaptureState::Idle)),
        });

        let state = Arc::clone(&capture.state);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    RecognitionEvent::Started => {
                        set_state(&state, CaptureState::Listening);
                        surface.set_listening(true);
                    }
                    RecognitionEvent::Ended => {
                        set_state(&state, CaptureState::Idle);
                        surface.set_listening(false);
                    }
                    RecognitionEvent::Error(reason) => {
                        // Logged only; recognition errors never reach the
                        // transcript.
                        warn!("{}", ClientError::Recognition(reason));
                        set_state(&state, CaptureState::Error);
                        surface.set_listening(false);
                    }
                    RecognitionEvent::Result(transcript) => {
                        debug!("transcript: {transcript}");
                        surface.set_input(&transcript);
                        // Hands-free send; the dispatcher owns the outcome.
                        let dispatcher = Arc::clone(&dispatcher);
                        tokio::spawn(async move {
                            dispatcher.send_user_message(&transcript).await;
                        });
                    }
                }
            }
        });

        capture
    }

    /// Toggle listening.
    ///
    /// The only user-facing entry point, so a start is never requested
    /// while already listening. Host rejections are logged and dropped;
    /// the state machine only moves on events.
    pub fn toggle(&self) {
        let outcome = if self.state() == CaptureState::Listening {
            self.recognizer.stop()
        } else {
            self.recognizer.start()
        };
        if let Err(e) = outcome {
            warn!("recognition toggle rejected: {e}");
        }
    }

    /// Current state of the recognition session.
    #[must_use]
    pub fn state(&self) -> CaptureState {
        self.state.lock().map(|s| *s).unwrap_or_default()
    }
}

fn set_state(state: &Mutex<CaptureState>, next: CaptureState) {
    if let Ok(mut guard) = state.lock() {
        *guard = next;
    }
}
