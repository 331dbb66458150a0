//! Solace: voice-and-text companion chat client.
//!
//! This crate is the orchestration layer of a conversational companion:
//! it sends user text to a remote chat service and renders the reply as
//! synchronized-in-spirit audio and progressively typed text, while also
//! accepting spoken input.
//!
//! # Architecture
//!
//! One dispatch fans out to independent collaborators:
//! - **MessageDispatcher**: runs the request lifecycle and the busy
//!   indicator
//! - **VoiceOutputResolver**: tiered speech, remote synthesis first,
//!   host voice as fallback, one utterance at a time
//! - **RevealAnimator**: paced character-by-character text reveal,
//!   deliberately uncoordinated with audio
//! - **VoiceInputCapture**: host speech recognition as a three-state
//!   machine with hands-free send
//! - **InteractionCache**: bounded newest-first memory with server
//!   hydration
//! - **CrisisAlertController**: timed visibility for the server's
//!   crisis flag
//!
//! Host capabilities (audio output, local synthesis, speech
//! recognition) and the page surface are traits chosen once at startup;
//! absent capabilities get no-op variants so nothing else branches on
//! availability.

pub mod api;
pub mod cache;
pub mod config;
pub mod crisis;
pub mod dispatcher;
pub mod emotion;
pub mod error;
pub mod guided;
pub mod reveal;
pub mod stt;
pub mod surface;
pub mod tts;

pub use config::ClientConfig;
pub use dispatcher::MessageDispatcher;
pub use emotion::Emotion;
pub use error::{ClientError, Result};
