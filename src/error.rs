//! Error types for the companion client.

/// Top-level error type for the voice-and-reveal client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Chat endpoint unreachable, or its reply was undecodable.
    #[error("transport error: {0}")]
    Transport(String),

    /// Remote collaborator answered with a non-success status.
    #[error("server error: HTTP {status}")]
    Server {
        /// HTTP status code returned by the endpoint.
        status: u16,
    },

    /// Remote speech synthesis failed or produced no playable audio.
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Host speech recognition reported an error.
    #[error("recognition error: {0}")]
    Recognition(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ClientError>;
