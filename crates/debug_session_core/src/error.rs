use std::time::Duration;
use thiserror::Error;

/// Failure of a single call against the debug-adapter server.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Debug data fetch failed: {}", join_errors(.0))]
    DebugData(Vec<TransportError>),
}

impl TransportError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server(message.into())
    }
}

fn join_errors(errors: &[TransportError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error surfaced by the session controller as its latest error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DebugError {
    #[error("Debug server is unavailable")]
    ServerUnavailable,

    #[error("Failed to start debug session: {0}")]
    SessionStartFailed(String),

    #[error("Step failed: {0}")]
    StepFailed(String),

    #[error("No active debug session")]
    NoActiveSession,

    #[error("Breakpoint sync failed: {0}")]
    BreakpointSyncFailed(String),

    #[error("Network timeout")]
    NetworkTimeout,

    #[error("{0}")]
    Unknown(String),
}
