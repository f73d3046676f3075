//! Error types and the error-reporting sink

/// Errors that can occur in the dashboard client and simulator
#[derive(Debug, thiserror::Error)]
pub enum AquaSenseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Simulator error: {0}")]
    Simulator(String),
}

/// Result type alias for aquasense operations
pub type Result<T> = std::result::Result<T, AquaSenseError>;

/// Single destination for every failed fetch or action.
///
/// The dashboard never surfaces these to the user; the display keeps its
/// last good state and the failure goes here.
pub trait ErrorSink: Send + Sync + std::fmt::Debug {
    fn report(&self, operation: &str, error: &AquaSenseError);
}

/// Sink that logs failures through `tracing`
#[derive(Debug, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, operation: &str, error: &AquaSenseError) {
        tracing::error!("Error {}: {}", operation, error);
    }
}
