use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a webhook delivery into an event.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The payload file could not be read.
    #[error("failed to read webhook payload '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The payload file is not JSON.
    #[error("webhook payload '{}' is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The payload is JSON but does not have the shape its event name promises.
    #[error("malformed '{event_name}' payload: {message}")]
    Malformed { event_name: String, message: String },
}
