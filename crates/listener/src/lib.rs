//! Repobot trigger event source.
//!
//! The bot runs as a GitHub Actions job. Actions hands it the webhook that
//! triggered the workflow as three pieces:
//!
//! | Variable | Contents |
//! |----------|----------|
//! | `GITHUB_EVENT_NAME` | Webhook event name (`issue_comment`, `issues`, ...) |
//! | `GITHUB_EVENT_PATH` | Path of a file holding the JSON webhook payload |
//! | `GITHUB_ACTOR` | Login of the user that triggered the run |
//!
//! [`EventDescriptor`] collects these, and [`load_event`] reads the payload and
//! normalises it into a [`commands::Event`]. Only `issue_comment`/`created` and
//! `issues`/`labeled` deliveries produce an event; everything else is
//! reported as unsupported and left alone.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Payload file access and webhook JSON shapes live here.
//! The [`commands`] crate sees only [`commands::Event`].

mod errors;
mod normalize;
mod payload;

use std::path::PathBuf;

use commands::Event;
use tracing::debug;

pub use errors::ListenerError;
pub use normalize::normalize_event;

/// Where to find one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    /// Webhook event name, e.g. `issue_comment`.
    pub event_name: String,
    /// JSON payload file.
    pub payload_path: PathBuf,
    /// Login that triggered the delivery. Falls back to the payload's
    /// `sender` when absent.
    pub actor: Option<String>,
}

/// Reads and normalises the delivery described by `descriptor`.
///
/// Returns `Ok(None)` when the delivery is not one the bot reacts to.
pub async fn load_event(descriptor: &EventDescriptor) -> Result<Option<Event>, ListenerError> {
    debug!(path = %descriptor.payload_path.display(), "reading webhook payload");
    let raw = tokio::fs::read(&descriptor.payload_path)
        .await
        .map_err(|source| ListenerError::Read {
            path: descriptor.payload_path.clone(),
            source,
        })?;
    let payload: serde_json::Value =
        serde_json::from_slice(&raw).map_err(|source| ListenerError::Parse {
            path: descriptor.payload_path.clone(),
            source,
        })?;
    normalize_event(
        &descriptor.event_name,
        payload,
        descriptor.actor.as_deref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_event_reads_payload_file() {
        let path = std::env::temp_dir().join(format!(
            "repobot-listener-{}.json",
            std::process::id()
        ));
        tokio::fs::write(
            &path,
            serde_json::json!({
                "action": "labeled",
                "label": {"name": "docs-needed"},
                "issue": {"number": 3, "assignees": []},
                "repository": {"name": "dapr", "owner": {"login": "dapr"}}
            })
            .to_string(),
        )
        .await
        .unwrap();

        let event = load_event(&EventDescriptor {
            event_name: "issues".into(),
            payload_path: path.clone(),
            actor: None,
        })
        .await
        .unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(matches!(event, Some(Event::IssueLabeled { .. })));
    }

    #[tokio::test]
    async fn missing_payload_file_is_an_error() {
        let err = load_event(&EventDescriptor {
            event_name: "issues".into(),
            payload_path: PathBuf::from("/nonexistent/repobot/event.json"),
            actor: None,
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ListenerError::Read { .. }));
    }
}
