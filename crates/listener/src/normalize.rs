use commands::{
    CommentId, CommentMetadata, Event, IssueNumber, IssueRef, LabelName, OwnerName,
    RepositoryName, Timestamp, UserId,
};
use tracing::info;

use crate::payload::{IssuePayload, RepositoryPayload, WebhookPayload};
use crate::ListenerError;

/// Converts a webhook delivery into an [`Event`].
///
/// `actor` overrides the payload's `sender.login` when given. Returns
/// `Ok(None)` for event/action combinations the bot does not handle.
pub fn normalize_event(
    event_name: &str,
    payload: serde_json::Value,
    actor: Option<&str>,
) -> Result<Option<Event>, ListenerError> {
    let malformed = |message: String| ListenerError::Malformed {
        event_name: event_name.to_string(),
        message,
    };
    let payload: WebhookPayload =
        serde_json::from_value(payload).map_err(|e| malformed(e.to_string()))?;
    let action = payload.action.as_deref().unwrap_or_default();

    match (event_name, action) {
        ("issue_comment", "created") => {
            let issue_payload = payload
                .issue
                .ok_or_else(|| malformed("missing 'issue'".into()))?;
            let comment = payload
                .comment
                .ok_or_else(|| malformed("missing 'comment'".into()))?;
            let issue = issue_ref(payload.repository, &issue_payload).map_err(malformed)?;

            let actor = actor
                .map(str::to_string)
                .or_else(|| payload.sender.as_ref().map(|s| s.login.clone()))
                .or_else(|| comment.user.as_ref().map(|u| u.login.clone()))
                .ok_or_else(|| malformed("cannot determine actor".into()))?;

            let metadata = CommentMetadata {
                comment_id: comment.id.map(CommentId::new),
                commenter_id: comment.user.as_ref().and_then(|u| u.id).map(UserId::new),
                created_at: comment
                    .created_at
                    .as_deref()
                    .and_then(Timestamp::parse_rfc3339),
            };

            Ok(Some(Event::CommentCreated {
                issue,
                comment_body: comment.body.unwrap_or_default(),
                actor,
                is_pull_request: issue_payload.pull_request.is_some(),
                metadata,
            }))
        }
        ("issues", "labeled") => {
            let issue_payload = payload
                .issue
                .ok_or_else(|| malformed("missing 'issue'".into()))?;
            let label = payload
                .label
                .and_then(|l| LabelName::new(l.name))
                .ok_or_else(|| malformed("missing 'label.name'".into()))?;
            let issue = issue_ref(payload.repository, &issue_payload).map_err(malformed)?;

            Ok(Some(Event::IssueLabeled { issue, label }))
        }
        _ => {
            info!(event_name, action, "event not supported, exiting");
            Ok(None)
        }
    }
}

fn issue_ref(
    repository: Option<RepositoryPayload>,
    issue: &IssuePayload,
) -> Result<IssueRef, String> {
    let repository = repository.ok_or("missing 'repository'")?;
    let owner = OwnerName::new(repository.owner.login).ok_or("empty repository owner")?;
    let repo = RepositoryName::new(repository.name).ok_or("empty repository name")?;
    Ok(
        IssueRef::new(owner, repo, IssueNumber::new(issue.number))
            .with_assignees(issue.assignees.iter().map(|a| a.login.clone())),
    )
}
