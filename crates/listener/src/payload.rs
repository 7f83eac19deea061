//! The subset of GitHub webhook payloads the bot reads.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct WebhookPayload {
    #[serde(default)]
    pub(crate) action: Option<String>,
    #[serde(default)]
    pub(crate) issue: Option<IssuePayload>,
    #[serde(default)]
    pub(crate) comment: Option<CommentPayload>,
    #[serde(default)]
    pub(crate) label: Option<LabelPayload>,
    #[serde(default)]
    pub(crate) repository: Option<RepositoryPayload>,
    #[serde(default)]
    pub(crate) sender: Option<UserPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssuePayload {
    pub(crate) number: u64,
    /// Present (with URLs) only when the issue is a pull request.
    #[serde(default)]
    pub(crate) pull_request: Option<serde_json::Value>,
    #[serde(default)]
    pub(crate) assignees: Vec<UserPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentPayload {
    #[serde(default)]
    pub(crate) id: Option<u64>,
    #[serde(default)]
    pub(crate) body: Option<String>,
    #[serde(default)]
    pub(crate) user: Option<UserPayload>,
    #[serde(default)]
    pub(crate) created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LabelPayload {
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryPayload {
    pub(crate) name: String,
    pub(crate) owner: UserPayload,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserPayload {
    pub(crate) login: String,
    #[serde(default)]
    pub(crate) id: Option<u64>,
}
