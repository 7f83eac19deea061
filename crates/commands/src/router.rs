//! The command router: classifies an event and runs exactly one handling path.

use std::sync::Arc;

use tracing::{debug, info};

use crate::handlers::{self, CommentContext, DispatchSpec};
use crate::{
    labels, BotConfig, Command, CommentMetadata, Event, IgnoreReason, IssueRef, Outcome,
    RepoClient, RouterError,
};

/// Routes inbound events to command handlers.
///
/// Holds the deployment configuration and the [`RepoClient`] every handler
/// acts through. Neither changes after construction.
pub struct CommandRouter {
    config: BotConfig,
    client: Arc<dyn RepoClient>,
}

impl CommandRouter {
    pub fn new(config: BotConfig, client: Arc<dyn RepoClient>) -> Self {
        Self { config, client }
    }

    /// Handles one event.
    ///
    /// Refusals and unmet preconditions are reported as [`Outcome`]s; only
    /// failed [`RepoClient`] calls produce an error.
    #[tracing::instrument(skip_all, fields(issue = %event.issue()))]
    pub async fn handle(&self, event: &Event) -> Result<Outcome, RouterError> {
        match event {
            Event::CommentCreated {
                issue,
                comment_body,
                actor,
                is_pull_request,
                metadata,
            } => {
                self.handle_comment(issue, comment_body, actor, *is_pull_request, metadata)
                    .await
            }
            Event::IssueLabeled { issue, label } => {
                info!(%label, "issue labeled");
                labels::handle_labeled(self.client.as_ref(), &self.config, issue, label).await
            }
        }
    }

    async fn handle_comment(
        &self,
        issue: &IssueRef,
        body: &str,
        actor: &str,
        is_pull_request: bool,
        metadata: &CommentMetadata,
    ) -> Result<Outcome, RouterError> {
        let actor = actor.to_lowercase();
        debug!(
            %actor,
            commenter_id = ?metadata.commenter_id.map(|id| id.as_u64()),
            comment_id = ?metadata.comment_id.map(|id| id.as_u64()),
            created_at = ?metadata.created_at.map(|ts| ts.to_string()),
            is_pull_request,
            "comment created"
        );

        let Some(command) = Command::parse(body) else {
            debug!("comment is not a command");
            return Ok(Outcome::ignored(IgnoreReason::NotACommand));
        };
        info!(command = command.name(), "command received");

        if let Command::Unknown { name } = &command {
            info!(command = %name, "command not found, exiting");
            return Ok(Outcome::ignored(IgnoreReason::UnknownCommand(name.clone())));
        }

        let ctx = CommentContext {
            client: self.client.as_ref(),
            config: &self.config,
            issue,
            actor: &actor,
            is_pull_request,
        };

        if command.is_privileged() && !self.config.allow_list.contains(&actor) {
            return handlers::not_allowed(&ctx, &command).await;
        }

        match &command {
            Command::Assign => handlers::assign(&ctx).await,
            Command::RetestFailed => handlers::retest_failed(&ctx).await,
            Command::MakeMeLaugh => handlers::make_me_laugh(&ctx).await,
            other => match DispatchSpec::for_command(other) {
                Some(spec) => handlers::dispatch(&ctx, spec).await,
                None => Ok(Outcome::ignored(IgnoreReason::UnknownCommand(
                    other.name().to_string(),
                ))),
            },
        }
    }
}
