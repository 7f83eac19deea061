//! One handler per comment command.
//!
//! Each handler runs a guard, fetches pull-request context when it needs it,
//! builds its payload and performs its outbound action. Guards that fail end
//! in [`Outcome::Ignored`]; only [`RepoClient`] faults are errors.

use tracing::{debug, info, warn};

use crate::{
    BotConfig, Command, DispatchEventType, DispatchPayload, IgnoreReason, IssueRef, Outcome,
    PullRequestHead, RepoClient, RouterError, StepFailure, FALLBACK_JOKE,
};

/// Everything a handler knows about the comment that invoked it.
pub(crate) struct CommentContext<'a> {
    pub(crate) client: &'a dyn RepoClient,
    pub(crate) config: &'a BotConfig,
    pub(crate) issue: &'a IssueRef,
    /// Lower-cased login of the commenter.
    pub(crate) actor: &'a str,
    pub(crate) is_pull_request: bool,
}

impl CommentContext<'_> {
    /// Looks up the pull request the comment was made on.
    ///
    /// `Err(outcome)` carries the no-op to return when there is none.
    async fn pull_request(&self) -> Result<Result<PullRequestHead, Outcome>, RouterError> {
        if !self.is_pull_request {
            return Ok(Err(Outcome::ignored(IgnoreReason::NotFromPullRequest)));
        }
        let pull = self
            .client
            .get_pull_request(&self.issue.owner, &self.issue.repo, self.issue.number)
            .await?;
        Ok(pull.ok_or_else(|| {
            info!(issue = %self.issue, "pull request not found, skipping command execution");
            Outcome::ignored(IgnoreReason::PullRequestNotFound)
        }))
    }
}

// ---------------------------------------------------------------------------
// Open commands
// ---------------------------------------------------------------------------

/// `/assign`: makes the commenter the sole assignee of an unassigned issue.
pub(crate) async fn assign(ctx: &CommentContext<'_>) -> Result<Outcome, RouterError> {
    if ctx.is_pull_request {
        info!("pull requests unsupported, skipping command execution");
        return Ok(Outcome::ignored(IgnoreReason::PullRequestUnsupported));
    }
    if ctx.issue.has_assignees() {
        info!("issue already has assignees, skipping command execution");
        return Ok(Outcome::ignored(IgnoreReason::AlreadyAssigned));
    }

    let assignee = ctx.actor.to_string();
    ctx.client
        .add_assignees(
            &ctx.issue.owner,
            &ctx.issue.repo,
            ctx.issue.number,
            std::slice::from_ref(&assignee),
        )
        .await?;
    info!(%assignee, issue = %ctx.issue, "assigned issue");
    Ok(Outcome::Assigned { assignee })
}

/// `/retest-failed`: re-runs the failed jobs of every failed `pull_request`
/// workflow run for the pull request's head commit.
///
/// Runs are re-triggered one after another. A failure does not stop the
/// remaining runs; all failures are reported together at the end.
pub(crate) async fn retest_failed(ctx: &CommentContext<'_>) -> Result<Outcome, RouterError> {
    let pull = match ctx.pull_request().await? {
        Ok(pull) => pull,
        Err(outcome) => {
            info!(%outcome, "skipping command execution");
            return Ok(outcome);
        }
    };

    let runs = ctx
        .client
        .list_failed_workflow_runs(&ctx.issue.owner, &ctx.issue.repo, &pull.head_sha)
        .await?;
    if runs.is_empty() {
        info!(head_sha = %pull.head_sha, "no failed workflow found, skipping command execution");
        return Ok(Outcome::ignored(IgnoreReason::NoFailedRuns));
    }
    info!(count = runs.len(), "found failed workflows, triggering re-run");

    let mut failures = Vec::new();
    for run in &runs {
        info!(run_id = %run.id, name = %run.name, "re-running workflow run");
        if let Err(error) = ctx
            .client
            .rerun_failed_jobs(&ctx.issue.owner, &ctx.issue.repo, run.id)
            .await
        {
            warn!(run_id = %run.id, %error, "failed to re-run workflow run");
            failures.push(StepFailure {
                target: run.id.to_string(),
                error,
            });
        }
    }

    if failures.is_empty() {
        Ok(Outcome::RerunTriggered { runs: runs.len() })
    } else {
        Err(RouterError::Incomplete {
            action: "workflow re-run".to_string(),
            attempted: runs.len(),
            failures,
        })
    }
}

// ---------------------------------------------------------------------------
// Privileged commands
// ---------------------------------------------------------------------------

/// Posts the refusal comment for an actor that is not on the allow list.
pub(crate) async fn not_allowed(
    ctx: &CommentContext<'_>,
    command: &Command,
) -> Result<Outcome, RouterError> {
    info!(actor = ctx.actor, command = command.name(), "user is not an owner, exiting");
    let body = format!(
        "👋 @{}, my apologies but I can't perform this action for you because your username is not in the allowlist in the file `{}`.",
        ctx.actor, ctx.config.allow_list_source
    );
    ctx.client
        .create_comment(&ctx.issue.owner, &ctx.issue.repo, ctx.issue.number, &body)
        .await?;
    Ok(Outcome::NotAllowed {
        actor: ctx.actor.to_string(),
        command: command.name().to_string(),
    })
}

/// `/make-me-laugh`: posts a joke, or [`FALLBACK_JOKE`] when the service
/// answer lacks a setup or punchline.
pub(crate) async fn make_me_laugh(ctx: &CommentContext<'_>) -> Result<Outcome, RouterError> {
    let joke = ctx.client.fetch_joke(&ctx.config.joke_url).await?;
    let (body, fallback) = match joke.render() {
        Some(text) => (text, false),
        None => {
            debug!(?joke, "joke response incomplete, using fallback");
            (FALLBACK_JOKE.to_string(), true)
        }
    };
    ctx.client
        .create_comment(&ctx.issue.owner, &ctx.issue.repo, ctx.issue.number, &body)
        .await?;
    Ok(Outcome::JokePosted { fallback })
}

/// What a CI-triggering command sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DispatchSpec {
    pub(crate) event_type: DispatchEventType,
    /// Command name without the leading `/`, echoed in the payload.
    pub(crate) command: String,
    pub(crate) args: Option<String>,
    pub(crate) previous_version: Option<String>,
}

impl DispatchSpec {
    /// Maps a CI-triggering command to its dispatch event.
    ///
    /// Returns `None` for commands that do not fire a dispatch event.
    pub(crate) fn for_command(command: &Command) -> Option<Self> {
        let bare = command.name().trim_start_matches('/').to_string();
        let spec = |event_type: &'static str, args: Option<&String>| Self {
            event_type: DispatchEventType::from_static(event_type),
            command: bare.clone(),
            args: args.cloned(),
            previous_version: None,
        };

        match command {
            Command::OkToTest => Some(spec("e2e-test", None)),
            Command::OkToPerf { args } => Some(spec("perf-test", Some(args))),
            Command::OkToPerfComponents { args } => Some(spec("components-perf-test", Some(args))),
            Command::TestSdk { args, .. } => Some(Self {
                event_type: DispatchEventType::new(bare.clone())?,
                command: bare.clone(),
                args: Some(args.clone()),
                previous_version: None,
            }),
            Command::TestVersionSkew {
                previous_version,
                args,
            } => Some(Self {
                event_type: DispatchEventType::new(bare.clone())?,
                command: bare.clone(),
                args: Some(args.clone()),
                previous_version: previous_version.clone(),
            }),
            Command::Assign
            | Command::RetestFailed
            | Command::MakeMeLaugh
            | Command::Unknown { .. } => None,
        }
    }
}

/// Fires the dispatch event described by `spec` against the pull request's
/// head commit.
pub(crate) async fn dispatch(
    ctx: &CommentContext<'_>,
    spec: DispatchSpec,
) -> Result<Outcome, RouterError> {
    let pull = match ctx.pull_request().await? {
        Ok(pull) => pull,
        Err(outcome) => {
            info!(command = %spec.command, %outcome, "skipping command execution");
            return Ok(outcome);
        }
    };

    let payload = DispatchPayload {
        pull_head_ref: pull.head_sha,
        pull_head_repo: pull.head_repo_full_name,
        command: spec.command,
        args: spec.args,
        previous_version: spec.previous_version,
        issue: ctx.issue.clone(),
    };
    ctx.client
        .create_dispatch_event(&ctx.issue.owner, &ctx.issue.repo, &spec.event_type, &payload)
        .await?;
    info!(
        event_type = %spec.event_type,
        ?payload,
        "triggered dispatch event"
    );
    Ok(Outcome::Dispatched {
        event_type: spec.event_type,
    })
}
