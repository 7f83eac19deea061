//! Command domain for the repository bot.
//!
//! This crate turns a normalised GitHub event into at most a handful of
//! repository actions: it parses slash-commands from comments, checks the
//! allow list, and runs the matching handler against a [`RepoClient`].
//! Infrastructure crates implement [`RepoClient`] and build [`Event`]s; they
//! never add command rules.
//!
//! ## Layering
//!
//! Pure domain code plus the [`RepoClient`] port. Nothing in here touches the
//! network or the filesystem; the `github` and `listener` crates do that.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`IssueNumber`, `OwnerName`, etc.) |
//! | [`types`] | Events, issue references, dispatch payloads |
//! | [`errors`] | `RepoClientError`, `RouterError`, `ConfigError` |
//! | [`config`] | `BotConfig`, `AllowList`, `SdkRegistry` |
//! | [`command`] | Slash-command parsing |
//! | [`client`] | The `RepoClient` port |
//! | [`outcome`] | What the router decided for an event |
//! | [`router`] | `CommandRouter` |

pub mod client;
pub mod command;
pub mod config;
pub mod errors;
mod handlers;
pub mod identifiers;
mod labels;
pub mod outcome;
pub mod router;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::RepoClient;
pub use command::{Command, SdkTarget};
pub use config::{AllowList, BotConfig, SdkRegistry, FALLBACK_JOKE};
pub use errors::{ConfigError, RepoClientError, RouterError, StepFailure};
pub use identifiers::{
    CommentId, CommitSha, DispatchEventType, InvocationId, IssueNumber, LabelName, OwnerName,
    RepositoryName, UserId, WorkflowRunId,
};
pub use outcome::{IgnoreReason, Outcome};
pub use router::CommandRouter;
pub use types::{
    CommentMetadata, DispatchPayload, Event, IssueRef, Joke, NewIssue, PullRequestHead,
    Timestamp, WorkflowRun,
};
