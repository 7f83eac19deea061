//! Repobot GitHub infrastructure adapter.
//!
//! Implements the [`commands::RepoClient`] port against the GitHub REST API
//! using `reqwest`. The same client also fetches jokes for `/make-me-laugh`
//! through a separate, unauthenticated HTTP client so the GitHub token never
//! leaves GitHub.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain command rules. All GitHub
//! API details (headers, authentication, pagination, status handling) live
//! here; the [`commands`] crate never sees them.
//!
//! Requests are sent exactly once. A non-success status becomes
//! [`commands::RepoClientError::Status`] with the response body truncated for
//! logging.

mod client;
mod wire;

pub use client::{GithubClient, GithubClientError, GithubClientSettings, DEFAULT_API_BASE};
