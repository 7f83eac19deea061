//! Bot configuration.
//!
//! [`BotConfig`] is built once at startup (by the `cli` crate, from an optional
//! TOML file layered over [`BotConfig::default`]) and is read-only afterwards.
//! The defaults reproduce the deployment the bot was written for.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::{ConfigError, OwnerName, RepositoryName};

/// Comment posted by `/make-me-laugh` when the joke service answers with
/// something unusable.
pub const FALLBACK_JOKE: &str = "I have a bad feeling about this.";

const DEFAULT_JOKE_URL: &str = "https://official-joke-api.appspot.com/random_joke";

// ---------------------------------------------------------------------------
// Allow list
// ---------------------------------------------------------------------------

/// Users permitted to run privileged commands.
///
/// Entries are lower-cased on construction and lookups are case-insensitive,
/// so `"JoshVanL"` and `"joshvanl"` are the same user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct AllowList(BTreeSet<String>);

impl AllowList {
    /// Returns `true` if `login` is on the list.
    pub fn contains(&self, login: &str) -> bool {
        self.0.contains(&login.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the lower-cased logins in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|login| login.into().trim().to_lowercase())
                .collect(),
        )
    }
}

impl From<Vec<String>> for AllowList {
    fn from(logins: Vec<String>) -> Self {
        logins.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// SDK registry
// ---------------------------------------------------------------------------

/// Ordered list of SDK repositories that receive an issue when a change is
/// labelled `sdk-needed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SdkRegistry(Vec<RepositoryName>);

impl SdkRegistry {
    pub fn new(repositories: Vec<RepositoryName>) -> Self {
        Self(repositories)
    }

    /// Iterates the repositories in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &RepositoryName> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// BotConfig
// ---------------------------------------------------------------------------

/// Everything the router needs to know about the deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    /// Organisation the bot serves. Label events from repositories owned by
    /// anyone else (forks) are ignored, and fanout issues are opened here.
    pub organization: OwnerName,

    /// Repository that receives `docs-needed` issues.
    pub docs_repository: RepositoryName,

    /// Repositories that receive `sdk-needed` issues, in creation order.
    pub sdk_repositories: SdkRegistry,

    /// Users allowed to run privileged commands.
    pub allow_list: AllowList,

    /// Where maintainers edit the allow list; quoted in the refusal comment.
    pub allow_list_source: String,

    /// Machine name of the bot, used in the `created-by/<name>` label.
    pub bot_name: String,

    /// Name shown in the body of issues the bot opens.
    pub bot_display_name: String,

    /// Link to the workflow running the bot, shown in issue bodies.
    pub workflow_url: String,

    /// Endpoint returning `{"setup": ..., "punchline": ...}`.
    pub joke_url: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            organization: OwnerName::from_static("dapr"),
            docs_repository: RepositoryName::from_static("docs"),
            sdk_repositories: SdkRegistry::new(
                ["dotnet-sdk", "go-sdk", "java-sdk", "js-sdk", "python-sdk", "php-sdk"]
                    .into_iter()
                    .map(RepositoryName::from_static)
                    .collect(),
            ),
            allow_list: [
                "antontroshin",
                "berndverst",
                "cicoyle",
                "daixiang0",
                "elena-kolevska",
                "halspang",
                "joshvanl",
                "mikeee",
                "msfussell",
                "yaron2",
            ]
            .into_iter()
            .collect(),
            allow_list_source: ".github/scripts/dapr_bot.js".to_string(),
            bot_name: "dapr-bot".to_string(),
            bot_display_name: "Dapr Bot".to_string(),
            workflow_url: "https://github.com/dapr/dapr/blob/master/.github/workflows/dapr-bot.yml"
                .to_string(),
            joke_url: DEFAULT_JOKE_URL.to_string(),
        }
    }
}

impl BotConfig {
    /// Checks the invariants deserialisation cannot express.
    ///
    /// Names deserialised from a file bypass the non-empty checks of the
    /// identifier constructors, so they are re-checked here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.organization.as_str().trim().is_empty() {
            return Err(invalid("organization", "must not be empty"));
        }
        if self.docs_repository.as_str().trim().is_empty() {
            return Err(invalid("docs_repository", "must not be empty"));
        }
        if let Some(position) = self
            .sdk_repositories
            .iter()
            .position(|r| r.as_str().trim().is_empty())
        {
            return Err(invalid(
                "sdk_repositories",
                format!("entry {position} is empty"),
            ));
        }
        if self.allow_list.iter().any(str::is_empty) {
            return Err(invalid("allow_list", "contains an empty login"));
        }
        if self.bot_name.trim().is_empty() {
            return Err(invalid("bot_name", "must not be empty"));
        }
        if !(self.joke_url.starts_with("http://") || self.joke_url.starts_with("https://")) {
            return Err(invalid("joke_url", "must be an http(s) URL"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}
