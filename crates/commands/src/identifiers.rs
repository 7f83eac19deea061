//! Strongly typed identifiers for GitHub objects.
//!
//! Every GitHub concept the bot addresses is a distinct newtype wrapping a
//! primitive, so an [`IssueNumber`] can never be passed where a
//! [`WorkflowRunId`] is expected even though both are `u64` under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Forwards `Display` to the wrapped value.
macro_rules! display_inner {
    ($name:ident) => {
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

/// Declares a non-empty name newtype over `String`.
macro_rules! string_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps `value`; `None` when it is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                (!value.is_empty()).then_some(Self(value))
            }

            #[allow(dead_code)]
            pub(crate) fn from_static(value: &'static str) -> Self {
                debug_assert!(!value.is_empty());
                Self(value.to_owned())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        display_inner!($name);
    };
}

/// Declares a newtype over a GitHub-assigned `u64`.
macro_rules! u64_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        display_inner!($name);
    };
}

u64_id! {
    /// Number of an issue or pull request within its repository.
    ///
    /// Issues and pull requests share one number space, so comments on either
    /// carry the same kind of number.
    IssueNumber
}

u64_id! {
    /// Identifies one execution of a GitHub Actions workflow.
    WorkflowRunId
}

u64_id! {
    /// Identifies an issue comment.
    CommentId
}

u64_id! {
    /// Numeric GitHub account id of a user.
    UserId
}

/// Correlates all log lines and spans produced while handling one event.
///
/// A fresh value is drawn for every CLI run and recorded on the root span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvocationId(Uuid);

impl InvocationId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

display_inner!(InvocationId);

string_id! {
    /// Login of the user or organisation that owns a repository (e.g. `"dapr"`).
    OwnerName
}

string_id! {
    /// Short repository name without the owner (e.g. `"go-sdk"`).
    RepositoryName
}

string_id! {
    /// Full hex SHA of a commit, e.g. a pull request head.
    CommitSha
}

string_id! {
    /// Name of an issue label (e.g. `"sdk-needed"`).
    LabelName
}

string_id! {
    /// The `event_type` of a `repository_dispatch` event (e.g. `"e2e-test"`).
    DispatchEventType
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_reject_empty_values() {
        assert!(OwnerName::new("").is_none());
        assert_eq!(
            RepositoryName::new("docs").map(|r| r.to_string()),
            Some("docs".to_string())
        );
    }

    #[test]
    fn invocation_ids_are_unique() {
        assert_ne!(InvocationId::new_random(), InvocationId::new_random());
    }

    #[test]
    fn ids_serialise_as_bare_values() {
        let number = serde_json::to_value(IssueNumber::new(42)).unwrap();
        assert_eq!(number, serde_json::json!(42));

        let owner = serde_json::to_value(OwnerName::new("dapr").unwrap()).unwrap();
        assert_eq!(owner, serde_json::json!("dapr"));
    }
}
