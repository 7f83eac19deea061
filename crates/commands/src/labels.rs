//! Label-driven issue fanout.
//!
//! Adding `docs-needed` to an issue opens a follow-up issue in the docs
//! repository; adding `sdk-needed` opens one in every SDK repository. Label
//! changes are already restricted to maintainers by GitHub, so no allow-list
//! check happens here.

use tracing::{info, warn};

use crate::{
    BotConfig, IgnoreReason, IssueRef, LabelName, NewIssue, Outcome, RepoClient, RouterError,
    StepFailure,
};

const DOCS_NEEDED: &str = "docs-needed";
const SDK_NEEDED: &str = "sdk-needed";

/// Handles an `issues`/`labeled` event.
pub(crate) async fn handle_labeled(
    client: &dyn RepoClient,
    config: &BotConfig,
    issue: &IssueRef,
    label: &LabelName,
) -> Result<Outcome, RouterError> {
    if issue.owner != config.organization {
        info!(owner = %issue.owner, "not running in the home organisation, exiting");
        return Ok(Outcome::ignored(IgnoreReason::ForeignRepository));
    }

    match label.as_str() {
        DOCS_NEEDED => {
            let new_issue = docs_issue(config, issue);
            client
                .create_issue(&config.organization, &config.docs_repository, &new_issue)
                .await?;
            info!(repo = %config.docs_repository, "created docs issue");
            Ok(Outcome::IssuesCreated {
                repositories: vec![config.docs_repository.clone()],
            })
        }
        SDK_NEEDED => {
            let new_issue = sdk_issue(config, issue);
            let mut created = Vec::new();
            let mut failures = Vec::new();
            for repo in config.sdk_repositories.iter() {
                match client
                    .create_issue(&config.organization, repo, &new_issue)
                    .await
                {
                    Ok(()) => {
                        info!(%repo, "created sdk issue");
                        created.push(repo.clone());
                    }
                    Err(error) => {
                        warn!(%repo, %error, "failed to create sdk issue");
                        failures.push(StepFailure {
                            target: repo.to_string(),
                            error,
                        });
                    }
                }
            }

            if failures.is_empty() {
                Ok(Outcome::IssuesCreated {
                    repositories: created,
                })
            } else {
                Err(RouterError::Incomplete {
                    action: "sdk issue fanout".to_string(),
                    attempted: config.sdk_repositories.len(),
                    failures,
                })
            }
        }
        _ => {
            info!(%label, "label not supported, exiting");
            Ok(Outcome::ignored(IgnoreReason::UnsupportedLabel(
                label.clone(),
            )))
        }
    }
}

fn docs_issue(config: &BotConfig, issue: &IssueRef) -> NewIssue {
    NewIssue {
        title: format!("New content needed for {issue}"),
        labels: vec![
            "content/missing-information".to_string(),
            format!("created-by/{}", config.bot_name),
        ],
        body: format!(
            "This issue was automatically created by [{}]({}) because a \"{DOCS_NEEDED}\" label \
             was added to {issue}. \n\n\
             TODO: Add more details as per [this template](.github/ISSUE_TEMPLATE/new-content-needed.md).",
            config.bot_display_name, config.workflow_url
        ),
    }
}

fn sdk_issue(config: &BotConfig, issue: &IssueRef) -> NewIssue {
    NewIssue {
        title: format!("Add support for {issue}"),
        labels: vec![
            "enhancement".to_string(),
            format!("created-by/{}", config.bot_name),
        ],
        body: format!(
            "This issue was automatically created by [{}]({}) because a \"{SDK_NEEDED}\" label \
             was added to {issue}. \n\n\
             TODO: Add more details.",
            config.bot_display_name, config.workflow_url
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingClient};
    use crate::{IssueNumber, OwnerName, RepositoryName};

    fn issue(owner: &str) -> IssueRef {
        IssueRef::new(
            OwnerName::new(owner).unwrap(),
            RepositoryName::new("dapr").unwrap(),
            IssueNumber::new(5120),
        )
    }

    fn label(name: &str) -> LabelName {
        LabelName::new(name).unwrap()
    }

    #[tokio::test]
    async fn docs_needed_opens_one_issue_in_docs_repository() {
        let client = RecordingClient::default();
        let config = BotConfig::default();

        let outcome = handle_labeled(&client, &config, &issue("dapr"), &label("docs-needed"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::IssuesCreated {
                repositories: vec![RepositoryName::new("docs").unwrap()]
            }
        );
        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        let Call::CreateIssue(target, new_issue) = &calls[0] else {
            panic!("expected create issue, got {:?}", calls[0]);
        };
        assert_eq!(target, "dapr/docs");
        assert_eq!(new_issue.title, "New content needed for dapr/dapr#5120");
        assert_eq!(
            new_issue.labels,
            vec!["content/missing-information", "created-by/dapr-bot"]
        );
        assert!(new_issue
            .body
            .starts_with("This issue was automatically created by [Dapr Bot]("));
        assert!(new_issue
            .body
            .contains("because a \"docs-needed\" label was added to dapr/dapr#5120."));
    }

    #[tokio::test]
    async fn sdk_needed_opens_issues_in_registry_order() {
        let client = RecordingClient::default();
        let config = BotConfig::default();

        handle_labeled(&client, &config, &issue("dapr"), &label("sdk-needed"))
            .await
            .unwrap();

        let targets: Vec<String> = client
            .calls()
            .into_iter()
            .map(|call| match call {
                Call::CreateIssue(target, new_issue) => {
                    assert_eq!(new_issue.title, "Add support for dapr/dapr#5120");
                    assert_eq!(new_issue.labels, vec!["enhancement", "created-by/dapr-bot"]);
                    target
                }
                other => panic!("unexpected call {other:?}"),
            })
            .collect();
        assert_eq!(
            targets,
            vec![
                "dapr/dotnet-sdk",
                "dapr/go-sdk",
                "dapr/java-sdk",
                "dapr/js-sdk",
                "dapr/python-sdk",
                "dapr/php-sdk",
            ]
        );
    }

    #[tokio::test]
    async fn sdk_fanout_keeps_going_after_a_failure() {
        let mut client = RecordingClient::default();
        client.failing_issue_repos.insert("dapr/java-sdk".into());
        let config = BotConfig::default();

        let err = handle_labeled(&client, &config, &issue("dapr"), &label("sdk-needed"))
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            RouterError::Incomplete { attempted: 6, failures, .. }
                if failures.len() == 1 && failures[0].target == "java-sdk"
        ));
        assert_eq!(client.calls().len(), 6);
    }

    #[tokio::test]
    async fn labels_from_forks_are_ignored() {
        let client = RecordingClient::default();
        let config = BotConfig::default();

        let outcome = handle_labeled(&client, &config, &issue("someone"), &label("sdk-needed"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::ignored(IgnoreReason::ForeignRepository));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn other_labels_are_ignored() {
        let client = RecordingClient::default();
        let config = BotConfig::default();

        let outcome = handle_labeled(&client, &config, &issue("dapr"), &label("kind/bug"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::ignored(IgnoreReason::UnsupportedLabel(label("kind/bug")))
        );
        assert!(client.calls().is_empty());
    }
}
