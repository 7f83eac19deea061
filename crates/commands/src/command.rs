//! Slash-command parsing.
//!
//! A comment is a command when its trimmed body starts with `/`. The body is
//! split on whitespace: the first token names the command (case-sensitive),
//! and the remaining tokens are re-joined with single spaces to form the
//! argument string handed to the commands that take one.

/// SDK test suites that can be triggered from a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdkTarget {
    All,
    Java,
    Python,
    Js,
    Go,
}

impl SdkTarget {
    fn from_command(name: &str) -> Option<Self> {
        match name {
            "/test-sdk-all" => Some(Self::All),
            "/test-sdk-java" => Some(Self::Java),
            "/test-sdk-python" => Some(Self::Python),
            "/test-sdk-js" => Some(Self::Js),
            "/test-sdk-go" => Some(Self::Go),
            _ => None,
        }
    }

    /// The command that selects this target, including the leading `/`.
    pub fn command_name(self) -> &'static str {
        match self {
            Self::All => "/test-sdk-all",
            Self::Java => "/test-sdk-java",
            Self::Python => "/test-sdk-python",
            Self::Js => "/test-sdk-js",
            Self::Go => "/test-sdk-go",
        }
    }
}

/// A parsed slash-command together with the arguments it consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/assign` — assign the commenter to an unassigned issue.
    Assign,
    /// `/retest-failed` — re-run the failed jobs of a pull request's head commit.
    RetestFailed,
    /// `/make-me-laugh` — post a joke.
    MakeMeLaugh,
    /// `/ok-to-test` — run the end-to-end suite.
    OkToTest,
    /// `/ok-to-perf` — run the performance suite.
    OkToPerf { args: String },
    /// `/ok-to-perf-components` — run the component performance suite.
    OkToPerfComponents { args: String },
    /// `/test-sdk-<target>` — run an SDK compatibility suite.
    TestSdk { target: SdkTarget, args: String },
    /// `/test-version-skew [previous-version] [args...]`.
    TestVersionSkew {
        previous_version: Option<String>,
        args: String,
    },
    /// Starts with `/` but is not a command the bot knows.
    Unknown { name: String },
}

impl Command {
    /// Parses a comment body.
    ///
    /// Returns `None` when the body is not a command at all (empty, or not
    /// starting with `/` once surrounding whitespace is removed).
    pub fn parse(body: &str) -> Option<Self> {
        let body = body.trim();
        if !body.starts_with('/') {
            return None;
        }

        let mut tokens = body.split_whitespace();
        let name = tokens.next()?;
        let rest = |tokens: std::str::SplitWhitespace<'_>| tokens.collect::<Vec<_>>().join(" ");

        let command = match name {
            "/assign" => Self::Assign,
            "/retest-failed" => Self::RetestFailed,
            "/make-me-laugh" => Self::MakeMeLaugh,
            "/ok-to-test" => Self::OkToTest,
            "/ok-to-perf" => Self::OkToPerf { args: rest(tokens) },
            "/ok-to-perf-components" => Self::OkToPerfComponents { args: rest(tokens) },
            "/test-version-skew" => {
                let previous_version = tokens.next().map(str::to_string);
                Self::TestVersionSkew {
                    previous_version,
                    args: rest(tokens),
                }
            }
            other => match SdkTarget::from_command(other) {
                Some(target) => Self::TestSdk {
                    target,
                    args: rest(tokens),
                },
                None => Self::Unknown {
                    name: other.to_string(),
                },
            },
        };
        Some(command)
    }

    /// The command as typed, including the leading `/`.
    pub fn name(&self) -> &str {
        match self {
            Self::Assign => "/assign",
            Self::RetestFailed => "/retest-failed",
            Self::MakeMeLaugh => "/make-me-laugh",
            Self::OkToTest => "/ok-to-test",
            Self::OkToPerf { .. } => "/ok-to-perf",
            Self::OkToPerfComponents { .. } => "/ok-to-perf-components",
            Self::TestSdk { target, .. } => target.command_name(),
            Self::TestVersionSkew { .. } => "/test-version-skew",
            Self::Unknown { name } => name,
        }
    }

    /// Returns `true` for commands only allow-listed users may run.
    ///
    /// `/assign` and `/retest-failed` are open to everyone. Unknown commands
    /// are never executed, so they need no authorization either.
    pub fn is_privileged(&self) -> bool {
        !matches!(
            self,
            Self::Assign | Self::RetestFailed | Self::Unknown { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_commands_are_not_parsed() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   \n"), None);
        assert_eq!(Command::parse("LGTM /ok-to-test"), None);
        assert_eq!(Command::parse("please /assign"), None);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(Command::parse("  /assign \n"), Some(Command::Assign));
    }

    #[test]
    fn command_names_are_case_sensitive() {
        assert_eq!(
            Command::parse("/Assign"),
            Some(Command::Unknown {
                name: "/Assign".into()
            })
        );
    }

    #[test]
    fn perf_arguments_are_joined_with_single_spaces() {
        assert_eq!(
            Command::parse("/ok-to-perf  --duration 10m\t--qps  500"),
            Some(Command::OkToPerf {
                args: "--duration 10m --qps 500".into()
            })
        );
        assert_eq!(
            Command::parse("/ok-to-perf-components"),
            Some(Command::OkToPerfComponents { args: String::new() })
        );
    }

    #[test]
    fn version_skew_takes_previous_version_then_args() {
        assert_eq!(
            Command::parse("/test-version-skew v1.2.3 extra args"),
            Some(Command::TestVersionSkew {
                previous_version: Some("v1.2.3".into()),
                args: "extra args".into(),
            })
        );
        assert_eq!(
            Command::parse("/test-version-skew"),
            Some(Command::TestVersionSkew {
                previous_version: None,
                args: String::new(),
            })
        );
    }

    #[test]
    fn sdk_commands_keep_their_args() {
        assert_eq!(
            Command::parse("/test-sdk-python  a   b"),
            Some(Command::TestSdk {
                target: SdkTarget::Python,
                args: "a b".into(),
            })
        );
    }

    #[test]
    fn sdk_commands_map_to_targets() {
        for (body, target) in [
            ("/test-sdk-all", SdkTarget::All),
            ("/test-sdk-java", SdkTarget::Java),
            ("/test-sdk-python", SdkTarget::Python),
            ("/test-sdk-js", SdkTarget::Js),
            ("/test-sdk-go", SdkTarget::Go),
        ] {
            let parsed = Command::parse(body).unwrap();
            assert_eq!(
                parsed,
                Command::TestSdk {
                    target,
                    args: String::new()
                }
            );
            assert_eq!(parsed.name(), body);
        }
        assert!(matches!(
            Command::parse("/test-sdk-rust"),
            Some(Command::Unknown { .. })
        ));
    }

    #[test]
    fn only_open_commands_skip_authorization() {
        assert!(!Command::Assign.is_privileged());
        assert!(!Command::RetestFailed.is_privileged());
        assert!(!Command::Unknown { name: "/x".into() }.is_privileged());
        assert!(Command::MakeMeLaugh.is_privileged());
        assert!(Command::OkToTest.is_privileged());
        assert!(Command::TestVersionSkew {
            previous_version: None,
            args: String::new()
        }
        .is_privileged());
    }
}
