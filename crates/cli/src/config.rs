//! Command-line arguments and the bot configuration file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use commands::BotConfig;

/// Output format of log lines on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Handle one GitHub webhook delivery: run slash-commands from comments and
/// open follow-up issues for labels.
///
/// Every option can also be supplied through the environment variables GitHub
/// Actions sets for a workflow run.
#[derive(Debug, Parser)]
#[command(name = "repobot", version)]
pub struct Cli {
    /// TOML file overriding the built-in bot configuration.
    #[arg(long, env = "REPOBOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Webhook event name, e.g. `issue_comment`.
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    pub event_name: String,

    /// File holding the JSON webhook payload.
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: PathBuf,

    /// Login that triggered the event; defaults to the payload sender.
    #[arg(long, env = "GITHUB_ACTOR")]
    pub actor: Option<String>,

    /// Token used for GitHub API calls.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// GitHub REST API base URL.
    #[arg(long, env = "GITHUB_API_URL", default_value = github::DEFAULT_API_BASE)]
    pub api_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    #[arg(long, env = "REPOBOT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Export spans to this OTLP/gRPC collector.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Cli {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Loads the bot configuration, falling back to the built-in defaults when
/// no file is given.
pub fn load_bot_config(path: Option<&Path>) -> anyhow::Result<BotConfig> {
    let Some(path) = path else {
        return Ok(BotConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    parse_bot_config(&text).with_context(|| format!("invalid config file '{}'", path.display()))
}

/// Parses a TOML configuration; keys that are not set keep their defaults.
pub fn parse_bot_config(text: &str) -> anyhow::Result<BotConfig> {
    let config: BotConfig = toml::from_str(text).context("failed to parse TOML")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(parse_bot_config("").unwrap(), BotConfig::default());
    }

    #[test]
    fn file_overrides_selected_keys() {
        let config = parse_bot_config(
            r#"
            organization = "acme"
            allow_list = ["Alice", "bob"]
            sdk_repositories = ["rust-sdk", "go-sdk"]
            "#,
        )
        .unwrap();

        assert_eq!(config.organization.as_str(), "acme");
        assert!(config.allow_list.contains("alice"));
        assert_eq!(
            config
                .sdk_repositories
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>(),
            vec!["rust-sdk", "go-sdk"]
        );
        assert_eq!(config.bot_name, "dapr-bot");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_bot_config("alowlist = [\"typo\"]").unwrap_err();
        assert!(format!("{err:#}").contains("alowlist"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = parse_bot_config("docs_repository = \"\"").unwrap_err();
        assert!(format!("{err:#}").contains("docs_repository"));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = load_bot_config(Some(Path::new("/nonexistent/repobot.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/repobot.toml"));
    }

    #[test]
    fn cli_accepts_explicit_arguments() {
        let cli = Cli::try_parse_from([
            "repobot",
            "--event-name",
            "issue_comment",
            "--event-path",
            "/tmp/event.json",
            "--token",
            "t0ken",
            "--api-url",
            "https://github.example.com/api/v3",
            "--log-format",
            "json",
            "--timeout-secs",
            "0",
        ])
        .unwrap();

        assert_eq!(cli.event_name, "issue_comment");
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.api_url, "https://github.example.com/api/v3");
        assert_eq!(cli.request_timeout(), Duration::from_secs(1));
    }
}
