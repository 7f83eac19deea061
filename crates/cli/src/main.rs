//! Repobot CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: read arguments (or the GitHub Actions
//!    environment) and an optional TOML file overriding [`commands::BotConfig`].
//! 2. **Wire observability**: configure `tracing-subscriber` with a text or
//!    JSON layer and, when an endpoint is configured, an OpenTelemetry OTLP
//!    exporter. Spans and events from every crate in the workspace flow
//!    through it.
//! 3. **Construct infrastructure**: build a [`github::GithubClient`] and load
//!    the triggering delivery through [`listener::load_event`].
//! 4. **Handle the event**: hand it to a [`commands::CommandRouter`] and report
//!    the outcome.
//!
//! The process exits non-zero when configuration, payload loading, or any
//! GitHub call fails. Ignored events and refused commands are successes.

mod config;
mod telemetry;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use commands::{CommandRouter, InvocationId};
use github::{GithubClient, GithubClientSettings};
use listener::EventDescriptor;
use tracing::{error, info, info_span, Instrument};

use crate::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let telemetry = telemetry::init(cli.log_format, cli.otlp_endpoint.as_deref())?;

    let invocation = InvocationId::new_random();
    let result = run(cli)
        .instrument(info_span!("repobot", invocation = %invocation))
        .await;
    if let Err(err) = &result {
        error!(invocation = %invocation, error = format!("{err:#}"), "event handling failed");
    }

    telemetry.shutdown();
    Ok(ExitCode::from(exit_status(&result)))
}

/// Process status for a handled event; the error itself is already logged.
fn exit_status(result: &anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::load_bot_config(cli.config.as_deref())?;

    let client = GithubClient::new(GithubClientSettings {
        api_base: cli.api_url.clone(),
        timeout: cli.request_timeout(),
        ..GithubClientSettings::new(cli.token.as_str())
    })
    .context("failed to build GitHub client")?;

    let descriptor = EventDescriptor {
        event_name: cli.event_name,
        payload_path: cli.event_path,
        actor: cli.actor,
    };
    let Some(event) = listener::load_event(&descriptor)
        .await
        .context("failed to load webhook event")?
    else {
        return Ok(());
    };

    let router = CommandRouter::new(config, Arc::new(client));
    let outcome = router.handle(&event).await?;
    info!(%outcome, "event handled");
    Ok(())
}
