//! `contentplan` command line.
//!
//! Runs one job per invocation against the configured `PostgreSQL`
//! database and prints the response envelope as JSON on stdout. The exit
//! code is non-zero whenever the envelope status is not 2xx.

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use contentplan::{
    api::{self, JobResponse},
    config::AppConfig,
    feed::{
        adapters::{
            http::{HttpFeedFetcher, HttpGenerationDispatcher},
            postgres::PostgresFeedSubscriptionRepository,
        },
        ports::{ContentGenerationDispatcher, DispatchError, GenerationRequest},
        services::FeedWatcher,
    },
    pipeline::{
        adapters::postgres::{PostgresPipelineStageRepository, PostgresPlanningTaskRepository},
        services::TaskPlacement,
    },
    planner::{
        adapters::{openai::OpenAiCompletionClient, postgres::PostgresClientHistoryRepository},
        services::PlanningRequestInterpreter,
    },
    postgres::{PgPool, build_pool},
    telemetry,
};
use eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "contentplan",
    about = "Feed-driven and model-assisted content planning jobs",
    version
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overriding the configured level.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check every active feed subscription once.
    WatchFeeds,

    /// Turn a planning request into scheduled tasks.
    Plan {
        /// JSON request file, or `-` to read stdin.
        #[arg(long, value_name = "PATH")]
        request: String,
    },
}

/// Generation dispatch as configured: over HTTP, or switched off.
enum Dispatch {
    Http(HttpGenerationDispatcher),
    Disabled,
}

#[async_trait]
impl ContentGenerationDispatcher for Dispatch {
    async fn dispatch(&self, request: &GenerationRequest) -> Result<(), DispatchError> {
        match self {
            Self::Http(dispatcher) => dispatcher.dispatch(request).await,
            Self::Disabled => Err(DispatchError::NotConfigured),
        }
    }
}

const SETUP_FAILURE: u16 = 500;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;
    telemetry::init(cli.log_level.as_deref().unwrap_or(&config.log_level))?;

    let response = match run(&cli.command, &config).await {
        Ok(response) => response,
        Err(err) => setup_failure(&err),
    };

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &response.body)
        .context("failed to write response")?;
    writeln!(stdout).context("failed to write response")?;
    info!(status = response.status, "job finished");
    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn setup_failure(err: &eyre::Report) -> JobResponse {
    let message = format!("{err:#}");
    error!(error = %message, "job setup failed");
    JobResponse::failure(SETUP_FAILURE, message)
}

/// Builds the adapters for `command` and runs it.
///
/// Errors cover setup only; job failures are already inside the response.
async fn run(command: &Command, config: &AppConfig) -> Result<JobResponse> {
    match command {
        Command::WatchFeeds => watch_feeds(config, connect(config)?).await,
        Command::Plan { request } => {
            let body = read_request(request)?;
            plan(config, connect(config)?, &body).await
        }
    }
}

fn connect(config: &AppConfig) -> Result<PgPool> {
    let url = config
        .database
        .url
        .as_deref()
        .ok_or_else(|| eyre!("no database URL: set database.url or DATABASE_URL"))?;
    build_pool(url, config.database.pool_size).context("failed to connect to PostgreSQL")
}

fn placement(
    pool: &PgPool,
    clock: &Arc<DefaultClock>,
) -> TaskPlacement<PostgresPlanningTaskRepository, PostgresPipelineStageRepository, DefaultClock> {
    TaskPlacement::new(
        Arc::new(PostgresPlanningTaskRepository::new(pool.clone())),
        Arc::new(PostgresPipelineStageRepository::new(pool.clone())),
        Arc::clone(clock),
    )
}

async fn watch_feeds(config: &AppConfig, pool: PgPool) -> Result<JobResponse> {
    let settings = &config.feed_watcher;
    let fetcher = HttpFeedFetcher::new(settings.request_timeout(), &settings.user_agent)
        .context("failed to build feed client")?;
    let dispatch = match config.generation.endpoint.as_deref() {
        Some(endpoint) => Dispatch::Http(
            HttpGenerationDispatcher::new(
                endpoint,
                config.generation.api_key(),
                config.generation.timeout(),
            )
            .context("failed to build generation client")?,
        ),
        None => {
            warn!("no generation endpoint configured, auto-generation is disabled");
            Dispatch::Disabled
        }
    };
    let clock = Arc::new(DefaultClock);
    let watcher = FeedWatcher::new(
        Arc::new(PostgresFeedSubscriptionRepository::new(pool.clone())),
        Arc::new(fetcher),
        Arc::new(dispatch),
        placement(&pool, &clock),
        clock,
    )
    .with_settings(settings.watcher_settings());
    Ok(api::watch_feeds(&watcher, config.job_timeout()).await)
}

async fn plan(config: &AppConfig, pool: PgPool, body: &str) -> Result<JobResponse> {
    let completion = OpenAiCompletionClient::new(config.llm.openai_settings())
        .context("failed to build completion client")?;
    let clock = Arc::new(DefaultClock);
    let interpreter = PlanningRequestInterpreter::new(
        Arc::new(PostgresClientHistoryRepository::new(pool.clone())),
        Arc::new(completion),
        placement(&pool, &clock),
        clock,
        config.planner_settings(),
    );
    Ok(api::plan(&interpreter, body, config.job_timeout()).await)
}

fn read_request(source: &str) -> Result<String> {
    if source == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("failed to read request from stdin")?;
        return Ok(body);
    }
    std::fs::read_to_string(source).with_context(|| format!("failed to read request file {source}"))
}

#[cfg(test)]
mod tests {
    use super::{Command, run, setup_failure};
    use contentplan::config::AppConfig;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn missing_database_url_is_reported_as_an_envelope() {
        let err = run(&Command::WatchFeeds, &AppConfig::default())
            .await
            .expect_err("no database configured");

        let response = setup_failure(&err);

        assert_eq!(response.status, 500);
        assert_eq!(response.body["success"], json!(false));
        assert_eq!(
            response.body["error"],
            json!("no database URL: set database.url or DATABASE_URL")
        );
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn unreadable_request_file_is_reported_as_an_envelope() {
        let command = Command::Plan {
            request: "/nonexistent/contentplan-request.json".to_owned(),
        };
        let err = run(&command, &AppConfig::default())
            .await
            .expect_err("request file missing");

        let response = setup_failure(&err);

        assert!(!response.is_success());
        let message = response.body["error"].as_str().unwrap_or_default();
        assert!(message.starts_with(
            "failed to read request file /nonexistent/contentplan-request.json"
        ));
    }
}
