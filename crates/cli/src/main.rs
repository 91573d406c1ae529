//! `json2video` -- render movie documents from the command line.
//!
//! Loads a movie JSON document, submits it to JSON2Video, and waits for the
//! render to finish. The final service response is printed to stdout as
//! JSON; logs go to stderr.
//!
//! # Environment variables
//!
//! | Variable                        | Required | Default | Description                      |
//! |---------------------------------|----------|---------|----------------------------------|
//! | `JSON2VIDEO_API_KEY`            | yes      | --      | Account API key                  |
//! | `JSON2VIDEO_API_URL`            | no       | official endpoint | `/movies` endpoint URL |
//! | `JSON2VIDEO_POLL_INTERVAL_SECS` | no       | `1`     | Seconds between status checks    |
//! | `JSON2VIDEO_TIMEOUT_SECS`       | no       | `30`    | Per-request HTTP timeout         |
//!
//! A `.env` file in the working directory is loaded first.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use json2video_client::{CancellationToken, ClientConfig, Json2VideoClient, StatusResponse};
use json2video_core::Movie;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "json2video", version, about = "Render videos with the JSON2Video API")]
struct Cli {
    /// API key; overrides `JSON2VIDEO_API_KEY`.
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Endpoint URL; overrides `JSON2VIDEO_API_URL`.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Seconds between status checks; overrides `JSON2VIDEO_POLL_INTERVAL_SECS`.
    #[arg(long, global = true)]
    poll_interval: Option<f64>,

    /// Give up waiting after this many seconds.
    #[arg(long, global = true)]
    wait_timeout: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a movie document and wait for the render to finish.
    Render {
        /// Path to the movie JSON document.
        file: PathBuf,

        /// Return right after the job is queued.
        #[arg(long)]
        no_wait: bool,
    },
    /// Show the status of an existing render job.
    Status {
        /// Project id returned when the movie was submitted.
        project: String,

        /// Keep polling until the render finishes.
        #[arg(long)]
        wait: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "json2video=info,json2video_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli, ClientConfig::from_env())?;
    let client = Json2VideoClient::from_config(&config).context("Failed to build HTTP client")?;

    let api_key = config
        .api_key
        .clone()
        .context("An API key is required: set JSON2VIDEO_API_KEY or pass --api-key")?;

    let final_response = match cli.command {
        Command::Render { file, no_wait } => {
            let mut movie = load_movie(&file)?;
            movie.set_api_key(api_key);

            let response = client.render(&mut movie).await?;
            if !response.success || no_wait {
                print_json(&response)?;
                if !response.success {
                    bail!(
                        "Render was rejected: {}",
                        response.message.as_deref().unwrap_or("no message")
                    );
                }
                return Ok(());
            }
            wait(&client, &movie, cli.wait_timeout).await?
        }
        Command::Status { project, wait: keep_polling } => {
            let mut movie = Movie::new();
            movie.set_api_key(api_key);
            movie.set_project(project);

            if keep_polling {
                wait(&client, &movie, cli.wait_timeout).await?
            } else {
                client.get_status(&movie).await?
            }
        }
    };

    print_json(&final_response)?;
    if !final_response.success {
        bail!(
            "Status check failed: {}",
            final_response.message.as_deref().unwrap_or("no message")
        );
    }
    Ok(())
}

/// Apply command-line overrides on top of the environment configuration.
fn resolve_config(cli: &Cli, mut config: ClientConfig) -> anyhow::Result<ClientConfig> {
    if let Some(api_key) = &cli.api_key {
        config.api_key = Some(api_key.clone());
    }
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(secs) = cli.poll_interval {
        config.poll_interval = positive_secs(secs).context("--poll-interval must be positive")?;
    }
    Ok(config)
}

fn positive_secs(secs: f64) -> Option<Duration> {
    (secs.is_finite() && secs > 0.0).then(|| Duration::from_secs_f64(secs))
}

/// Read and validate a movie document.
fn load_movie(path: &Path) -> anyhow::Result<Movie> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    let movie = Movie::from_document(document)
        .with_context(|| format!("{} is not a valid movie document", path.display()))?;

    tracing::info!(path = %path.display(), scenes = movie.scenes().len(), "Loaded movie document");
    Ok(movie)
}

/// Poll until the render finishes, Ctrl-C is pressed, or `timeout` elapses.
async fn wait(
    client: &Json2VideoClient,
    movie: &Movie,
    timeout: Option<f64>,
) -> anyhow::Result<StatusResponse> {
    let cancel = CancellationToken::new();

    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping");
            ctrl_c.cancel();
        }
    });

    if let Some(secs) = timeout {
        let limit = positive_secs(secs).context("--wait-timeout must be positive")?;
        let deadline = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(limit).await;
            tracing::warn!(timeout_secs = secs, "Wait timeout reached");
            deadline.cancel();
        });
    }

    let response = client
        .wait_to_finish(
            movie,
            |response| match response.movie() {
                Some(movie) => tracing::info!(
                    status = movie.status.as_deref().unwrap_or("unknown"),
                    "Render status"
                ),
                None => tracing::info!(success = response.success, "Render status"),
            },
            &cancel,
        )
        .await?;

    cancel.cancel();
    Ok(response)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
