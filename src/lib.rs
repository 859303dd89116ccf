pub mod config;
pub mod fetch;
pub mod model;
pub mod pipeline;
pub mod query;
pub mod transform;
pub mod writer;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, DEFAULT_OUT_FILE, resolve_limit};
use fetch::{DEFAULT_ENDPOINT, FetchError, ReqwestTransport, RetryPolicy, ThreadSleeper};
use pipeline::{PipelineError, Summary, run_pipeline};
use transform::THUMB_WIDTH;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "generate-data",
    version,
    about = "Fetch popular paintings from Wikidata into a deduplicated JSON file"
)]
pub struct Cli {
    /// Maximum number of rows to request (non-numeric or non-positive values fall back to 120)
    #[arg(long, env = "LIMIT")]
    pub limit: Option<String>,

    /// Output file, overwritten on success
    #[arg(long, default_value = DEFAULT_OUT_FILE)]
    pub out: PathBuf,

    /// SPARQL endpoint
    #[arg(long, env = "SPARQL_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Thumbnail width forced onto every image URL
    #[arg(long, default_value_t = THUMB_WIDTH)]
    pub width: u32,

    /// Total request attempts before giving up
    #[arg(long, default_value_t = 5)]
    pub max_attempts: u32,

    /// Backoff unit; attempt N waits N times this long before retrying
    #[arg(long, default_value_t = 1200)]
    pub backoff_ms: u64,

    /// Per-request timeout
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            limit: resolve_limit(self.limit.as_deref()),
            out: self.out,
            endpoint: self.endpoint,
            width: self.width,
            retry: RetryPolicy {
                max_attempts: self.max_attempts,
                base_delay: Duration::from_millis(self.backoff_ms),
            },
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Error surfaced to the process boundary.
#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub kind: &'static str,
    pub message: String,
    pub hint: Option<String>,
    pub retryable: bool,
}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        let message = err.to_string();
        match err {
            PipelineError::Fetch(FetchError::Status { status, .. }) => CliError {
                code: 1,
                kind: "http-status",
                message,
                hint: Some(if status == 429 || status >= 500 {
                    "endpoint is overloaded; try again later or lower LIMIT".to_string()
                } else {
                    "check --endpoint and the query".to_string()
                }),
                retryable: status == 429 || status >= 500,
            },
            PipelineError::Fetch(FetchError::Transport(_)) => CliError {
                code: 1,
                kind: "network",
                message,
                hint: Some("check network connectivity and --endpoint".to_string()),
                retryable: true,
            },
            PipelineError::Fetch(FetchError::Decode(_)) | PipelineError::Malformed(_) => {
                CliError {
                    code: 1,
                    kind: "malformed-response",
                    message,
                    hint: None,
                    retryable: false,
                }
            }
            PipelineError::Write(_) => CliError {
                code: 1,
                kind: "write",
                message,
                hint: Some("check that the output directory exists and is writable".to_string()),
                retryable: false,
            },
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError {
            code: 1,
            kind: "internal",
            message: format!("{err:#}"),
            hint: None,
            retryable: false,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();
}

pub fn run() -> Result<Summary, CliError> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.into_config();
    let transport = ReqwestTransport::new(config.timeout)?;
    Ok(run_pipeline(&config, &transport, &ThreadSleeper)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_build_default_config() {
        let cli = Cli::try_parse_from(["generate-data"]).unwrap();
        let mut cfg = cli.into_config();
        // LIMIT / SPARQL_ENDPOINT may leak in from the environment running the tests.
        cfg.limit = Config::default().limit;
        cfg.endpoint = Config::default().endpoint;
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "generate-data",
            "--limit",
            "7",
            "--out",
            "paintings.json",
            "--endpoint",
            "http://localhost:9999/sparql",
            "--width",
            "200",
            "--max-attempts",
            "2",
            "--backoff-ms",
            "0",
        ])
        .unwrap();
        let cfg = cli.into_config();
        assert_eq!(cfg.limit, 7);
        assert_eq!(cfg.out, PathBuf::from("paintings.json"));
        assert_eq!(cfg.endpoint, "http://localhost:9999/sparql");
        assert_eq!(cfg.width, 200);
        assert_eq!(cfg.retry.max_attempts, 2);
        assert_eq!(cfg.retry.base_delay, Duration::ZERO);
    }

    #[test]
    fn status_errors_map_to_retryable_payload() {
        let err: CliError = PipelineError::Fetch(FetchError::Status {
            status: 503,
            status_text: "Service Unavailable".into(),
            body: String::new(),
        })
        .into();
        assert_eq!(err.code, 1);
        assert_eq!(err.kind, "http-status");
        assert!(err.retryable);
        assert!(err.message.contains("503 Service Unavailable"));
    }
}
