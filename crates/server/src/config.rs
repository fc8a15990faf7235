//! Orchestrator configuration.
//!
//! Every collaborator address is required; there are no built-in defaults
//! for where services live. Values come from flags or the environment and
//! are validated once at startup, then injected into the orchestrator.

use std::time::Duration;

use clap::Args;
use reqwest::Url;
use thiserror::Error;

use stage_client::{RetryPolicy, StageEndpoint, StageEndpoints};

/// Default number of in-flight calls per fan-out stage.
pub const DEFAULT_FANOUT_CONCURRENCY: usize = 8;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid url for {name}: {value} ({reason})")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("timeout for the service at {name} must be greater than zero")]
    ZeroTimeout { name: &'static str },

    #[error("fan-out concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Collaborator addresses, per-stage timeouts and call policy.
#[derive(Debug, Clone, Args)]
pub struct StageArgs {
    /// Base url of the query planner service
    #[arg(long, env = "QUERY_PLANNER_URL")]
    pub query_planner_url: String,

    /// Base url of the web search service
    #[arg(long, env = "SEARCH_SERVICE_URL")]
    pub search_service_url: String,

    /// Base url of the HTML fetcher service
    #[arg(long, env = "HTML_FETCHER_URL")]
    pub html_fetcher_url: String,

    /// Base url of the recipe extractor service
    #[arg(long, env = "EXTRACTOR_SERVICE_URL")]
    pub extractor_service_url: String,

    /// Base url of the recipe ranker service
    #[arg(long, env = "RANKER_SERVICE_URL")]
    pub ranker_service_url: String,

    /// Base url of the summarizer service
    #[arg(long, env = "SUMMARIZER_SERVICE_URL")]
    pub summarizer_service_url: String,

    #[arg(long, env = "QUERY_PLANNER_TIMEOUT_SECS", default_value_t = 30)]
    pub query_planner_timeout_secs: u64,

    #[arg(long, env = "SEARCH_TIMEOUT_SECS", default_value_t = 30)]
    pub search_timeout_secs: u64,

    #[arg(long, env = "HTML_FETCH_TIMEOUT_SECS", default_value_t = 10)]
    pub html_fetch_timeout_secs: u64,

    #[arg(long, env = "EXTRACTION_TIMEOUT_SECS", default_value_t = 45)]
    pub extraction_timeout_secs: u64,

    #[arg(long, env = "RANKING_TIMEOUT_SECS", default_value_t = 30)]
    pub ranking_timeout_secs: u64,

    #[arg(long, env = "SUMMARIZATION_TIMEOUT_SECS", default_value_t = 30)]
    pub summarization_timeout_secs: u64,

    /// Maximum in-flight calls per fan-out stage
    #[arg(long, env = "FANOUT_CONCURRENCY", default_value_t = DEFAULT_FANOUT_CONCURRENCY)]
    pub fanout_concurrency: usize,

    /// Retries for transient collaborator failures (0 disables)
    #[arg(long, env = "STAGE_MAX_RETRIES", default_value_t = 0)]
    pub stage_max_retries: u32,

    /// Base delay between retries; doubles on every attempt
    #[arg(long, env = "STAGE_RETRY_DELAY_MS", default_value_t = 250)]
    pub stage_retry_delay_ms: u64,
}

/// Validated settings handed to the orchestrator at construction.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub endpoints: StageEndpoints,
    pub retry: RetryPolicy,
    pub fanout_concurrency: usize,
}

impl OrchestratorConfig {
    pub fn new(endpoints: StageEndpoints) -> Self {
        Self {
            endpoints,
            retry: RetryPolicy::none(),
            fanout_concurrency: DEFAULT_FANOUT_CONCURRENCY,
        }
    }
}

impl StageArgs {
    pub fn into_config(self) -> Result<OrchestratorConfig, ConfigError> {
        if self.fanout_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        let endpoints = StageEndpoints {
            query_planner: endpoint(
                "QUERY_PLANNER_URL",
                &self.query_planner_url,
                self.query_planner_timeout_secs,
            )?,
            search: endpoint(
                "SEARCH_SERVICE_URL",
                &self.search_service_url,
                self.search_timeout_secs,
            )?,
            html_fetcher: endpoint(
                "HTML_FETCHER_URL",
                &self.html_fetcher_url,
                self.html_fetch_timeout_secs,
            )?,
            extractor: endpoint(
                "EXTRACTOR_SERVICE_URL",
                &self.extractor_service_url,
                self.extraction_timeout_secs,
            )?,
            ranker: endpoint(
                "RANKER_SERVICE_URL",
                &self.ranker_service_url,
                self.ranking_timeout_secs,
            )?,
            summarizer: endpoint(
                "SUMMARIZER_SERVICE_URL",
                &self.summarizer_service_url,
                self.summarization_timeout_secs,
            )?,
        };

        Ok(OrchestratorConfig {
            endpoints,
            retry: RetryPolicy {
                max_retries: self.stage_max_retries,
                base_delay: Duration::from_millis(self.stage_retry_delay_ms),
            },
            fanout_concurrency: self.fanout_concurrency,
        })
    }
}

fn endpoint(name: &'static str, value: &str, timeout_secs: u64) -> Result<StageEndpoint, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if timeout_secs == 0 {
        return Err(ConfigError::ZeroTimeout { name });
    }

    Ok(StageEndpoint::new(url, Duration::from_secs(timeout_secs)))
}
