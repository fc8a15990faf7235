//! Bounded-time JSON calls to a named collaborator.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{Result, StageError};
use crate::stage::{Stage, StageEndpoints};

/// How many times a transient failure is repeated before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Exponential backoff: `base_delay * 2^(attempt - 1)`.
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(10);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(250),
        }
    }
}

/// Client for every pipeline collaborator.
///
/// Cheap to clone: the connection pool and endpoint table are shared.
#[derive(Clone)]
pub struct StageClient {
    http: reqwest::Client,
    endpoints: Arc<StageEndpoints>,
    retry: RetryPolicy,
}

impl StageClient {
    pub fn new(endpoints: StageEndpoints) -> std::result::Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            endpoints: Arc::new(endpoints),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoints(&self) -> &StageEndpoints {
        &self.endpoints
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// POST `body` to the stage route and decode the reply as `Resp`.
    ///
    /// Transient failures are repeated according to the retry policy; the
    /// last error is returned once retries run out.
    pub async fn call<Req, Resp>(&self, stage: Stage, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let mut attempt = 0;
        loop {
            match self.call_once(stage, body).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempt >= self.retry.max_retries || !e.is_transient() {
                        return Err(e);
                    }
                    attempt += 1;
                    let delay = self.retry.backoff(attempt);
                    warn!(
                        stage = stage.name(),
                        attempt,
                        ?delay,
                        "Retrying after transient failure: {}",
                        e
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    async fn call_once<Req, Resp>(&self, stage: Stage, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let endpoint = self.endpoints.get(stage);
        let url = endpoint.route(stage);
        let timeout = endpoint.timeout;
        debug!(stage = stage.name(), %url, ?timeout, "Calling collaborator");

        let response = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| StageError::from_reqwest(stage, timeout, e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StageError::from_reqwest(stage, timeout, e))?;

        if !status.is_success() {
            return Err(StageError::status(
                stage,
                status.as_u16(),
                &String::from_utf8_lossy(&bytes),
            ));
        }

        serde_json::from_slice(&bytes).map_err(|e| StageError::Decode {
            stage,
            reason: e.to_string(),
        })
    }
}
