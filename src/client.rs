//! Rate-limited submission client for the "create document" endpoint.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use tracing::debug;

use crate::config::ClientConfig;
use crate::document::Document;
use crate::error::{CrptError, Result};
use crate::ratelimit::{RateLimitedGate, WindowUnit};
use crate::report::{OutcomeReporter, RequestOutcome, TracingReporter};

/// Client for submitting documents to the CRPT ISMP endpoint.
///
/// All submissions pass through one [`RateLimitedGate`], so the client can
/// be shared (via `Arc`) across any number of concurrent tasks and the
/// configured request limit holds across all of them.
pub struct CrptClient {
    http: reqwest::Client,
    gate: Arc<RateLimitedGate>,
    endpoint: Url,
    reporter: Arc<dyn OutcomeReporter>,
}

impl CrptClient {
    /// Create a client with the given window unit and request limit.
    ///
    /// Both are required and have no defaults. Must be called from within a
    /// Tokio runtime (the gate spawns its reset task).
    pub fn new(window: WindowUnit, request_limit: u32) -> Result<Self> {
        Self::with_config(ClientConfig::new(window, request_limit))
    }

    /// Create a client from a full configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_reporter(config, Arc::new(TracingReporter))
    }

    /// Create a client with a custom outcome reporter.
    pub fn with_reporter(
        config: ClientConfig,
        reporter: Arc<dyn OutcomeReporter>,
    ) -> Result<Self> {
        config.validate()?;

        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| CrptError::Config(format!("Invalid endpoint URL: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let gate = Arc::new(RateLimitedGate::new(config.window, config.request_limit)?);

        Ok(Self {
            http,
            gate,
            endpoint,
            reporter,
        })
    }

    /// Submit a document, blocking until a rate limit slot is available.
    ///
    /// The slot is held for the duration of the POST and released on every
    /// exit path. Non-2xx responses are normal completions: the status code
    /// is returned for the caller to act on. Transport failures and an
    /// aborted wait surface as errors; every outcome is additionally
    /// reported through the configured [`OutcomeReporter`].
    pub async fn create_document(&self, document: &Document) -> Result<StatusCode> {
        let _slot = match self.gate.acquire().await {
            Ok(slot) => slot,
            Err(e) => {
                self.reporter.report(&RequestOutcome::Cancelled);
                return Err(e);
            }
        };

        let body = serde_json::to_vec(document)?;
        debug!(endpoint = %self.endpoint, bytes = body.len(), "Submitting document");

        match self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                self.reporter.report(&RequestOutcome::Completed(status));
                Ok(status)
            }
            Err(e) => {
                self.reporter
                    .report(&RequestOutcome::TransportFailure(e.to_string()));
                Err(CrptError::Transport(e))
            }
        }
    }

    /// Shut the client down: close the gate and stop its reset task.
    ///
    /// Submissions blocked on a slot observe [`CrptError::GateClosed`];
    /// in-flight requests run to completion.
    pub fn shutdown(&self) {
        self.gate.close();
    }

    /// Get the rate limit gate shared by all submissions.
    pub fn gate(&self) -> &RateLimitedGate {
        &self.gate
    }
}
