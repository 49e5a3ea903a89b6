//! Submission outcome reporting.

use reqwest::StatusCode;
use tracing::{error, info, warn};

/// Outcome of a single document submission.
///
/// Reported exactly once per submission; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The POST completed with a status code (2xx or not)
    Completed(StatusCode),
    /// The POST could not be completed
    TransportFailure(String),
    /// The wait for a rate limit slot was aborted
    Cancelled,
}

/// Observer for submission outcomes.
///
/// The default [`TracingReporter`] logs through `tracing`; custom
/// implementations can capture outcomes for callers that need more than
/// the returned result.
pub trait OutcomeReporter: Send + Sync {
    /// Report the outcome of one submission.
    fn report(&self, outcome: &RequestOutcome);
}

/// Reporter that logs outcomes through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl OutcomeReporter for TracingReporter {
    fn report(&self, outcome: &RequestOutcome) {
        match outcome {
            RequestOutcome::Completed(status) => {
                info!(status = %status, "Request sent");
            }
            RequestOutcome::TransportFailure(reason) => {
                error!(reason = %reason, "Error sending request");
            }
            RequestOutcome::Cancelled => {
                warn!("Submission aborted while waiting for a slot");
            }
        }
    }
}
