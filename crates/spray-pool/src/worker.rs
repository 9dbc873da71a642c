//! Spray worker
//!
//! Each worker loops over the shared job queue until it is closed and empty:
//! check the lockout breaker, attempt the identifier, classify a rejection,
//! publish the outcome. Transport and classification failures skip the job
//! with a log line and no outcome; nothing is retried. A result that finishes
//! after a sibling tripped the breaker is abandoned. Only a tripped breaker
//! ends a worker with an error.

use std::sync::Arc;

use common::Secret;
use provider::{AttemptResponse, Authenticator};
use tokio::sync::Mutex;
use tokio::sync::mpsc::{Receiver, Sender};
use tracing::{debug, info, warn};

use crate::classify::classify_response;
use crate::counters::SprayCounters;
use crate::error::{JobError, Result};
use crate::lockout::LockoutBreaker;
use crate::outcome::Outcome;

/// An outcome and, when it reported a locked account, the breaker total it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempted {
    pub outcome: Outcome,
    pub lockout: Option<u64>,
}

/// Everything a worker shares with its siblings.
#[derive(Clone)]
pub struct WorkerContext {
    pub authenticator: Arc<dyn Authenticator>,
    pub password: Arc<Secret<String>>,
    pub breaker: Arc<LockoutBreaker>,
    pub counters: Arc<SprayCounters>,
}

/// Run one worker until the job queue is drained or the breaker trips.
pub async fn run_worker(
    worker_id: usize,
    jobs: Arc<Mutex<Receiver<String>>>,
    results: Sender<Outcome>,
    ctx: WorkerContext,
) -> Result<()> {
    debug!(worker_id, "worker started");
    loop {
        // Hold the lock only for the pop so siblings can take the next job
        let job = { jobs.lock().await.recv().await };
        let Some(identifier) = job else { break };

        ctx.breaker.check()?;

        match attempt(&ctx, &identifier).await {
            Ok(Attempted { lockout, .. }) if !ctx.breaker.admits(lockout) => {
                ctx.counters.record_skip();
                metrics::counter!("spray_skipped_total", "reason" => "breach").increment(1);
                info!(worker_id, identifier = %identifier, "breaker tripped during attempt, abandoning result");
            }
            Ok(Attempted { outcome, .. }) => {
                record_outcome(&outcome);
                if results.send(outcome).await.is_err() {
                    warn!(worker_id, "result queue closed, stopping worker");
                    break;
                }
            }
            Err(e) => {
                ctx.counters.record_skip();
                metrics::counter!("spray_skipped_total", "reason" => e.reason()).increment(1);
                match &e {
                    JobError::Classification(_) => {
                        warn!(worker_id, identifier = %identifier, error = %e, "unrecognized response, skipping")
                    }
                    JobError::Attempt(_) => {
                        warn!(worker_id, identifier = %identifier, reason = e.reason(), error = %e, "attempt failed, skipping")
                    }
                }
            }
        }
    }
    debug!(worker_id, "job queue drained, worker exiting");
    Ok(())
}

/// Attempt a single identifier and turn the response into an outcome.
pub async fn attempt(
    ctx: &WorkerContext,
    identifier: &str,
) -> std::result::Result<Attempted, JobError> {
    let password = ctx.password.expose();
    metrics::counter!("spray_attempts_total").increment(1);

    match ctx.authenticator.attempt(identifier, password).await? {
        AttemptResponse::Accepted => {
            info!(identifier, "credentials accepted");
            Ok(Attempted {
                outcome: Outcome::success(identifier, password.as_str()),
                lockout: None,
            })
        }
        AttemptResponse::Rejected { status, body } => {
            let classified = classify_response(&body, &ctx.breaker)?;
            debug!(identifier, status, code = %classified.error.code, "credentials rejected");
            Ok(Attempted {
                outcome: Outcome::failure(identifier, password.as_str(), classified.error),
                lockout: classified.lockout,
            })
        }
    }
}

fn record_outcome(outcome: &Outcome) {
    let result = if outcome.success { "success" } else { "failure" };
    let code = outcome.error_code.clone().unwrap_or_default();
    metrics::counter!("spray_outcomes_total", "result" => result, "code" => code).increment(1);
}
