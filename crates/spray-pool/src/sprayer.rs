//! Spray orchestration
//!
//! Wires dispatcher → job queue → worker pool → result queue → aggregator and
//! waits for the pipeline to finish. Normal completion: the dispatcher closes
//! the job queue, workers drain it and drop their result senders, the
//! aggregator sees the stream close. Lockout breach: the first worker to see
//! the tripped breaker ends the run and the dispatcher is aborted. Sibling
//! workers let the request they already have in flight complete, abandon its
//! result, and fail their own pre-attempt check on the next job. No new
//! request is issued, no outcome follows the tripping lockout, and every
//! outcome published before it reaches the aggregator. The breach is
//! returned once the result stream has drained.

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::Secret;
use provider::Authenticator;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::aggregate::Aggregator;
use crate::counters::SprayCounters;
use crate::dispatch::dispatch;
use crate::error::{Error, Result};
use crate::lockout::LockoutBreaker;
use crate::worker::{WorkerContext, run_worker};

/// Upper bound on concurrent workers, to keep the request rate low.
pub const MAX_WORKERS: usize = 3;

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprayReport {
    pub dispatched: usize,
    pub succeeded: u64,
    pub failed: u64,
    pub skipped: u64,
    pub lockouts: u64,
    pub elapsed: Duration,
}

pub struct Sprayer {
    authenticator: Arc<dyn Authenticator>,
    breaker: Arc<LockoutBreaker>,
    workers: usize,
}

impl Sprayer {
    /// `workers` is clamped to `1..=MAX_WORKERS`.
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        breaker: Arc<LockoutBreaker>,
        workers: usize,
    ) -> Self {
        let clamped = workers.clamp(1, MAX_WORKERS);
        if clamped != workers {
            warn!(requested = workers, using = clamped, "worker count out of range, clamping");
        }
        Self {
            authenticator,
            breaker,
            workers: clamped,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn breaker(&self) -> &Arc<LockoutBreaker> {
        &self.breaker
    }

    /// Spray `password` against every identifier.
    ///
    /// `identifiers` must already be normalized and deduplicated; each one is
    /// attempted at most once.
    pub async fn run(
        &self,
        identifiers: Vec<String>,
        password: Secret<String>,
        aggregator: Aggregator,
    ) -> Result<SprayReport> {
        let started = Instant::now();
        let counters: Arc<SprayCounters> = aggregator.counters().clone();

        info!(
            identifiers = identifiers.len(),
            workers = self.workers,
            threshold = self.breaker.threshold(),
            authenticator = self.authenticator.id(),
            "starting spray"
        );

        let (job_tx, job_rx) = mpsc::channel::<String>(self.workers);
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, result_rx) = mpsc::channel(self.workers);

        let aggregator_handle = tokio::spawn(aggregator.consume(result_rx));

        let ctx = WorkerContext {
            authenticator: self.authenticator.clone(),
            password: Arc::new(password),
            breaker: self.breaker.clone(),
            counters: counters.clone(),
        };

        let mut workers = JoinSet::new();
        for worker_id in 0..self.workers {
            workers.spawn(run_worker(
                worker_id,
                job_rx.clone(),
                result_tx.clone(),
                ctx.clone(),
            ));
        }
        // Workers own the only result senders and job receivers from here on
        drop(result_tx);
        drop(job_rx);

        let dispatcher = tokio::spawn(dispatch(identifiers, job_tx));

        let mut halted: Option<Error> = None;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if halted.is_none() {
                        error!(error = %e, "halting spray");
                        dispatcher.abort();
                        halted = Some(e);
                    }
                }
                Err(e) => {
                    error!(error = %e, "worker task panicked");
                    if halted.is_none() {
                        halted = Some(Error::Worker(e.to_string()));
                    }
                }
            }
        }

        // The tripping lockout may have been the last job, leaving no worker to fail the check
        if halted.is_none() {
            if let Err(e) = self.breaker.check() {
                error!(error = %e, "halting spray");
                halted = Some(e);
            }
        }

        let received = aggregator_handle
            .await
            .map_err(|e| Error::Aggregator(e.to_string()))?;
        debug!(received, "aggregator finished");

        let dispatched = match dispatcher.await {
            Ok(sent) => sent,
            // Aborted after a breach: count the jobs the workers actually took
            Err(e) if e.is_cancelled() => {
                (counters.succeeded() + counters.failed() + counters.skipped()) as usize
            }
            Err(e) => return Err(Error::Worker(format!("dispatcher failed: {e}"))),
        };

        let report = SprayReport {
            dispatched,
            succeeded: counters.succeeded(),
            failed: counters.failed(),
            skipped: counters.skipped(),
            lockouts: self.breaker.locked(),
            elapsed: started.elapsed(),
        };

        info!(
            dispatched = report.dispatched,
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            lockouts = report.lockouts,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "spray finished"
        );

        match halted {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }
}
