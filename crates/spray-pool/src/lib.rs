//! Concurrent password-spray engine
//!
//! Fans a fixed list of identifiers out to a small worker pool, classifies
//! every response, and fans the classified outcomes back in to a single
//! aggregator. A shared lockout breaker halts the whole run once too many
//! accounts report AADSTS50053.
//!
//! Pipeline:
//! 1. `dispatch::dispatch()` pushes identifiers onto a bounded job queue, then closes it
//! 2. Workers (`worker::run_worker`) pop jobs, check the breaker, attempt, classify
//! 3. Each classified `Outcome` goes onto the result queue
//! 4. `Aggregator::consume()` renders, persists, and tallies every outcome
//! 5. `Sprayer::run()` wires it together and reports, or returns the breach

pub mod aggregate;
pub mod classify;
pub mod counters;
pub mod dispatch;
pub mod error;
pub mod lockout;
pub mod outcome;
pub mod sprayer;
pub mod worker;

pub use aggregate::{Aggregator, OutputFormat};
pub use classify::{Classified, classify_response};
pub use counters::SprayCounters;
pub use error::{Error, JobError, Result};
pub use lockout::{BreakerState, DEFAULT_LOCKOUT_THRESHOLD, LockoutBreaker};
pub use outcome::Outcome;
pub use sprayer::{MAX_WORKERS, SprayReport, Sprayer};
