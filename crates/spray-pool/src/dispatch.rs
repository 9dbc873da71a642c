//! Job dispatcher
//!
//! Feeds the bounded job queue from the identifier list in order. Dropping
//! the sender at the end closes the queue: workers drain what is left and
//! exit.

use tokio::sync::mpsc::Sender;
use tracing::{debug, warn};

/// Push every identifier onto the job queue, then close it.
///
/// Blocks while the queue is full. Returns how many identifiers were handed
/// to the pool; this is short of `identifiers.len()` only when every worker
/// has already gone away (for example after a lockout breach).
pub async fn dispatch(identifiers: Vec<String>, jobs: Sender<String>) -> usize {
    let total = identifiers.len();
    let mut sent = 0;
    for identifier in identifiers {
        if jobs.send(identifier).await.is_err() {
            warn!(sent, total, "job queue closed early, stopping dispatch");
            break;
        }
        sent += 1;
    }
    debug!(sent, "dispatch complete, closing job queue");
    sent
}
