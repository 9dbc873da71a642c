//! Lockout circuit breaker
//!
//! Counts AADSTS50053 ("account locked") classifications across all workers.
//! Once the count reaches the threshold the breaker is tripped for good and
//! every worker's pre-attempt check fails, which ends the run. Repeated
//! lockouts usually mean the source address is being throttled, so carrying
//! on only burns attempts.
//!
//! Transitions:
//! - Normal → Tripped (locked count reaches threshold)
//! - Tripped is terminal

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::error::{Error, Result};

/// Lockouts tolerated before the run is aborted.
pub const DEFAULT_LOCKOUT_THRESHOLD: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Normal,
    Tripped,
}

impl BreakerState {
    /// Status label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            BreakerState::Normal => "normal",
            BreakerState::Tripped => "tripped",
        }
    }
}

/// Shared lockout counter plus threshold.
///
/// Check-then-act between workers is not atomic: several workers can pass
/// `check()` just before the count crosses the threshold, so a run may
/// overshoot by up to one lockout per worker. The counter itself never loses
/// an update.
#[derive(Debug)]
pub struct LockoutBreaker {
    locked: AtomicU64,
    threshold: u64,
}

impl LockoutBreaker {
    pub fn new(threshold: u64) -> Self {
        Self {
            locked: AtomicU64::new(0),
            threshold,
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Number of locked-account classifications observed so far.
    pub fn locked(&self) -> u64 {
        self.locked.load(Ordering::SeqCst)
    }

    /// Count one locked account. Returns the new total.
    pub fn record_lockout(&self) -> u64 {
        let total = self.locked.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::counter!("spray_lockouts_total").increment(1);
        if total == self.threshold {
            warn!(
                locked = total,
                threshold = self.threshold,
                "lockout threshold reached, tripping breaker"
            );
        }
        total
    }

    pub fn state(&self) -> BreakerState {
        if self.locked() >= self.threshold {
            BreakerState::Tripped
        } else {
            BreakerState::Normal
        }
    }

    /// Whether a finished attempt may still be published.
    ///
    /// `lockout` is the total returned by `record_lockout` for this attempt,
    /// if it reported a locked account. Lockouts up to and including the
    /// tripping one are admitted; anything that completes after the trip is
    /// abandoned.
    pub fn admits(&self, lockout: Option<u64>) -> bool {
        match lockout {
            Some(total) => total <= self.threshold,
            None => self.state() == BreakerState::Normal,
        }
    }

    /// Pre-attempt check. Fails with `LockoutBreach` once tripped.
    pub fn check(&self) -> Result<()> {
        let observed = self.locked();
        if observed >= self.threshold {
            return Err(Error::LockoutBreach {
                observed,
                threshold: self.threshold,
            });
        }
        Ok(())
    }
}

impl Default for LockoutBreaker {
    fn default() -> Self {
        Self::new(DEFAULT_LOCKOUT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn starts_normal() {
        let breaker = LockoutBreaker::default();
        assert_eq!(breaker.locked(), 0);
        assert_eq!(breaker.threshold(), DEFAULT_LOCKOUT_THRESHOLD);
        assert_eq!(breaker.state(), BreakerState::Normal);
        assert!(breaker.check().is_ok());
    }

    #[test]
    fn trips_exactly_at_threshold() {
        let breaker = LockoutBreaker::new(3);
        breaker.record_lockout();
        breaker.record_lockout();
        assert_eq!(breaker.state(), BreakerState::Normal);
        assert!(breaker.check().is_ok(), "two of three must not trip");

        assert_eq!(breaker.record_lockout(), 3);
        assert_eq!(breaker.state(), BreakerState::Tripped);
        match breaker.check() {
            Err(Error::LockoutBreach {
                observed,
                threshold,
            }) => {
                assert_eq!(observed, 3);
                assert_eq!(threshold, 3);
            }
            other => panic!("expected LockoutBreach, got {other:?}"),
        }
    }

    #[test]
    fn tripped_is_terminal() {
        let breaker = LockoutBreaker::new(1);
        breaker.record_lockout();
        for _ in 0..5 {
            assert!(breaker.check().is_err());
        }
        breaker.record_lockout();
        assert_eq!(breaker.state(), BreakerState::Tripped);
        assert_eq!(breaker.state().label(), "tripped");
    }

    #[test]
    fn admits_up_to_the_tripping_lockout() {
        let breaker = LockoutBreaker::new(2);
        assert!(breaker.admits(None));

        let first = breaker.record_lockout();
        let second = breaker.record_lockout();
        let overshoot = breaker.record_lockout();

        assert!(breaker.admits(Some(first)));
        assert!(breaker.admits(Some(second)), "the tripping lockout is published");
        assert!(!breaker.admits(Some(overshoot)));
        assert!(!breaker.admits(None), "results finishing after the trip are abandoned");
    }

    #[test]
    fn lockouts_are_exported_as_counter() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let breaker = LockoutBreaker::new(10);
        breaker.record_lockout();
        breaker.record_lockout();

        let output = handle.render();
        assert!(
            output.contains("spray_lockouts_total 2"),
            "rendered output must carry the lockout counter, got: {output}"
        );
    }

    #[test]
    fn concurrent_records_are_not_lost() {
        let breaker = Arc::new(LockoutBreaker::new(u64::MAX));
        std::thread::scope(|scope| {
            for _ in 0..8 {
                let breaker = breaker.clone();
                scope.spawn(move || {
                    for _ in 0..250 {
                        breaker.record_lockout();
                    }
                });
            }
        });
        assert_eq!(breaker.locked(), 2000);
    }
}
