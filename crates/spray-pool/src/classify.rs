//! Response classification with the lockout side effect
//!
//! Wraps the pure `aad_auth::lookup_error_code` table lookup: every
//! "account locked" classification bumps the shared breaker exactly once.

use aad_auth::AadError;
use tracing::warn;

use crate::lockout::LockoutBreaker;

/// A classified rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub error: AadError,
    /// Breaker total right after this response, when it reported a locked account
    pub lockout: Option<u64>,
}

/// Classify a rejected response body and feed the lockout breaker.
pub fn classify_response(body: &str, breaker: &LockoutBreaker) -> aad_auth::Result<Classified> {
    let error = aad_auth::lookup_error_code(body)?;
    let lockout = if error.is_account_locked() {
        let locked = breaker.record_lockout();
        warn!(locked, threshold = breaker.threshold(), "account locked response observed");
        Some(locked)
    } else {
        None
    };
    Ok(Classified { error, lockout })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const LOCKED_BODY: &str = r#"{"error":"invalid_grant","error_description":"AADSTS50053: The account is locked\r\nTrace ID: 1","error_codes":[50053]}"#;

    #[test]
    fn locked_body_increments_once() {
        let breaker = LockoutBreaker::new(10);
        let classified = classify_response(LOCKED_BODY, &breaker).unwrap();
        assert_eq!(classified.error.code, "AADSTS50053");
        assert_eq!(classified.error.message, "Account locked");
        assert_eq!(classified.lockout, Some(1));
        assert_eq!(breaker.locked(), 1);

        let second = classify_response(LOCKED_BODY, &breaker).unwrap();
        assert_eq!(second.lockout, Some(2), "each call reports its own running total");
    }

    #[test]
    fn other_codes_leave_counter_alone() {
        let breaker = LockoutBreaker::new(10);
        let classified = classify_response("AADSTS50126", &breaker).unwrap();
        assert_eq!(classified.lockout, None);
        classify_response("AADSTS50034", &breaker).unwrap();
        classify_response(r#"{"error_codes":[700016]}"#, &breaker).unwrap();
        assert_eq!(breaker.locked(), 0);
    }

    #[test]
    fn classification_errors_leave_counter_alone() {
        let breaker = LockoutBreaker::new(10);
        assert!(classify_response(r#"{"error_codes":[]}"#, &breaker).is_err());
        assert!(classify_response("not json", &breaker).is_err());
        assert_eq!(breaker.locked(), 0);
    }

    #[test]
    fn concurrent_locked_calls_count_every_call() {
        let breaker = Arc::new(LockoutBreaker::new(u64::MAX));
        let calls_per_thread = 100;
        let threads = 6;
        std::thread::scope(|scope| {
            for _ in 0..threads {
                let breaker = breaker.clone();
                scope.spawn(move || {
                    for _ in 0..calls_per_thread {
                        classify_response(LOCKED_BODY, &breaker).unwrap();
                    }
                });
            }
        });
        assert_eq!(breaker.locked(), threads * calls_per_thread);
    }
}
