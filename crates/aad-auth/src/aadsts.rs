//! AADSTS error-code lookup for rejected token requests
//!
//! Azure AD embeds an `AADSTSnnnnn` code in every failed token response. A
//! handful of codes matter for spraying (wrong password, unknown user, MFA,
//! lockout, ...) and are matched as literal substrings of the raw body, in
//! table order. Anything else falls back to parsing the JSON error envelope
//! and reporting its first error code with the first line of its description.
//!
//! Reference: https://learn.microsoft.com/en-us/entra/identity-platform/reference-error-codes

use serde::Deserialize;

use crate::constants::AADSTS_PREFIX;
use crate::error::{Error, Result};

/// Code reported when the target account is locked (smart lockout).
pub const ACCOUNT_LOCKED: &str = "AADSTS50053";

/// One row of the marker table: a literal code and its meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownCode {
    pub code: &'static str,
    pub message: &'static str,
}

/// Ordered marker table, first match wins.
///
/// Codes are distinct literal tokens of equal length, so no marker can be a
/// substring of another and the order only affects bodies that carry more
/// than one code.
pub const KNOWN_CODES: &[KnownCode] = &[
    KnownCode { code: "AADSTS50126", message: "Invalid password" },
    KnownCode { code: "AADSTS50128", message: "Tenant not found" },
    KnownCode { code: "AADSTS50059", message: "Tenant not found" },
    KnownCode { code: "AADSTS50034", message: "User does not exist" },
    KnownCode { code: "AADSTS50079", message: "Password correct, MFA present" },
    KnownCode { code: "AADSTS50076", message: "Password correct, MFA present" },
    KnownCode {
        code: "AADSTS50158",
        message: "Password correct, MFA + Conditional Access",
    },
    KnownCode {
        code: "AADSTS53003",
        message: "Password correct, Conditional Access policy",
    },
    KnownCode { code: ACCOUNT_LOCKED, message: "Account locked" },
    KnownCode { code: "AADSTS50057", message: "Account disabled" },
    KnownCode { code: "AADSTS50055", message: "Password correct but expired" },
];

/// Classified failure: the AADSTS code and a human meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AadError {
    pub code: String,
    pub message: String,
}

impl AadError {
    /// Whether this classification counts toward the lockout breaker.
    pub fn is_account_locked(&self) -> bool {
        self.code == ACCOUNT_LOCKED
    }
}

impl From<&KnownCode> for AadError {
    fn from(known: &KnownCode) -> Self {
        Self {
            code: known.code.to_string(),
            message: known.message.to_string(),
        }
    }
}

/// JSON error body returned by the token endpoint.
///
/// Every field defaults so partial envelopes still parse; only
/// `error_codes` and `error_description` are used for classification.
#[derive(Debug, Default, Deserialize)]
#[allow(dead_code)]
struct ErrorEnvelope {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
    #[serde(default)]
    error_codes: Vec<i64>,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    trace_id: String,
    #[serde(default)]
    correlation_id: String,
    #[serde(default)]
    error_uri: String,
}

/// Classify a rejected response body.
///
/// Pure function: the lockout side effect belongs to the caller (see
/// `AadError::is_account_locked`).
pub fn lookup_error_code(body: &str) -> Result<AadError> {
    if let Some(known) = KNOWN_CODES.iter().find(|k| body.contains(k.code)) {
        return Ok(known.into());
    }

    let envelope: ErrorEnvelope =
        serde_json::from_str(body).map_err(|e| Error::EnvelopeParse(e.to_string()))?;

    let first = envelope.error_codes.first().ok_or(Error::EmptyErrorCodes)?;
    let message = envelope
        .error_description
        .split("\r\n")
        .next()
        .unwrap_or_default()
        .to_string();

    Ok(AadError {
        code: format!("{AADSTS_PREFIX}{first}"),
        message,
    })
}
