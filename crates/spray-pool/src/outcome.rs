//! Classified result of one authentication attempt

use aad_auth::AadError;
use serde::{Serialize, Serializer};

/// One outcome per processed identifier, produced by the worker that handled
/// it and owned by the aggregator afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub identifier: String,
    pub secret: String,
    pub success: bool,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl Outcome {
    pub fn success(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
            success: true,
            error_code: None,
            error_message: None,
        }
    }

    pub fn failure(
        identifier: impl Into<String>,
        secret: impl Into<String>,
        error: AadError,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
            success: false,
            error_code: Some(error.code),
            error_message: Some(error.message),
        }
    }

    /// Human-readable line: `[+] <id>` or `[-] <id> <message>`.
    pub fn to_line(&self) -> String {
        if self.success {
            format!("[+] {}", self.identifier)
        } else {
            format!(
                "[-] {} {}",
                self.identifier,
                self.error_message.as_deref().unwrap_or_default()
            )
        }
    }
}

/// Structured record layout, field names fixed for downstream tooling.
#[derive(Serialize)]
struct OutcomeRecord<'a> {
    #[serde(rename = "Successful")]
    successful: bool,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Password")]
    password: &'a str,
    #[serde(rename = "ErrorCode")]
    error_code: &'a str,
    #[serde(rename = "ErrorMsg")]
    error_msg: &'a str,
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OutcomeRecord {
            successful: self.success,
            email: &self.identifier,
            password: &self.secret,
            error_code: self.error_code.as_deref().unwrap_or_default(),
            error_msg: self.error_message.as_deref().unwrap_or_default(),
        }
        .serialize(serializer)
    }
}
