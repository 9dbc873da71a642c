//! Authenticator abstraction for the spray engine
//!
//! Defines the `Authenticator` trait that decouples the worker pool from the
//! concrete identity endpoint. The engine only knows that an attempt either
//! got accepted, got rejected with a body worth classifying, or failed before
//! a usable response existed. `aad_auth::TokenEndpointAuthenticator` is the
//! production implementation; tests plug in scripted authenticators.

use std::future::Future;
use std::pin::Pin;

/// Result of one authentication attempt that produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResponse {
    /// The endpoint answered 200: the secret is valid for this identifier
    Accepted,
    /// Any other status, with the fully read response body
    Rejected { status: u16, body: String },
}

/// Failures that leave no response to classify.
///
/// All of these are per-attempt and non-fatal: the worker logs them and
/// moves on to the next identifier without emitting an outcome.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("building request failed: {0}")]
    Request(String),

    #[error("sending request failed: {0}")]
    Transport(String),

    #[error("reading response body failed: {0}")]
    Body(String),
}

impl ProviderError {
    /// Short label for logs and metrics (`request`, `transport`, `body`).
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Request(_) => "request",
            ProviderError::Transport(_) => "transport",
            ProviderError::Body(_) => "body",
        }
    }
}

/// Result alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Issues a single password authentication attempt.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`Arc<dyn Authenticator>` is shared by every worker).
pub trait Authenticator: Send + Sync {
    /// Identifier for logging (e.g. "aad-token-endpoint")
    fn id(&self) -> &str;

    /// Attempt to authenticate `username` with `password`.
    ///
    /// Implementations must not retry: one call is one request.
    fn attempt<'a>(
        &'a self,
        username: &'a str,
        password: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<AttemptResponse>> + Send + 'a>>;
}
