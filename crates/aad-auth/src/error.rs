//! Error types for response classification

/// Errors from turning a rejected response body into an AADSTS code.
///
/// Both variants are per-attempt: the caller skips the identifier, it never
/// aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("response matched no known code and is not a JSON error envelope: {0}")]
    EnvelopeParse(String),

    #[error("error envelope carried no error_codes")]
    EmptyErrorCodes,

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
