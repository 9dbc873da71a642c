//! Azure AD password-grant constants
//!
//! Public client configuration for the legacy `oauth2/token` endpoint. None
//! of these are secrets; the client id is the well-known public Azure
//! PowerShell-style client that accepts the resource-owner password grant.

/// Token endpoint for the resource-owner password grant
pub const TOKEN_ENDPOINT: &str = "https://login.microsoft.com/common/oauth2/token";

/// Resource the token would be issued for
pub const RESOURCE: &str = "https://graph.windows.net";

/// Public client id sent with every attempt
pub const CLIENT_ID: &str = "1b730954-1685-4b74-9bfd-dac224a7b894";

pub const CLIENT_INFO: &str = "1";

pub const GRANT_TYPE: &str = "password";

pub const SCOPE: &str = "openid";

/// Per-request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Error code prefix used by Azure AD (`AADSTS50126`, ...)
pub const AADSTS_PREFIX: &str = "AADSTS";
