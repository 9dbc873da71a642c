//! Resource-owner password grant against the token endpoint
//!
//! One attempt is one form POST to `TOKEN_ENDPOINT` with `grant_type=password`.
//! The endpoint answers 200 with tokens when the password is valid and a JSON
//! error envelope (with an AADSTS code) otherwise. Tokens are never read: a
//! 200 is all the engine needs to know.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use provider::{AttemptResponse, Authenticator, ProviderError};
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::debug;

use crate::constants::{CLIENT_ID, CLIENT_INFO, GRANT_TYPE, RESOURCE, SCOPE};
use crate::error::{Error, Result};
use crate::user_agent::random_user_agent;

/// Form body for one password-grant attempt, in wire order.
pub fn password_grant_form<'a>(username: &'a str, password: &'a str) -> [(&'static str, &'a str); 7] {
    [
        ("resource", RESOURCE),
        ("client_id", CLIENT_ID),
        ("client_info", CLIENT_INFO),
        ("grant_type", GRANT_TYPE),
        ("username", username),
        ("password", password),
        ("scope", SCOPE),
    ]
}

/// `Authenticator` backed by a real HTTP token endpoint.
///
/// The reqwest client is built once with the per-request timeout and shared
/// by every worker (it is internally reference counted).
pub struct TokenEndpointAuthenticator {
    client: reqwest::Client,
    endpoint: String,
}

impl TokenEndpointAuthenticator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, username: &str, password: &str) -> provider::Result<AttemptResponse> {
        let request = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, random_user_agent())
            .form(&password_grant_form(username, password))
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(username, status = status.as_u16(), "token endpoint responded");

        if status == reqwest::StatusCode::OK {
            return Ok(AttemptResponse::Accepted);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Body(e.to_string()))?;

        Ok(AttemptResponse::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

impl Authenticator for TokenEndpointAuthenticator {
    fn id(&self) -> &str {
        "aad-token-endpoint"
    }

    fn attempt<'a>(
        &'a self,
        username: &'a str,
        password: &'a str,
    ) -> Pin<Box<dyn Future<Output = provider::Result<AttemptResponse>> + Send + 'a>> {
        Box::pin(self.send(username, password))
    }
}
