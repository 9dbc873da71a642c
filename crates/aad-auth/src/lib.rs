//! Azure AD token endpoint client
//!
//! Everything that knows about the remote identity endpoint lives here:
//! the fixed password-grant parameters, the User-Agent pool, the reqwest
//! based `TokenEndpointAuthenticator`, and the AADSTS error-code lookup that
//! turns a rejected response body into a code and a readable meaning.
//!
//! Attempt flow:
//! 1. `token::password_grant_form()` builds the form for one identifier
//! 2. `TokenEndpointAuthenticator::attempt()` POSTs it with a random User-Agent
//! 3. 200 means the password is valid; anything else goes to
//!    `aadsts::lookup_error_code()` with the response body

pub mod aadsts;
pub mod constants;
pub mod error;
pub mod token;
pub mod user_agent;

pub use aadsts::{AadError, KNOWN_CODES, KnownCode, lookup_error_code};
pub use constants::*;
pub use error::{Error, Result};
pub use token::{TokenEndpointAuthenticator, password_grant_form};
pub use user_agent::random_user_agent;
