//! Types shared by the spray engine and the `msolspray` binary

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
