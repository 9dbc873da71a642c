//! Input loading errors
//!
//! All of these are configuration errors: they stop the binary before the
//! engine starts.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("file '{}' does not exist", path.display())]
    MissingFile { path: PathBuf },

    #[error("could not read file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no valid emails supplied")]
    NoValidUsers,

    #[error("no password supplied")]
    NoPassword,

    #[error("password file '{}' is empty", .0.display())]
    EmptyPassword(PathBuf),

    #[error("could not open output file '{}': {source}", path.display())]
    Outfile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result alias using service Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages_are_descriptive() {
        assert_eq!(
            Error::MissingFile {
                path: PathBuf::from("users.txt")
            }
            .to_string(),
            "file 'users.txt' does not exist"
        );
        assert_eq!(Error::NoValidUsers.to_string(), "no valid emails supplied");
        assert_eq!(
            Error::EmptyPassword(PathBuf::from("pw.txt")).to_string(),
            "password file 'pw.txt' is empty"
        );
    }

    #[test]
    fn error_debug_includes_variant_name() {
        let err = Error::Read {
            path: PathBuf::from("users.txt"),
            source: std::io::Error::other("denied"),
        };
        let debug = format!("{err:?}");
        assert!(
            debug.contains("Read"),
            "Debug output must include variant name, got: {debug}"
        );
        assert!(err.to_string().contains("denied"));
    }
}
