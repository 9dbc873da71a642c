//! User list and password loading
//!
//! Users are read one per line, trimmed and lowercased. Lines that are not
//! plausible email addresses or repeat an earlier address are dropped with an
//! info log. The password is the first line of its file.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use common::Secret;
use regex::Regex;
use tracing::info;

use crate::error::{Error, Result};

const MIN_EMAIL_LEN: usize = 5;
const MAX_EMAIL_LEN: usize = 255;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is a valid regex")
});

/// Whether `candidate` looks like an email address worth spraying.
pub fn is_email(candidate: &str) -> bool {
    (MIN_EMAIL_LEN..=MAX_EMAIL_LEN).contains(&candidate.len()) && EMAIL.is_match(candidate)
}

/// Normalize and filter a user list, preserving first-seen order.
pub fn parse_users(contents: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut users = Vec::new();

    for line in contents.lines() {
        let user = line.trim().to_lowercase();
        if user.is_empty() {
            continue;
        }
        if seen.contains(&user) {
            info!(user = %user, "ignoring duplicate user");
            continue;
        }
        if !is_email(&user) {
            info!(user = %user, "ignoring invalid email");
            continue;
        }
        seen.insert(user.clone());
        users.push(user);
    }

    users
}

/// Read the user file. An empty result is an error.
pub fn load_users(path: &Path) -> Result<Vec<String>> {
    let contents = read(path)?;
    let users = parse_users(&contents);
    if users.is_empty() {
        return Err(Error::NoValidUsers);
    }
    info!(users = users.len(), "loaded user list");
    Ok(users)
}

/// Read the first line of the password file.
pub fn load_password(path: &Path) -> Result<Secret<String>> {
    let contents = read(path)?;
    let first = contents
        .lines()
        .next()
        .map(|line| line.trim_end_matches('\r'))
        .unwrap_or_default();
    if first.is_empty() {
        return Err(Error::EmptyPassword(path.to_path_buf()));
    }
    Ok(Secret::new(first.to_string()))
}

fn read(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::MissingFile {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}
