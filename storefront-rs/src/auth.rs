//! Bootstrap users loaded from a TOML file, plus password hashing.
//!
//! ## Users file format
//!
//! ```toml
//! [[users]]
//! name = "admin"
//! password = "secret"
//! role = "admin"
//!
//! [[users]]
//! name = "bob"
//! password = "pw2"
//! ```
//!
//! `role` is optional and defaults to `user`; valid roles are `admin`,
//! `manager`, and `user`. Duplicate names are deduplicated (last wins).
//! Entries with an empty name or password are skipped. The file is applied
//! at startup: each entry is upserted into the `users` table with its
//! password hashed, so a fresh deployment has an admin account.
//!
//! **Security:** Use `chmod 600` on the users file. The server warns if it
//! is world-readable (Unix).

use std::collections::BTreeMap;
use std::path::Path;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

const VALID_ROLES: &[&str] = &["admin", "manager", "user"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapUser {
    pub name: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Error)]
pub enum UsersFileError {
    #[error("failed to read users file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid users file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("users file {path} does not define valid credentials")]
    EmptyCredentials { path: String },
    #[error("users file {path} assigns unknown role {role:?} to {name}")]
    InvalidRole {
        path: String,
        name: String,
        role: String,
    },
}

#[derive(Debug, Default, Deserialize)]
struct UsersFile {
    users: Option<Vec<UserEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
struct UserEntry {
    name: String,
    password: String,
    role: Option<String>,
}

/// Load bootstrap users from a file. Returns an empty list if path is None.
/// Warns if the users file is world-readable (Unix only).
pub fn load_bootstrap_users(path: Option<&Path>) -> Result<Vec<BootstrapUser>, UsersFileError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    check_users_file_permissions(path);

    let raw = std::fs::read_to_string(path).map_err(|source| UsersFileError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let parsed: UsersFile = toml::from_str(&raw).map_err(|source| UsersFileError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    let mut deduped = BTreeMap::new();
    for entry in parsed.users.unwrap_or_default() {
        let name = entry.name.trim().to_string();
        let password = entry.password.trim().to_string();
        if name.is_empty() || password.is_empty() {
            continue;
        }
        let role = entry.role.unwrap_or_else(|| String::from("user"));
        if !VALID_ROLES.contains(&role.as_str()) {
            return Err(UsersFileError::InvalidRole {
                path: path.display().to_string(),
                name,
                role,
            });
        }
        deduped.insert(name, (password, role));
    }

    if deduped.is_empty() {
        return Err(UsersFileError::EmptyCredentials {
            path: path.display().to_string(),
        });
    }

    Ok(deduped
        .into_iter()
        .map(|(name, (password, role))| BootstrapUser {
            name,
            password,
            role,
        })
        .collect::<Vec<_>>())
}

/// Warn if users file is world-readable. No-op on non-Unix.
#[cfg(unix)]
fn check_users_file_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(meta) = std::fs::metadata(path) {
        let mode = meta.permissions().mode();
        if mode & 0o004 != 0 {
            warn!(
                path = %path.display(),
                "users file is world-readable; consider chmod 600"
            );
        }
    }
}

#[cfg(not(unix))]
fn check_users_file_permissions(_path: &Path) {}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a password against a stored PHC-format hash.
/// An unparsable hash counts as a failed verification.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
