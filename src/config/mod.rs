//! Configuration resolution for `issue_tracker`.
//!
//! Precedence, highest wins: CLI flag, environment variable, built-in
//! default. The environment layer is injectable so precedence is testable
//! without mutating process state.

use crate::error::{Result, TrackerError};
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Listen address used when neither flag nor environment provides one.
pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000);

/// Database filename used when neither flag nor environment provides one.
pub const DEFAULT_DB: &str = "issues.db";

/// Environment variable overriding the listen address.
pub const ENV_BIND: &str = "ISSUE_TRACKER_BIND";

/// Environment variable overriding the database path.
pub const ENV_DB: &str = "ISSUE_TRACKER_DB";

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind: SocketAddr,
    /// Path of the SQLite database file.
    pub db_path: PathBuf,
}

impl ServerConfig {
    /// Resolve configuration from CLI overrides, the environment, and
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment supplies an unparseable listen
    /// address.
    pub fn resolve(bind: Option<SocketAddr>, db_path: Option<PathBuf>) -> Result<Self> {
        Self::resolve_with_env(bind, db_path, env::var(ENV_BIND).ok(), env::var(ENV_DB).ok())
    }

    fn resolve_with_env(
        bind: Option<SocketAddr>,
        db_path: Option<PathBuf>,
        env_bind: Option<String>,
        env_db: Option<String>,
    ) -> Result<Self> {
        let bind = match bind {
            Some(addr) => addr,
            None => match env_bind.as_deref().map(str::trim) {
                Some(value) if !value.is_empty() => value.parse().map_err(|_| {
                    TrackerError::Config(format!("{ENV_BIND}: invalid listen address '{value}'"))
                })?,
                _ => DEFAULT_BIND,
            },
        };

        let db_path = db_path.unwrap_or_else(|| match env_db.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => PathBuf::from(DEFAULT_DB),
        });

        Ok(Self { bind, db_path })
    }
}
