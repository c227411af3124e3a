//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use crate::role::SESSION_USER_ROLE;

/// Default location of the site file.
pub const DEFAULT_SITE_CONFIG: &str = "./config/site.toml";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to the site file, TOML or YAML (default: ./config/site.toml).
    pub site_config: PathBuf,

    /// Session key holding the selected role (default: user_role).
    pub session_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a variable lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let site_config = lookup("SITENAV_CONFIG")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SITE_CONFIG));

        let session_key = lookup("SITENAV_SESSION_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| SESSION_USER_ROLE.to_string());

        Self {
            site_config,
            session_key,
        }
    }
}
