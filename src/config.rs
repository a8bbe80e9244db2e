//! Process configuration, read once at startup and shared by reference.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::ActorId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DEPOT_BOT_TOKEN is not set")]
    MissingToken,

    #[error("DEPOT_OWNER_ID is not set")]
    MissingOwner,

    #[error("DEPOT_OWNER_ID is not a numeric actor id: '{0}'")]
    InvalidOwner(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Bot credential; also the path segment the webhook listens on.
    pub bot_token: String,
    /// The one actor that is always authorized and may manage admins.
    pub owner: ActorId,
    /// Public base URL (`https://host`) to register the webhook under.
    /// Absent for local runs, where the webhook is left untouched.
    pub public_url: Option<String>,
    /// Override for the data directory; defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Sender ids arrive from the transport as integers, so a non-numeric
    /// owner id would make every owner check fail silently. It is rejected
    /// here instead.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = std::env::var("DEPOT_BOT_TOKEN").map_err(|_| ConfigError::MissingToken)?;
        let owner_raw = std::env::var("DEPOT_OWNER_ID").map_err(|_| ConfigError::MissingOwner)?;
        let owner = parse_owner(&owner_raw)?;

        Ok(Self {
            bot_token,
            owner,
            public_url: std::env::var("DEPOT_PUBLIC_URL").ok(),
            data_dir: std::env::var("DEPOT_DATA_DIR").ok().map(PathBuf::from),
        })
    }

    /// Minimal config for tests: a dummy token and the given owner.
    pub fn for_tests(owner: ActorId) -> Self {
        Self {
            bot_token: "test-token".to_string(),
            owner,
            public_url: None,
            data_dir: None,
        }
    }
}

fn parse_owner(raw: &str) -> Result<ActorId, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOwner(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_id_must_be_numeric() {
        assert!(matches!(
            parse_owner("\"7662000357\""),
            Err(ConfigError::InvalidOwner(_))
        ));
        assert_eq!(parse_owner(" 7662000357 ").unwrap(), 7662000357);
    }
}
