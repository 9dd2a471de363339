use crate::widgets::StatMode;
use std::{env, fmt::Display, path::PathBuf, str::FromStr};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    /// Acting user for requests without an `x-user` header.
    pub default_user: String,
    pub stat_mode: StatMode,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_user: String = try_load(&lookup, "WARBLER_USER", "guest")?;
        let default_user = default_user.trim().to_string();
        if default_user.is_empty() {
            return Err(ConfigError::Invalid {
                key: "WARBLER_USER",
                value: default_user,
                reason: "must not be empty".into(),
            });
        }

        Ok(Self {
            port: try_load(&lookup, "PORT", "8080")?,
            data_path: try_load(&lookup, "APP_DATA_PATH", "data/state.json")?,
            default_user,
            stat_mode: try_load(&lookup, "WARBLER_STAT_MODE", "accumulate")?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|err: T::Err| ConfigError::Invalid {
        key,
        reason: err.to_string(),
        value,
    })
}
