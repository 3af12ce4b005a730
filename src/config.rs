use crate::models::DEFAULT_CALORIE_LIMIT;
use std::{env, path::PathBuf};
use tracing::warn;

const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
    pub default_calorie_limit: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            port: DEFAULT_PORT,
            default_calorie_limit: DEFAULT_CALORIE_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Unparseable values
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("APP_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }

        if let Some(port) = lookup("PORT").and_then(|value| value.parse::<u16>().ok()) {
            config.port = port;
        }

        if let Some(raw) = lookup("CALORIE_LIMIT_DEFAULT") {
            match raw.trim().parse::<i64>() {
                Ok(limit) => config.default_calorie_limit = limit,
                Err(err) => warn!("ignoring CALORIE_LIMIT_DEFAULT={raw:?}: {err}"),
            }
        }

        config
    }
}
