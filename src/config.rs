use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::{fs, io, path::Path, time::Duration};

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: LevelFilter,
    /// Prefix a console line needs to be treated as a command.
    pub prefix: String,
    pub dispatch: Dispatch,
}

impl Config {
    pub fn from_file<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let buf = fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn parse(input: &str) -> Result<Self, Error> {
        Ok(toml::from_str(input)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: LevelFilter::Info,
            prefix: String::from("!"),
            dispatch: Dispatch::default(),
        }
    }
}

/// Dispatch configuration section. Durations are in seconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dispatch {
    /// How long "cog unloaded" and "cog missing" errors stay visible.
    pub unloaded_expire: u64,
    /// How long the error reported after a cog was unloaded due to a
    /// failing command stays visible.
    pub failure_expire: u64,
}

impl Dispatch {
    pub fn unloaded_expire(&self) -> Duration {
        Duration::from_secs(self.unloaded_expire)
    }

    pub fn failure_expire(&self) -> Duration {
        Duration::from_secs(self.failure_expire)
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self {
            unloaded_expire: 20,
            failure_expire: 40,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Dispatch};
    use log::LevelFilter;
    use std::time::Duration;

    #[test]
    fn test_config_parse() {
        let config = Config::parse(
            r#"
            loglevel = "debug"
            prefix = "?"

            [dispatch]
            failure_expire = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.loglevel, LevelFilter::Debug);
        assert_eq!(config.prefix, "?");
        assert_eq!(
            config.dispatch,
            Dispatch {
                unloaded_expire: 20,
                failure_expire: 60,
            }
        );
        assert_eq!(config.dispatch.failure_expire(), Duration::from_secs(60));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.loglevel, LevelFilter::Info);
        assert_eq!(config.prefix, "!");
        assert_eq!(config.dispatch, Dispatch::default());
    }

    #[test]
    fn test_config_invalid() {
        assert!(Config::parse("prefix = [").is_err());
        assert!(Config::from_file("/nonexistent/cogbot.toml").is_err());
    }
}
