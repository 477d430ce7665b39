//! Server configuration read from environment variables.

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP listener binds to (`BIND_ADDR`)
    pub bind_addr: SocketAddr,
    /// Directory scanned for `*.json` category files (`CATEGORIES_DIR`)
    pub categories_dir: PathBuf,
    /// Idle time after which a session's round is forgotten (`SESSION_TTL_SECS`)
    pub session_ttl: Duration,
    /// Length of the discussion countdown on the results page (`DISCUSSION_SECONDS`)
    pub discussion_seconds: u32,
    /// Fixed seed for the game RNG (`RNG_SEED`); entropy when unset
    pub rng_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            categories_dir: PathBuf::from("categories"),
            session_ttl: Duration::from_secs(2 * 60 * 60),
            discussion_seconds: 180,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    key: &'static str,
    value: String,
    reason: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unset keys keep their defaults;
    /// unparseable values are logged and also fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &'static str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let rng_seed = get("RNG_SEED").and_then(|raw| parse_or_warn("RNG_SEED", &raw).ok());
        if let Some(seed) = rng_seed {
            tracing::warn!(seed, "RNG_SEED set, rounds are deterministic");
        }

        Self {
            bind_addr: value_or(get("BIND_ADDR"), "BIND_ADDR", defaults.bind_addr),
            categories_dir: get("CATEGORIES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.categories_dir),
            session_ttl: get("SESSION_TTL_SECS")
                .and_then(|raw| parse_or_warn::<u64>("SESSION_TTL_SECS", &raw).ok())
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_ttl),
            discussion_seconds: value_or(
                get("DISCUSSION_SECONDS"),
                "DISCUSSION_SECONDS",
                defaults.discussion_seconds,
            ),
            rng_seed,
        }
    }
}

fn parse_or_warn<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse().map_err(|e: T::Err| {
        let err = ConfigError {
            key,
            value: raw.to_string(),
            reason: e.to_string(),
        };
        tracing::warn!("{err}, using default");
        err
    })
}

fn value_or<T>(raw: Option<String>, key: &'static str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    raw.and_then(|raw| parse_or_warn(key, &raw).ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn reads_all_keys() {
        let config = config_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("CATEGORIES_DIR", "/srv/words"),
            ("SESSION_TTL_SECS", "60"),
            ("DISCUSSION_SECONDS", "90"),
            ("RNG_SEED", "42"),
        ]);

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.categories_dir, PathBuf::from("/srv/words"));
        assert_eq!(config.session_ttl, Duration::from_secs(60));
        assert_eq!(config.discussion_seconds, 90);
        assert_eq!(config.rng_seed, Some(42));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("BIND_ADDR", "not an address"),
            ("SESSION_TTL_SECS", "0"),
            ("DISCUSSION_SECONDS", "-5"),
            ("RNG_SEED", "seed"),
        ]);

        assert_eq!(config, Config::default());
    }

    #[test]
    fn parse_error_names_the_key() {
        let err = parse_or_warn::<u32>("DISCUSSION_SECONDS", "soon").unwrap_err();
        assert!(err.to_string().contains("DISCUSSION_SECONDS"));
        assert!(err.to_string().contains("\"soon\""));
    }
}
