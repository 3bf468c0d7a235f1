//! Environment configuration helpers

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(String),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

fn lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn require_env(key: &str) -> Result<String, ConfigError> {
    lookup(key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

pub fn optional_env(key: &str) -> Option<String> {
    lookup(key)
}

pub fn env_or(key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

pub fn env_parse_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
    }
}

/// Comma-separated list; empty entries are dropped
pub fn env_list(key: &str) -> Vec<String> {
    lookup(key).map(|v| split_list(&v)).unwrap_or_default()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required() {
        assert_eq!(
            require_env("PLATFORM_TEST_DEFINITELY_UNSET"),
            Err(ConfigError::Missing("PLATFORM_TEST_DEFINITELY_UNSET".into()))
        );
        assert_eq!(env_or("PLATFORM_TEST_DEFINITELY_UNSET", "3000"), "3000");
    }

    #[test]
    fn test_parse_or() {
        // SAFETY: unique key, not read by any other test
        unsafe { std::env::set_var("PLATFORM_TEST_POLL_MS", "2500") };
        assert_eq!(env_parse_or("PLATFORM_TEST_POLL_MS", 2000u64), Ok(2500));

        unsafe { std::env::set_var("PLATFORM_TEST_BAD_PORT", "eighty") };
        assert!(matches!(
            env_parse_or("PLATFORM_TEST_BAD_PORT", 3000u16),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("http://localhost:3000, https://deedify.io ,,"),
            vec!["http://localhost:3000", "https://deedify.io"]
        );
    }
}
