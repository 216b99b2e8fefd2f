//! Pipeline configuration.
//!
//! A configuration is immutable for the lifetime of an [`crate::Autocomplete`]
//! instance; changing any field means constructing a new instance (and,
//! where the load fingerprint changes, a new library load).

use thiserror::Error;

use placeflow_places::client::DEFAULT_BASE_URL;
use placeflow_places::LoadOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Caller-supplied configuration for one autocomplete instance.
#[derive(Debug, Clone)]
pub struct AutocompleteConfig {
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub region: Option<String>,
    /// ISO 3166-1 alpha-2 codes; empty means no country restriction.
    pub countries: Vec<String>,
    /// Inputs shorter than this (in characters, after trimming) idle the
    /// pipeline instead of querying.
    pub min_length: usize,
    pub debounce_ms: u64,
    pub auto_clear_on_select: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: None,
            region: None,
            countries: Vec::new(),
            min_length: 2,
            debounce_ms: 250,
            auto_clear_on_select: true,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: 30,
        }
    }
}

impl AutocompleteConfig {
    /// The subset of this configuration that shapes the library load; its
    /// fingerprint is the cache key.
    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            api_key: self.api_key.clone(),
            language: self.language.clone(),
            region: self.region.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading
    /// env vars. Every variable is optional; unset values fall back to
    /// [`AutocompleteConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_vars()
    }

    /// Load configuration from environment variables already in the process.
    ///
    /// Unlike [`AutocompleteConfig::from_env`], this does NOT load `.env`
    /// files — useful for testing or when the caller manages env setup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse.
    pub fn from_env_vars() -> Result<Self, ConfigError> {
        Self::build(|key| std::env::var(key))
    }

    /// Build configuration using the provided env-var lookup function.
    ///
    /// This is the core parsing logic, decoupled from the actual environment
    /// so it can be tested with a pure `HashMap` lookup.
    fn build<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let defaults = Self::default();

        let optional = |var: &str| lookup(var).ok();

        let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
            match lookup(var) {
                Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
                Err(_) => Ok(default),
            }
        };

        let parse_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
            match lookup(var) {
                Ok(raw) => raw.parse::<usize>().map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
                Err(_) => Ok(default),
            }
        };

        let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
            match lookup(var) {
                Ok(raw) => raw.parse::<bool>().map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
                Err(_) => Ok(default),
            }
        };

        let countries = optional("PLACEFLOW_COUNTRIES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|code| !code.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            api_key: optional("PLACEFLOW_API_KEY"),
            language: optional("PLACEFLOW_LANGUAGE"),
            region: optional("PLACEFLOW_REGION"),
            countries,
            min_length: parse_usize("PLACEFLOW_MIN_LENGTH", defaults.min_length)?,
            debounce_ms: parse_u64("PLACEFLOW_DEBOUNCE_MS", defaults.debounce_ms)?,
            auto_clear_on_select: parse_bool(
                "PLACEFLOW_AUTO_CLEAR",
                defaults.auto_clear_on_select,
            )?,
            base_url: optional("PLACEFLOW_BASE_URL").unwrap_or(defaults.base_url),
            timeout_secs: parse_u64("PLACEFLOW_TIMEOUT_SECS", defaults.timeout_secs)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn build_from(vars: &[(&str, &str)]) -> Result<AutocompleteConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AutocompleteConfig::build(|key| {
            map.get(key).cloned().ok_or(std::env::VarError::NotPresent)
        })
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = build_from(&[]).expect("defaults should parse");
        assert_eq!(config.min_length, 2);
        assert_eq!(config.debounce_ms, 250);
        assert!(config.auto_clear_on_select);
        assert!(config.api_key.is_none());
        assert!(config.countries.is_empty());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn countries_parse_from_comma_list() {
        let config = build_from(&[("PLACEFLOW_COUNTRIES", "FR, BE ,de")])
            .expect("countries should parse");
        assert_eq!(config.countries, vec!["FR", "BE", "de"]);
    }

    #[test]
    fn set_values_override_defaults() {
        let config = build_from(&[
            ("PLACEFLOW_API_KEY", "k"),
            ("PLACEFLOW_MIN_LENGTH", "3"),
            ("PLACEFLOW_DEBOUNCE_MS", "100"),
            ("PLACEFLOW_AUTO_CLEAR", "false"),
        ])
        .expect("overrides should parse");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.min_length, 3);
        assert_eq!(config.debounce_ms, 100);
        assert!(!config.auto_clear_on_select);
    }

    #[test]
    fn invalid_number_is_rejected() {
        let err = build_from(&[("PLACEFLOW_MIN_LENGTH", "two")])
            .expect_err("invalid value should fail");
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PLACEFLOW_MIN_LENGTH"));
    }
}
