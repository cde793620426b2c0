//! Environment configuration.

use crate::api::API_PREFIX;
use crate::error::{Error, Result};
use crate::format::Locale;
use dotenvy::dotenv;
use serde::Deserialize;

/// Prefix of every configuration variable.
pub const ENV_PREFIX: &str = "FLEETDESK_";

fn default_utc_offset_minutes() -> i32 {
    420
}

/// Settings read from `FLEETDESK_*` variables.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AdminConfig {
    /// Scheme and host of the backend, e.g. `https://auth.example.com`.
    pub api_origin: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub auth_token: String,
    /// Display offset for dates, in minutes east of UTC.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

impl AdminConfig {
    /// Load configuration from the environment.
    ///
    /// A `.env` file is read first when present.
    pub fn load() -> Result<Self> {
        dotenv().ok();
        let config = envy::prefixed(ENV_PREFIX).from_env::<AdminConfig>()?;
        config.validate()
    }

    /// Load from explicit `(name, value)` pairs, names including the prefix.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX).from_iter::<_, AdminConfig>(pairs)?;
        config.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.api_origin.trim().is_empty() {
            return Err(Error::ConfigError(format!(
                "{}API_ORIGIN must not be empty",
                ENV_PREFIX
            )));
        }
        Ok(self)
    }

    /// `{api_origin}/api/v1/web`
    pub fn base_url(&self) -> String {
        format!("{}{}", self.api_origin.trim_end_matches('/'), API_PREFIX)
    }

    pub fn locale(&self) -> Locale {
        Locale::id_id(self.utc_offset_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AdminConfig::from_pairs(pairs(&[(
            "FLEETDESK_API_ORIGIN",
            "https://auth.example.com/",
        )]))
        .expect("config loads");

        assert_eq!(config.base_url(), "https://auth.example.com/api/v1/web");
        assert_eq!(config.utc_offset_minutes, 420);
        assert_eq!(config.api_key, "");
        assert_eq!(config.locale(), Locale::default());
    }

    #[test]
    fn test_all_fields() {
        let config = AdminConfig::from_pairs(pairs(&[
            ("FLEETDESK_API_ORIGIN", "http://localhost:8080"),
            ("FLEETDESK_API_KEY", "key"),
            ("FLEETDESK_AUTH_TOKEN", "token"),
            ("FLEETDESK_UTC_OFFSET_MINUTES", "0"),
        ]))
        .expect("config loads");

        assert_eq!(config.auth_token, "token");
        assert_eq!(config.locale(), Locale::id_id(0));
    }

    #[test]
    fn test_missing_origin() {
        let err = AdminConfig::from_pairs(Vec::new()).expect_err("origin is required");
        assert!(matches!(err, Error::ConfigError(_)));

        let err = AdminConfig::from_pairs(pairs(&[("FLEETDESK_API_ORIGIN", " ")]))
            .expect_err("origin must not be blank");
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
