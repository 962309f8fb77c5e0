use std::env;
use std::time::Duration;

use crate::utils::{ExternalIdError, ExternalIdResult};

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for the external national ID system, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ExternalIdConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_header: Option<String>,
    pub api_key: Option<String>,
    /// `EXTERNAL_NATIONAL_ID_REGEX`, in `regex` crate syntax. Lookaround and
    /// backreferences are not supported; such a pattern disables validation.
    pub id_regex: Option<String>,
    pub debounce: Duration,
    pub lookup_timeout: Duration,
}

impl Default for ExternalIdConfig {
    fn default() -> Self {
        ExternalIdConfig {
            enabled: false,
            base_url: String::new(),
            api_header: None,
            api_key: None,
            id_regex: None,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            lookup_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ExternalIdConfig {
    /// Load the configuration from environment variables.
    ///
    /// The API key is normally injected by the reverse proxy, so it is only
    /// read here for local setups.
    pub fn from_env() -> ExternalIdResult<Self> {
        let enabled = get_var("ENABLE_EXTERNAL_NATIONAL_ID_SYSTEM")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let config = ExternalIdConfig {
            enabled,
            base_url: get_var("EXTERNAL_NATIONAL_ID_SYSTEM_URL").unwrap_or_default(),
            api_header: get_var("EXTERNAL_NATIONAL_ID_SYSTEM_API_HEADER"),
            api_key: get_var("EXTERNAL_NATIONAL_ID_SYSTEM_API_KEY"),
            id_regex: get_var("EXTERNAL_NATIONAL_ID_REGEX"),
            debounce: Duration::from_millis(parse_var(
                "EXTERNAL_NATIONAL_ID_DEBOUNCE_MS",
                DEFAULT_DEBOUNCE_MS,
            )?),
            lookup_timeout: Duration::from_secs(parse_var(
                "EXTERNAL_NATIONAL_ID_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ExternalIdResult<()> {
        if self.enabled && self.base_url.trim().is_empty() {
            return Err(ExternalIdError::Config(
                "EXTERNAL_NATIONAL_ID_SYSTEM_URL is required when the external ID system is enabled"
                    .to_string(),
            ));
        }
        if self.lookup_timeout.is_zero() {
            return Err(ExternalIdError::Config(
                "lookup timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Header name and value to attach to lookups, when both are configured.
    pub fn api_key_header(&self) -> Option<(&str, &str)> {
        match (self.api_header.as_deref(), self.api_key.as_deref()) {
            (Some(header), Some(key)) if !header.is_empty() && !key.is_empty() => {
                Some((header, key))
            }
            _ => None,
        }
    }
}

/// Read a variable, treating empty values as unset.
fn get_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var(key: &str, default: u64) -> ExternalIdResult<u64> {
    match get_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ExternalIdError::Config(format!("invalid {key}: {e}"))),
        None => Ok(default),
    }
}
