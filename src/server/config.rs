//! Process configuration read once at startup.
//!
//! [`Config`] is built in `main` from environment variables (after `.env` is loaded) and handed
//! to the components that need it. Required settings fail startup with a [`ConfigError`];
//! feature flags never fail, an invalid value logs a warning and falls back to its default.

use std::{fmt::Display, str::FromStr, time::Duration};

use crate::server::{error::config::ConfigError, util::time::DateFormatter};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

const DEFAULT_CACHE_TIMEOUT_MS: u64 = 5 * 60 * 1000;
const DEFAULT_MAX_RETRIES: u32 = 3;
const MAX_RETRIES_LIMIT: u32 = 10;
const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;
const MIN_API_TIMEOUT_MS: u64 = 1000;

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub upstream: UpstreamConfig,
    pub flags: FeatureFlags,
    pub formatter: DateFormatter,
}

/// Location and credentials of the upstream delivery date API.
#[derive(Debug, Clone, Default)]
pub struct UpstreamConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Runtime toggles with typed defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Serve generated dates only, never contacting the upstream API.
    pub enable_mock_mode: bool,
    /// How long a successful upstream fetch is served from cache.
    pub cache_timeout: Duration,
    /// Upstream attempts per cache miss (0..=10).
    pub max_retries: u32,
    /// Hard timeout for a single upstream attempt (at least 1s).
    pub api_timeout: Duration,
    /// Mount the rate limiting middleware.
    pub enable_rate_limiting: bool,
    /// Identify clients by the first `X-Forwarded-For` entry instead of the socket address.
    pub trust_proxy: bool,
    /// Mount the unauthenticated `DELETE /api/delivery-dates/cache` route.
    pub enable_cache_clear: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_mock_mode: false,
            cache_timeout: Duration::from_millis(DEFAULT_CACHE_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            api_timeout: Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
            enable_rate_limiting: true,
            trust_proxy: false,
            enable_cache_clear: true,
        }
    }
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and valid
    /// - `Err(ConfigError::MissingEnvVar)` - `DELIVERY_API_URL` missing while mock mode is off
    /// - `Err(ConfigError::InvalidEnvValue)` - Unparseable `PORT`, unknown `DISPLAY_LOCALE` or a
    ///   `DISPLAY_DATE_FORMAT` chrono cannot render
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flags = FeatureFlags::from_lookup(&lookup);

        let url = non_empty(lookup("DELIVERY_API_URL"));
        let url = match url {
            Some(url) => url,
            None if flags.enable_mock_mode => String::new(),
            None => return Err(ConfigError::MissingEnvVar("DELIVERY_API_URL".to_string())),
        };

        let upstream = UpstreamConfig {
            url,
            username: non_empty(lookup("DELIVERY_API_USERNAME")),
            password: non_empty(lookup("DELIVERY_API_PASSWORD")),
        };

        let port = match non_empty(lookup("PORT")) {
            Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidEnvValue {
                var: "PORT".to_string(),
                reason: format!("{}", e),
            })?,
            None => DEFAULT_PORT,
        };

        let locale = non_empty(lookup("DISPLAY_LOCALE"))
            .unwrap_or_else(|| DateFormatter::DEFAULT_LOCALE.to_string());
        let pattern = non_empty(lookup("DISPLAY_DATE_FORMAT"))
            .unwrap_or_else(|| DateFormatter::DEFAULT_PATTERN.to_string());
        let formatter = DateFormatter::new(&locale, pattern)?;

        Ok(Self {
            host: non_empty(lookup("HOST")).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            upstream,
            flags,
            formatter,
        })
    }

    /// Socket address string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FeatureFlags {
    /// Reads feature flags through an arbitrary variable lookup.
    ///
    /// Never fails: unset variables use their default, invalid ones are logged and replaced by
    /// their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let reader = FlagReader { lookup };

        let cache_timeout_ms = reader.number(
            "CACHE_DURATION",
            DEFAULT_CACHE_TIMEOUT_MS,
            |ms: &u64| {
                if *ms == 0 {
                    return Err("must be greater than 0".to_string());
                }
                Ok(())
            },
        );
        let max_retries = reader.number("MAX_RETRIES", DEFAULT_MAX_RETRIES, |n: &u32| {
            if *n > MAX_RETRIES_LIMIT {
                return Err(format!("must be between 0 and {}", MAX_RETRIES_LIMIT));
            }
            Ok(())
        });
        let api_timeout_ms = reader.number("API_TIMEOUT", DEFAULT_API_TIMEOUT_MS, |ms: &u64| {
            if *ms < MIN_API_TIMEOUT_MS {
                return Err(format!("must be at least {}ms", MIN_API_TIMEOUT_MS));
            }
            Ok(())
        });

        Self {
            enable_mock_mode: reader.bool("USE_MOCK_DELIVERY_DATES", defaults.enable_mock_mode),
            cache_timeout: Duration::from_millis(cache_timeout_ms),
            max_retries,
            api_timeout: Duration::from_millis(api_timeout_ms),
            enable_rate_limiting: reader.bool("ENABLE_RATE_LIMITING", defaults.enable_rate_limiting),
            trust_proxy: reader.bool("TRUST_PROXY", defaults.trust_proxy),
            enable_cache_clear: reader.bool("ENABLE_CACHE_CLEAR", defaults.enable_cache_clear),
        }
    }
}

struct FlagReader<F> {
    lookup: F,
}

impl<F> FlagReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn bool(&self, name: &str, default: bool) -> bool {
        let Some(raw) = non_empty((self.lookup)(name)) else {
            return default;
        };

        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => {
                tracing::warn!(
                    "Invalid value '{}' for feature flag {}, using default {}",
                    raw,
                    name,
                    default
                );
                default
            }
        }
    }

    fn number<T, V>(&self, name: &str, default: T, validate: V) -> T
    where
        T: FromStr + Display,
        T::Err: Display,
        V: Fn(&T) -> Result<(), String>,
    {
        let Some(raw) = non_empty((self.lookup)(name)) else {
            return default;
        };

        let parsed = raw
            .parse::<T>()
            .map_err(|e| e.to_string())
            .and_then(|value| validate(&value).map(|_| value));

        match parsed {
            Ok(value) => value,
            Err(reason) => {
                tracing::warn!(
                    "Invalid value '{}' for feature flag {} ({}), using default {}",
                    raw,
                    name,
                    reason,
                    default
                );
                default
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Allows test harnesses to build an upstream configuration from `(url, username, password)`
/// without depending on this crate.
impl From<(String, String, String)> for UpstreamConfig {
    fn from((url, username, password): (String, String, String)) -> Self {
        Self {
            url,
            username: Some(username),
            password: Some(password),
        }
    }
}
