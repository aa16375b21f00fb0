use thiserror::Error;

/// Startup configuration that cannot be used.
///
/// Only required settings produce these; feature flags fall back to their defaults instead.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A variable without a default is unset or empty.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// A variable is set to a value that cannot be parsed or rendered.
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: String, reason: String },
}
