//! Server configuration, read once from the environment at startup.

use std::fmt;
use std::net::SocketAddr;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_JWT_TTL_HOURS: u64 = 168;

/// Runtime configuration for the API server.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind (`HOST`).
    pub host: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// PostgreSQL URL (`DATABASE_URL`); `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// HMAC secret for bearer tokens (`JWT_SECRET`).
    pub jwt_secret: String,
    /// Token lifetime in hours (`JWT_TTL_HOURS`).
    pub jwt_ttl_hours: u64,
    /// OTLP collector endpoint (`OTEL_EXPORTER_OTLP_ENDPOINT`).
    pub otlp_endpoint: Option<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("jwt_secret", &"<redacted>")
            .field("jwt_ttl_hours", &self.jwt_ttl_hours)
            .field("otlp_endpoint", &self.otlp_endpoint)
            .finish()
    }
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Blank values count as
    /// unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };
        let jwt_ttl_hours = match get("JWT_TTL_HOURS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(hours) if hours > 0 => hours,
                _ => {
                    return Err(AppError::Config(format!(
                        "JWT_TTL_HOURS must be a positive integer, got {raw:?}"
                    )));
                }
            },
            None => DEFAULT_JWT_TTL_HOURS,
        };
        let jwt_secret = get("JWT_SECRET").ok_or_else(|| {
            AppError::Config("JWT_SECRET environment variable must be set".into())
        })?;

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            database_url: get("DATABASE_URL"),
            jwt_secret,
            jwt_ttl_hours,
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_apply_when_only_secret_is_set() {
        let config = config_from(&[("JWT_SECRET", "s3cret")]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 4000);
        assert_eq!(config.database_url, None);
        assert_eq!(config.jwt_ttl_hours, 168);
        assert_eq!(config.otlp_endpoint, None);
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:4000");
    }

    #[test]
    fn test_reads_every_variable() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/kyc"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_TTL_HOURS", "24"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/kyc")
        );
        assert_eq!(config.jwt_ttl_hours, 24);
        assert_eq!(
            config.otlp_endpoint.as_deref(),
            Some("http://localhost:4317")
        );
    }

    #[test]
    fn test_missing_secret_is_a_config_error() {
        let result = config_from(&[("JWT_SECRET", "  ")]);

        match result.unwrap_err() {
            AppError::Config(msg) => assert!(msg.contains("JWT_SECRET")),
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_numbers_are_config_errors() {
        for vars in [
            [("JWT_SECRET", "s"), ("PORT", "http")],
            [("JWT_SECRET", "s"), ("JWT_TTL_HOURS", "0")],
        ] {
            match config_from(&vars).unwrap_err() {
                AppError::Config(_) => {}
                other => panic!("expected Config, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = config_from(&[
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://user:pw@db/kyc"),
        ])
        .unwrap();

        let rendered = format!("{config:?}");

        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("pw@db"));
    }
}
