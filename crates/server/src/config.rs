//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `HEARTH_JWT_SECRET` - Bearer-token signing secret (min 32 chars, high entropy)
//! - `HEARTH_IMAGE_HOST_URL` - Image host upload endpoint
//! - `HEARTH_IMAGE_HOST_KEY` - Image host API key
//! - `HEARTH_DATABASE_URL` - `PostgreSQL` connection string (required when
//!   `HEARTH_STORE=postgres`, the default)
//!
//! ## Optional
//! - `HEARTH_STORE` - Store backend: `postgres` (default) or `memory`
//! - `HEARTH_HOST` - Bind address (default: 127.0.0.1)
//! - `HEARTH_PORT` - Listen port (default: 5000)
//! - `HEARTH_ALLOWED_ORIGINS` - Comma-separated CORS origins
//! - `HEARTH_TOKEN_TTL_HOURS` - Bearer-token lifetime (default: 168 = 7 days)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Which document-store backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process store; data does not survive a restart. For development.
    Memory,
    /// `PostgreSQL` via sqlx.
    Postgres,
}

/// Hearth server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Document store backend
    pub store: StoreBackend,
    /// `PostgreSQL` connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Bearer-token signing secret
    pub jwt_secret: SecretString,
    /// Bearer-token lifetime in hours
    pub token_ttl_hours: i64,
    /// Origins allowed by the CORS layer
    pub allowed_origins: Vec<String>,
    /// Image host configuration
    pub image_host: ImageHostConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Image host (upload proxy target) configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ImageHostConfig {
    /// Upload endpoint, e.g. `https://api.imgbb.com/1/upload`
    pub url: String,
    /// API key appended as a query parameter
    pub key: SecretString,
}

impl std::fmt::Debug for ImageHostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHostConfig")
            .field("url", &self.url)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing, malformed,
    /// or the JWT secret looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Load configuration from an explicit variable map (testable seam).
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let host: IpAddr = vars
            .get("HEARTH_HOST")
            .map_or(Ok(IpAddr::from([127, 0, 0, 1])), |v| {
                v.parse().map_err(|e| {
                    ConfigError::InvalidEnvVar("HEARTH_HOST".into(), format!("{e}"))
                })
            })?;

        let port: u16 = vars.get("HEARTH_PORT").map_or(Ok(5000), |v| {
            v.parse()
                .map_err(|e| ConfigError::InvalidEnvVar("HEARTH_PORT".into(), format!("{e}")))
        })?;

        let store = match vars.get("HEARTH_STORE").map(String::as_str) {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "HEARTH_STORE".into(),
                    format!("expected 'postgres' or 'memory', got '{other}'"),
                ));
            }
        };

        let database_url = vars
            .get("HEARTH_DATABASE_URL")
            .map(|v| SecretString::from(v.clone()));

        if store == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingEnvVar("HEARTH_DATABASE_URL".into()));
        }

        let jwt_secret = vars
            .get("HEARTH_JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("HEARTH_JWT_SECRET".into()))?;
        validate_secret("HEARTH_JWT_SECRET", jwt_secret)?;
        let jwt_secret = SecretString::from(jwt_secret.clone());

        let token_ttl_hours: i64 = vars.get("HEARTH_TOKEN_TTL_HOURS").map_or(Ok(168), |v| {
            v.parse().map_err(|e| {
                ConfigError::InvalidEnvVar("HEARTH_TOKEN_TTL_HOURS".into(), format!("{e}"))
            })
        })?;

        let allowed_origins = vars
            .get("HEARTH_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let image_host = ImageHostConfig {
            url: vars
                .get("HEARTH_IMAGE_HOST_URL")
                .ok_or_else(|| ConfigError::MissingEnvVar("HEARTH_IMAGE_HOST_URL".into()))?
                .clone(),
            key: SecretString::from(
                vars.get("HEARTH_IMAGE_HOST_KEY")
                    .ok_or_else(|| ConfigError::MissingEnvVar("HEARTH_IMAGE_HOST_KEY".into()))?
                    .clone(),
            ),
        };

        Ok(Self {
            host,
            port,
            store,
            database_url,
            jwt_secret,
            token_ttl_hours,
            allowed_origins,
            image_host,
            sentry_dsn: vars.get("SENTRY_DSN").cloned(),
            sentry_environment: vars.get("SENTRY_ENVIRONMENT").cloned(),
        })
    }

    /// Socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Bearer-token signing secret bytes.
    #[must_use]
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.expose_secret().as_bytes()
    }
}

/// Validate that a secret is long and random enough to sign tokens with.
fn validate_secret(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            name.to_owned(),
            format!("must be at least {MIN_JWT_SECRET_LENGTH} characters"),
        ));
    }

    let lowered = value.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lowered.contains(**p)) {
        return Err(ConfigError::InsecureSecret(
            name.to_owned(),
            format!("looks like a placeholder (contains '{pattern}')"),
        ));
    }

    if shannon_entropy(value) < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            name.to_owned(),
            "insufficient entropy; generate one with `openssl rand -base64 32`".to_owned(),
        ));
    }

    Ok(())
}

/// Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let len = s.chars().count() as f64;
    counts
        .values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([
            (
                "HEARTH_JWT_SECRET".to_owned(),
                "kR8vN2mQ7pX4wL9jF3hT6bY1cD5gA0eZ".to_owned(),
            ),
            ("HEARTH_STORE".to_owned(), "memory".to_owned()),
            (
                "HEARTH_IMAGE_HOST_URL".to_owned(),
                "https://api.imgbb.com/1/upload".to_owned(),
            ),
            ("HEARTH_IMAGE_HOST_KEY".to_owned(), "k".to_owned()),
        ])
    }

    #[test]
    fn loads_with_defaults() {
        let config = ServerConfig::from_vars(&base_vars()).expect("config");
        assert_eq!(config.port, 5000);
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.token_ttl_hours, 168);
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        let mut vars = base_vars();
        vars.insert("HEARTH_STORE".to_owned(), "postgres".to_owned());
        assert!(matches!(
            ServerConfig::from_vars(&vars),
            Err(ConfigError::MissingEnvVar(v)) if v == "HEARTH_DATABASE_URL"
        ));
    }

    #[test]
    fn rejects_placeholder_jwt_secret() {
        let mut vars = base_vars();
        vars.insert(
            "HEARTH_JWT_SECRET".to_owned(),
            "changeme-changeme-changeme-changeme".to_owned(),
        );
        assert!(matches!(
            ServerConfig::from_vars(&vars),
            Err(ConfigError::InsecureSecret(..))
        ));
    }

    #[test]
    fn rejects_short_jwt_secret() {
        let mut vars = base_vars();
        vars.insert("HEARTH_JWT_SECRET".to_owned(), "short".to_owned());
        assert!(matches!(
            ServerConfig::from_vars(&vars),
            Err(ConfigError::InsecureSecret(..))
        ));
    }

    #[test]
    fn rejects_low_entropy_jwt_secret() {
        let mut vars = base_vars();
        vars.insert(
            "HEARTH_JWT_SECRET".to_owned(),
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_owned(),
        );
        assert!(matches!(
            ServerConfig::from_vars(&vars),
            Err(ConfigError::InsecureSecret(..))
        ));
    }

    #[test]
    fn parses_allowed_origins_list() {
        let mut vars = base_vars();
        vars.insert(
            "HEARTH_ALLOWED_ORIGINS".to_owned(),
            "http://localhost:3000, https://app.example.com".to_owned(),
        );
        let config = ServerConfig::from_vars(&vars).expect("config");
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }
}
