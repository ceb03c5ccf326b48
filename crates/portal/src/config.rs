//! Portal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the portal starts with sensible defaults.
//!
//! - `PORTAL_HOST` - Bind address (default: 127.0.0.1)
//! - `PORTAL_PORT` - Listen port (default: 3000)
//! - `PORTAL_BASE_URL` - Public URL; `https://` enables secure cookies (default: <http://localhost:3000>)
//! - `PORTAL_ADMIN_PASSWORD` - Shared manufacturer secret (default: `RMP123`, logged as a warning)
//! - `PORTAL_SESSION_IDLE_MINUTES` - Idle expiry for browser sessions (default: 120)
//! - `PORTAL_WHATSAPP_NUMBER` - Order recipient for the messaging deep link (default: 919998471567)
//! - `PORTAL_STATIC_DIR` - Directory served under `/static` (default: crates/portal/static)
//! - `GEMINI_API_KEY` - Text-generation credential (falls back to `API_KEY`)
//! - `GEMINI_MODEL` - Model identifier (default: gemini-3-flash-preview)
//! - `GEMINI_API_BASE` - API base URL (default: <https://generativelanguage.googleapis.com>)
//! - `GEMINI_TIMEOUT_SECS` - Advisory request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Admin secret used when `PORTAL_ADMIN_PASSWORD` is not set.
pub const DEFAULT_ADMIN_PASSWORD: &str = "RMP123";

const DEFAULT_WHATSAPP_NUMBER: &str = "919998471567";
const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

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

/// Portal application configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the portal
    pub base_url: String,
    /// Shared secret that signs in the manufacturer
    pub admin_password: SecretString,
    /// Whether `admin_password` is the built-in default
    pub admin_password_is_default: bool,
    /// Idle time after which a browser session and its portal state expire
    pub session_idle: Duration,
    /// Recipient id for the order deep link
    pub whatsapp_number: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Text-generation service configuration
    pub gemini: GeminiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Gemini text-generation configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; absence is reported per request, never at startup
    pub api_key: Option<SecretString>,
    /// Model identifier
    pub model: String,
    /// API base URL
    pub api_base: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("PORTAL_HOST", "127.0.0.1")?;
        let port = parse_env("PORTAL_PORT", "3000")?;
        let base_url = get_env_or_default("PORTAL_BASE_URL", "http://localhost:3000");
        validate_url(&base_url, "PORTAL_BASE_URL")?;

        let admin_password_var = get_optional_env("PORTAL_ADMIN_PASSWORD");
        let admin_password_is_default = admin_password_var.is_none();
        let admin_password = SecretString::from(
            admin_password_var.unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
        );
        validate_admin_password(&admin_password, "PORTAL_ADMIN_PASSWORD")?;

        let session_idle = idle_duration(parse_env("PORTAL_SESSION_IDLE_MINUTES", "120")?)?;

        let whatsapp_number = get_env_or_default("PORTAL_WHATSAPP_NUMBER", DEFAULT_WHATSAPP_NUMBER);
        validate_recipient(&whatsapp_number, "PORTAL_WHATSAPP_NUMBER")?;

        let static_dir = PathBuf::from(get_env_or_default(
            "PORTAL_STATIC_DIR",
            "crates/portal/static",
        ));

        Ok(Self {
            host,
            port,
            base_url,
            admin_password,
            admin_password_is_default,
            session_idle,
            whatsapp_number,
            static_dir,
            gemini: GeminiConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl GeminiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = get_optional_env("GEMINI_API_KEY")
            .or_else(|| get_optional_env("API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);

        let api_base = get_env_or_default("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE);
        validate_url(&api_base, "GEMINI_API_BASE")?;

        let timeout_secs: u64 = parse_env("GEMINI_TIMEOUT_SECS", "30")?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "GEMINI_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            model: get_env_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            api_base: api_base.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Session idle period from a minute count: at least one minute, and small
/// enough to express in seconds.
fn idle_duration(minutes: u64) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| {
        ConfigError::InvalidEnvVar("PORTAL_SESSION_IDLE_MINUTES".to_string(), reason.to_string())
    };
    if minutes == 0 {
        return Err(invalid("must be at least 1"));
    }
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| invalid("too large"))
}

/// Validate that a value is an absolute http(s) URL.
fn validate_url(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}

/// Validate that the admin secret is usable.
fn validate_admin_password(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    if secret.expose_secret().trim().is_empty() {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate that a deep-link recipient is a bare international number.
fn validate_recipient(value: &str, var_name: &str) -> Result<(), ConfigError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must contain digits only (country code included, no '+')".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> PortalConfig {
        PortalConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            admin_password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
            admin_password_is_default: true,
            session_idle: Duration::from_secs(7200),
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            static_dir: PathBuf::from("static"),
            gemini: GeminiConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure_follows_scheme() {
        let mut config = test_config();
        assert!(!config.is_secure());
        config.base_url = "https://orders.rmppaper.in".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_gemini_config_debug_redacts_key() {
        let config = GeminiConfig {
            api_key: Some(SecretString::from("AIzaSuperSecretKeyValue")),
            ..GeminiConfig::default()
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("gemini-3-flash-preview"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("AIzaSuperSecretKeyValue"));
    }

    #[test]
    fn test_validate_recipient() {
        assert!(validate_recipient("919998471567", "TEST_VAR").is_ok());
        assert!(validate_recipient("+919998471567", "TEST_VAR").is_err());
        assert!(validate_recipient("99 98", "TEST_VAR").is_err());
        assert!(validate_recipient("", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://localhost:3000", "TEST_VAR").is_ok());
        assert!(validate_url("https://generativelanguage.googleapis.com", "TEST_VAR").is_ok());
        assert!(validate_url("ftp://example.org", "TEST_VAR").is_err());
        assert!(validate_url("not a url", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_admin_password() {
        let result = validate_admin_password(&SecretString::from("   "), "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
        assert!(validate_admin_password(&SecretString::from("RMP123"), "TEST_VAR").is_ok());
    }

    #[test]
    fn test_idle_duration_bounds() {
        assert_eq!(idle_duration(120).unwrap(), Duration::from_secs(7200));
        assert!(matches!(idle_duration(0), Err(ConfigError::InvalidEnvVar(_, _))));
        assert!(matches!(
            idle_duration(u64::MAX),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_parse_env_default() {
        let port: u16 = parse_env("RMP_PORTAL_TEST_UNSET_PORT", "3000").unwrap();
        assert_eq!(port, 3000);
        let err = parse_env::<u16>("RMP_PORTAL_TEST_UNSET_PORT", "nope").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }
}
