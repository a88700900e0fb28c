//! Configuration for the contacts service
//!
//! Values are layered: built-in defaults, an optional YAML file, `APP_`
//! prefixed environment variables (`__` separates sections) and finally the
//! flat variable names used by the `.env_example` file.

use anyhow::Context;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    value::Uncased,
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Flat environment names and the config keys they feed
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("DB_URL", "database.url"),
    ("JWT_SECRET", "jwt.secret"),
    ("JWT_ALGORITHM", "jwt.algorithm"),
    ("JWT_EXPIRATION_SECONDS", "jwt.expiration_seconds"),
    ("MAIL_USERNAME", "mail.username"),
    ("MAIL_PASSWORD", "mail.password"),
    ("MAIL_FROM", "mail.from"),
    ("MAIL_PORT", "mail.port"),
    ("MAIL_SERVER", "mail.server"),
    ("MAIL_FROM_NAME", "mail.from_name"),
    ("MAIL_STARTTLS", "mail.starttls"),
    ("MAIL_SSL_TLS", "mail.ssl_tls"),
    ("USE_CREDENTIALS", "mail.use_credentials"),
    ("CLD_NAME", "cloudinary.cloud_name"),
    ("CLD_API_KEY", "cloudinary.api_key"),
    ("CLD_API_SECRET", "cloudinary.api_secret"),
    ("CLD_SIGNATURE_ALGORITHM", "cloudinary.signature_algorithm"),
];

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file_exact(path));
        }

        figment
            .merge(Env::prefixed("APP_").split("__"))
            .merge(legacy_env())
            .extract()
            .context("invalid configuration")
    }
}

fn legacy_env() -> Env {
    let names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, target)| Uncased::from(*target))
            .unwrap_or_else(|| Uncased::from(key.as_str()))
    })
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to bind
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Allowed CORS origins; `*` allows any
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Requests per minute allowed on `/api/users/me` per client
    #[serde(default = "default_me_rate_limit")]
    pub me_rate_limit_per_minute: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origins: default_cors_origins(),
            me_rate_limit_per_minute: default_me_rate_limit(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_me_rate_limit() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection URL (postgres:// or sqlite://)
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://contacts.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

/// Token signing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JwtConfig {
    #[serde(default = "default_jwt_secret")]
    pub secret: String,

    /// HMAC algorithm name (HS256, HS384, HS512)
    #[serde(default = "default_jwt_algorithm")]
    pub algorithm: String,

    /// Access token lifetime
    #[serde(default = "default_access_expiration")]
    pub expiration_seconds: i64,

    /// Password reset token lifetime
    #[serde(default = "default_reset_expiration")]
    pub reset_expiration_seconds: i64,

    /// Email confirmation token lifetime
    #[serde(default = "default_email_expiration")]
    pub email_expiration_seconds: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
            algorithm: default_jwt_algorithm(),
            expiration_seconds: default_access_expiration(),
            reset_expiration_seconds: default_reset_expiration(),
            email_expiration_seconds: default_email_expiration(),
        }
    }
}

fn default_jwt_secret() -> String {
    "change-me".to_string()
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_expiration() -> i64 {
    3600
}

fn default_reset_expiration() -> i64 {
    3600
}

fn default_email_expiration() -> i64 {
    7 * 24 * 3600
}

/// Outgoing SMTP settings; mail is only logged when `server` is empty
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_mail_from")]
    pub from: String,
    #[serde(default = "default_mail_from_name")]
    pub from_name: String,
    #[serde(default = "default_mail_port")]
    pub port: u16,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub starttls: bool,
    #[serde(default = "default_true")]
    pub ssl_tls: bool,
    #[serde(default = "default_true")]
    pub use_credentials: bool,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            from: default_mail_from(),
            from_name: default_mail_from_name(),
            port: default_mail_port(),
            server: String::new(),
            starttls: false,
            ssl_tls: true,
            use_credentials: true,
        }
    }
}

impl MailConfig {
    pub fn is_configured(&self) -> bool {
        !self.server.trim().is_empty()
    }
}

fn default_mail_from() -> String {
    "noreply@example.com".to_string()
}

fn default_mail_from_name() -> String {
    "Contacts API".to_string()
}

fn default_mail_port() -> u16 {
    465
}

fn default_true() -> bool {
    true
}

/// Cloudinary credentials for avatar uploads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloudinaryConfig {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    /// Must match the account's signature setting
    #[serde(default)]
    pub signature_algorithm: SignatureAlgorithm,
}

/// Digest Cloudinary uses to verify signed upload requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// bcrypt work factor
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}
