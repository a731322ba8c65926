use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::{env, fmt, str::FromStr};
use zeroize::Zeroizing;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_minutes: i64,

    #[serde(default = "default_cookie_name")]
    pub auth_cookie_name: String,

    #[serde(default)]
    pub allow_registration: bool,

    #[serde(default)]
    pub trust_x_forwarded_for: bool,

    #[serde(default = "default_contact_ip_limit")]
    pub contact_ip_limit_per_hour: u64,

    #[serde(default = "default_contact_email_limit")]
    pub contact_email_limit_per_hour: u32,

    #[serde(default = "default_login_limit")]
    pub login_limit_per_minute: u64,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default = "default_resume_dir")]
    pub resume_dir: String,

    #[serde(default)]
    pub image_host_url: Option<String>,

    #[serde(default)]
    pub image_host_api_key: Option<String>,

    #[serde(default)]
    pub mail_api_url: Option<String>,

    #[serde(default)]
    pub mail_api_key: Option<String>,

    #[serde(default)]
    pub mail_from: Option<String>,

    #[serde(default)]
    pub ai_api_url: Option<String>,

    #[serde(default)]
    pub ai_api_key: Option<String>,

    #[serde(default = "default_ai_model")]
    pub ai_model: String,

    #[serde(default = "default_owner_name")]
    pub owner_name: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}
fn default_jwt_expiration() -> i64 {
    60 * 24 * 7
}
fn default_cookie_name() -> String {
    "token".to_string()
}
fn default_contact_ip_limit() -> u64 {
    5
}
fn default_contact_email_limit() -> u32 {
    2
}
fn default_login_limit() -> u64 {
    10
}
fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}
fn default_resume_dir() -> String {
    "./uploads/resume".to_string()
}
fn default_ai_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_owner_name() -> String {
    "Portfolio Owner".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Inject critical env values if missing
        config.database_url = fill_or_env(config.database_url, "APP_DATABASE_URL")?;
        config.jwt_secret = fill_or_env(config.jwt_secret, "APP_JWT_SECRET")?;

        if config.redis_url.is_none() {
            config.redis_url = env::var("APP_REDIS_URL").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.jwt_secret.len() < 32 {
            errors.push("JWT_SECRET must be at least 32 characters");
        }
        if self.jwt_expiration_minutes <= 0 {
            errors.push("JWT_EXPIRATION_MINUTES must be positive");
        }
        if self.auth_cookie_name.trim().is_empty() {
            errors.push("AUTH_COOKIE_NAME cannot be empty");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    /// Self-contained configuration with every optional integration off.
    pub fn for_tests(env: AppEnvironment) -> Self {
        AppConfig {
            env,
            name: default_name(),
            port: 0,
            host: default_host(),
            worker_count: 1,
            database_url: "postgres://localhost/portfolio_test".into(),
            redis_url: None,
            cors_allowed_origins: default_cors_origins(),
            jwt_secret: "a-very-long-secret-that-is-at-least-32-chars".into(),
            jwt_expiration_minutes: 60,
            auth_cookie_name: default_cookie_name(),
            allow_registration: false,
            trust_x_forwarded_for: false,
            contact_ip_limit_per_hour: default_contact_ip_limit(),
            contact_email_limit_per_hour: default_contact_email_limit(),
            login_limit_per_minute: default_login_limit(),
            max_upload_bytes: 1024,
            resume_dir: default_resume_dir(),
            image_host_url: None,
            image_host_api_key: None,
            mail_api_url: None,
            mail_api_key: None,
            mail_from: None,
            ai_api_url: None,
            ai_api_key: None,
            ai_model: default_ai_model(),
            owner_name: "Owner".into(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Mail delivery needs an endpoint, a key and a sender address.
    pub fn mail_configured(&self) -> bool {
        [&self.mail_api_url, &self.mail_api_key, &self.mail_from]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else if self.len() < 32 {
            "[TOO_SHORT]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

fn redact_opt(value: &Option<String>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "[REDACTED]",
        _ => "[NOT SET]",
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("redis_url", &redact_opt(&self.redis_url))
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_secret", &self.jwt_secret.redact())
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("auth_cookie_name", &self.auth_cookie_name)
            .field("allow_registration", &self.allow_registration)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("resume_dir", &self.resume_dir)
            .field("image_host_url", &self.image_host_url)
            .field("image_host_api_key", &redact_opt(&self.image_host_api_key))
            .field("mail_api_url", &self.mail_api_url)
            .field("mail_api_key", &redact_opt(&self.mail_api_key))
            .field("ai_api_url", &self.ai_api_url)
            .field("ai_api_key", &redact_opt(&self.ai_api_key))
            .finish()
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl From<&AppConfig> for JwtKeys {
    fn from(config: &AppConfig) -> Self {
        let jwt_secret = Zeroizing::new(config.jwt_secret.clone());

        JwtKeys {
            encoding: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(jwt_secret.as_bytes()),
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        let mut config = AppConfig::for_tests(AppEnvironment::Testing);
        config.cors_allowed_origins = vec!["http://localhost:3000, https://example.dev".into()];
        config
    }

    #[test]
    fn cors_origins_splits_comma_separated_entries() {
        let config = sample();
        assert_eq!(
            config.cors_origins(),
            vec!["http://localhost:3000".to_string(), "https://example.dev".to_string()]
        );
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        let mut config = sample();
        config.jwt_secret = "short".into();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("JWT_SECRET"));
    }

    #[test]
    fn wildcard_cors_is_rejected_in_production() {
        let mut config = sample();
        config.env = AppEnvironment::Production;
        config.cors_allowed_origins = vec!["*".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = sample();
        config.mail_api_key = Some("re_live_key".into());
        let out = format!("{:?}", config);
        assert!(!out.contains("a-very-long-secret"));
        assert!(!out.contains("re_live_key"));
        assert!(out.contains("[REDACTED]"));
    }

    #[test]
    fn mail_requires_all_three_settings() {
        let mut config = sample();
        config.mail_api_url = Some("https://api.mail.test/emails".into());
        config.mail_api_key = Some("key".into());
        assert!(!config.mail_configured());
        config.mail_from = Some("me@example.dev".into());
        assert!(config.mail_configured());
    }
}
