use std::env;

use auth::TokenLifetimes;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub email: EmailConfig,
    pub google: GoogleConfig,
    #[serde(default)]
    pub superuser: Option<SuperuserConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection string. Empty selects the in-memory store.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_minutes: i64,
    pub verification_token_expire_minutes: i64,
    pub password_reset_token_expire_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub enabled: bool,
    pub sender: String,
    pub verification_required: bool,
    /// Prefix of the links carried in outgoing mail.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GoogleConfig {
    pub userinfo_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SuperuserConfig {
    pub email: String,
    pub password: String,
}

fn default_max_connections() -> u32 {
    5
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.url.trim().is_empty()
    }
}

impl JwtConfig {
    pub fn lifetimes(&self) -> TokenLifetimes {
        TokenLifetimes::from_minutes(
            self.access_token_expire_minutes,
            self.refresh_token_expire_minutes,
            self.verification_token_expire_minutes,
            self.password_reset_token_expire_minutes,
        )
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}
