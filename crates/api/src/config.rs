use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    /// Hosted-auth session verification and cookies
    pub session: SessionConfig,
    /// Hosted auth service (sign-in, password reset)
    #[serde(default)]
    pub hosted_auth: HostedAuthConfig,
    /// Cloudflare GraphQL analytics proxy
    #[serde(default)]
    pub cloudflare: CloudflareConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

/// Which store implementation backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    /// In-process maps; data is lost on restart
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_backend")]
    pub backend: StoreBackend,

    /// NOTIFY channel raised by the theme settings trigger
    #[serde(default = "default_realtime_channel")]
    pub realtime_channel: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default)]
    pub hsts_enabled: bool,

    /// Salt for one-way hashing of client IPs
    #[serde(default)]
    pub ip_hash_salt: String,

    /// Origin of the public site; theme preview messages must come from here
    #[serde(default = "default_site_origin")]
    pub site_origin: String,

    /// Read the client address from proxy headers. Disable when the server
    /// is reachable without going through the proxy.
    #[serde(default = "default_trust_proxy_headers")]
    pub trust_proxy_headers: bool,

    #[serde(default)]
    pub rate_limits: RateLimitsConfig,
}

/// Fixed-window limit for one public route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RateLimitRule {
    pub max_requests: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitsConfig {
    #[serde(default = "default_intake_limit")]
    pub intake: RateLimitRule,

    #[serde(default = "default_newsletter_limit")]
    pub newsletter: RateLimitRule,

    #[serde(default = "default_analytics_limit")]
    pub analytics: RateLimitRule,
}

impl Default for RateLimitsConfig {
    fn default() -> Self {
        Self {
            intake: default_intake_limit(),
            newsletter: default_newsletter_limit(),
            analytics: default_analytics_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Shared HS256 secret used by the hosted auth service to sign access tokens
    #[serde(default)]
    pub jwt_secret: String,

    /// Leeway in seconds for clock skew tolerance
    #[serde(default = "default_session_leeway")]
    pub leeway_secs: u64,

    /// Set the `Secure` attribute on session cookies
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,

    #[serde(default = "default_refresh_cookie_max_age")]
    pub refresh_cookie_max_age_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostedAuthConfig {
    /// Base URL of the auth service, e.g. `https://<project>.supabase.co/auth/v1`
    #[serde(default)]
    pub url: String,

    /// Public (anon) API key sent as the `apikey` header
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_outbound_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for HostedAuthConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_ms: default_outbound_timeout_ms(),
        }
    }
}

impl HostedAuthConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.api_key.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudflareConfig {
    #[serde(default)]
    pub api_token: String,

    #[serde(default)]
    pub zone_id: String,

    #[serde(default = "default_cloudflare_graphql_url")]
    pub graphql_url: String,

    #[serde(default = "default_outbound_timeout_ms")]
    pub timeout_ms: u64,

    /// Max outbound GraphQL requests per minute
    #[serde(default = "default_cloudflare_rate_limit")]
    pub rate_limit_per_minute: u32,
}

impl Default for CloudflareConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            zone_id: String::new(),
            graphql_url: default_cloudflare_graphql_url(),
            timeout_ms: default_outbound_timeout_ms(),
            rate_limit_per_minute: default_cloudflare_rate_limit(),
        }
    }
}

impl CloudflareConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_token.is_empty() && !self.zone_id.is_empty()
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    1_048_576
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_store_backend() -> StoreBackend {
    StoreBackend::Postgres
}
fn default_realtime_channel() -> String {
    persistence::realtime::DEFAULT_THEME_CHANNEL.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_site_origin() -> String {
    "http://localhost:3000".to_string()
}
fn default_trust_proxy_headers() -> bool {
    true
}
fn default_intake_limit() -> RateLimitRule {
    RateLimitRule {
        max_requests: 5,
        window_secs: 3600,
    }
}
fn default_newsletter_limit() -> RateLimitRule {
    RateLimitRule {
        max_requests: 3,
        window_secs: 3600,
    }
}
fn default_analytics_limit() -> RateLimitRule {
    RateLimitRule {
        max_requests: 100,
        window_secs: 60,
    }
}
fn default_session_leeway() -> u64 {
    shared::session::DEFAULT_LEEWAY_SECS
}
fn default_cookie_secure() -> bool {
    true
}
fn default_refresh_cookie_max_age() -> i64 {
    60 * 60 * 24 * 30
}
fn default_outbound_timeout_ms() -> u64 {
    10_000
}
fn default_cloudflare_graphql_url() -> String {
    "https://api.cloudflare.com/client/v4/graphql".to_string()
}
fn default_cloudflare_rate_limit() -> u32 {
    30
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with SITE__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("SITE").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Builds a configuration from TOML text plus `key = value` overrides.
    ///
    /// Skips validation so tests can work with partial configs.
    pub fn load_from_str(
        toml: &str,
        overrides: &[(&str, &str)],
    ) -> Result<Self, config::ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::File::from_str(toml, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        Self::load_from_str(include_str!("../config/default.toml"), overrides)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.store.backend == StoreBackend::Postgres && self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "SITE__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.session.jwt_secret.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "SITE__SESSION__JWT_SECRET environment variable must be set".to_string(),
            ));
        }

        if self.security.ip_hash_salt.len() < 16 {
            return Err(ConfigValidationError::InvalidValue(
                "security.ip_hash_salt must be at least 16 characters".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(ConfigValidationError::InvalidValue(format!(
                "logging.format must be json or pretty, got {}",
                self.logging.format
            )));
        }

        let limits = &self.security.rate_limits;
        for (name, rule) in [
            ("intake", limits.intake),
            ("newsletter", limits.newsletter),
            ("analytics", limits.analytics),
        ] {
            if rule.max_requests == 0 || rule.window_secs == 0 {
                return Err(ConfigValidationError::InvalidValue(format!(
                    "security.rate_limits.{} needs max_requests and window_secs above 0",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
