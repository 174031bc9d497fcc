use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub permissions: PermissionsConfig,
    #[serde(default)]
    pub cooldown: CooldownConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Storage backend: "postgres" or "memory"
    #[serde(default = "default_database_backend")]
    pub backend: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// Pool acquire timeout; a store slower than this is reported unavailable
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u32,
}

fn default_database_backend() -> String {
    "postgres".to_string()
}

fn default_pool_size() -> u32 {
    5
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_idle_timeout() -> u32 {
    600 // 10 minutes
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    /// Bot token; without one, deliveries are only logged
    pub bot_token: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub announcement_channel_id: Option<u64>,
    pub recruitment_channel_id: Option<u64>,
    pub ssu_channel_id: Option<u64>,
    /// Link behind the "Join Game" button of server startup announcements
    #[serde(default = "default_game_link")]
    pub game_link: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_game_link() -> String {
    "https://www.roblox.com/games/17371095768/SCP-Lambda".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    /// Clock skew tolerated on `exp`
    #[serde(default)]
    pub leeway_seconds: u64,
}

/// Roles allowed to use each capability. An empty list allows everyone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PermissionsConfig {
    #[serde(default)]
    pub manage_posts: Vec<String>,
    #[serde(default)]
    pub send_posts: Vec<String>,
    #[serde(default)]
    pub announce: Vec<String>,
    #[serde(default)]
    pub host_server_startup: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CooldownConfig {
    /// Per-guild cooldown between server startup announcements
    #[serde(default = "default_ssu_cooldown")]
    pub server_startup_seconds: u64,
}

fn default_ssu_cooldown() -> u64 {
    600 // 10 minutes
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Environment variable names used by earlier deployments of the bot,
/// mapped onto their configuration keys.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("BOT_TOKEN", "discord.bot_token"),
    ("DATABASE_URL", "database.url"),
    ("ANNOUNCEMENT_CHANNEL_ID", "discord.announcement_channel_id"),
    ("RECRUITMENT_CHANNEL_ID", "discord.recruitment_channel_id"),
    ("SSU_CHANNEL_ID", "discord.ssu_channel_id"),
    ("GAME_LINK", "discord.game_link"),
];

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // RECRUIT__DISCORD__BOT_TOKEN, RECRUIT__PERMISSIONS__MANAGE_POSTS=staff,admin, ...
            .add_source(
                Environment::with_prefix("RECRUIT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .with_list_parse_key("permissions.manage_posts")
                    .with_list_parse_key("permissions.send_posts")
                    .with_list_parse_key("permissions.announce")
                    .with_list_parse_key("permissions.host_server_startup"),
            );

        for (var, key) in LEGACY_ENV_KEYS {
            builder = builder.set_override_option(*key, env::var(var).ok())?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: default_database_backend(),
            url: String::new(),
            pool_size: default_pool_size(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: default_api_base(),
            announcement_channel_id: None,
            recruitment_channel_id: None,
            ssu_channel_id: None,
            game_link: default_game_link(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            server_startup_seconds: default_ssu_cooldown(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
