mod settings;

pub use settings::{
    CooldownConfig, DatabaseConfig, DiscordConfig, JwtConfig, LoggingConfig, PermissionsConfig,
    ServerConfig, Settings,
};
