use std::sync::Arc;
use std::time::Instant;

use crate::auth::{JwtValidator, PermissionPolicy};
use crate::commands::CommandService;
use crate::config::Settings;
use crate::cooldown::GuildCooldown;
use crate::dispatch::ChannelDispatcher;
use crate::postgres::PostgresPool;
use crate::template::TemplateStore;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub jwt_validator: Arc<JwtValidator>,
    pub commands: Arc<CommandService>,
    /// Present when the Postgres backend connected at startup
    pub postgres_pool: Option<PostgresPool>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        settings: Settings,
        store: TemplateStore,
        dispatcher: Arc<dyn ChannelDispatcher>,
        postgres_pool: Option<PostgresPool>,
    ) -> Self {
        let jwt_validator = Arc::new(JwtValidator::new(&settings.jwt));
        let commands = Arc::new(CommandService::new(
            store,
            dispatcher,
            PermissionPolicy::new(settings.permissions.clone()),
            settings.discord.clone(),
            GuildCooldown::server_startup(&settings.cooldown),
        ));

        Self {
            settings: Arc::new(settings),
            jwt_validator,
            commands,
            postgres_pool,
            start_time: Instant::now(),
        }
    }
}
