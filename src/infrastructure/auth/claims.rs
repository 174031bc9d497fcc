use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (chat platform user ID)
    pub sub: String,
    /// Display name shown in announcement footers
    #[serde(default)]
    pub name: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Guild roles held by the caller
    #[serde(default)]
    pub roles: Vec<String>,
    /// Guild the token is scoped to; unscoped tokens work in any guild
    #[serde(default)]
    pub guild_id: Option<i64>,
    /// Additional custom claims
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Display name, falling back to the user ID
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.sub)
    }

    /// Whether the token may act in the given guild
    pub fn can_act_in(&self, guild_id: i64) -> bool {
        self.guild_id.map_or(true, |scoped| scoped == guild_id)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}
