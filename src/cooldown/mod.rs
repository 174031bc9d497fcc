//! Per-guild command cooldowns.
//!
//! A slot is consumed only when the command is allowed, so a refused
//! invocation never extends the wait.

use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::config::CooldownConfig;

/// Tracks the last accepted use of a command per guild.
#[derive(Debug)]
pub struct GuildCooldown {
    last_used: DashMap<i64, Instant>,
    duration: Duration,
}

impl GuildCooldown {
    pub fn new(duration: Duration) -> Self {
        Self {
            last_used: DashMap::new(),
            duration,
        }
    }

    /// Cooldown for server startup announcements
    pub fn server_startup(config: &CooldownConfig) -> Self {
        Self::new(Duration::from_secs(config.server_startup_seconds))
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Take the guild's slot, or return the whole seconds left to wait.
    pub fn try_acquire(&self, guild_id: i64) -> Result<(), u64> {
        let now = Instant::now();

        match self.last_used.entry(guild_id) {
            Entry::Occupied(mut entry) => {
                let elapsed = now.saturating_duration_since(*entry.get());
                if elapsed < self.duration {
                    return Err(Self::whole_seconds(self.duration - elapsed));
                }
                entry.insert(now);
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
            }
        }

        Ok(())
    }

    /// Seconds until the guild may use the command again (0 when ready)
    pub fn remaining(&self, guild_id: i64) -> u64 {
        self.last_used
            .get(&guild_id)
            .map(|last| {
                let elapsed = last.elapsed();
                if elapsed < self.duration {
                    Self::whole_seconds(self.duration - elapsed)
                } else {
                    0
                }
            })
            .unwrap_or(0)
    }

    /// Round up, never below one second
    fn whole_seconds(left: Duration) -> u64 {
        let secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
        secs.max(1)
    }
}
