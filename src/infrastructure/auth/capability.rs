//! Role-based capability checks applied before every mutating command.

use std::fmt;

use crate::config::PermissionsConfig;

/// Something a caller can be allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Save, edit and delete recruitment posts
    ManagePosts,
    /// Send a saved recruitment post to the recruitment channel
    SendPosts,
    /// Send a custom announcement
    Announce,
    /// Announce a server startup
    HostServerStartup,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManagePosts => "manage_posts",
            Capability::SendPosts => "send_posts",
            Capability::Announce => "announce",
            Capability::HostServerStartup => "host_server_startup",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allowed when `required` is empty or the caller holds any role in it.
pub fn is_allowed(caller_roles: &[String], required: &[String]) -> bool {
    required.is_empty() || required.iter().any(|role| caller_roles.contains(role))
}

/// Required role sets per capability
#[derive(Debug, Clone, Default)]
pub struct PermissionPolicy {
    config: PermissionsConfig,
}

impl PermissionPolicy {
    pub fn new(config: PermissionsConfig) -> Self {
        Self { config }
    }

    /// Roles that grant the capability
    pub fn required_roles(&self, capability: Capability) -> &[String] {
        match capability {
            Capability::ManagePosts => &self.config.manage_posts,
            Capability::SendPosts => &self.config.send_posts,
            Capability::Announce => &self.config.announce,
            Capability::HostServerStartup => &self.config.host_server_startup,
        }
    }

    pub fn allows(&self, caller_roles: &[String], capability: Capability) -> bool {
        is_allowed(caller_roles, self.required_roles(capability))
    }
}
