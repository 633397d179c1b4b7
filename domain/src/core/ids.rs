//! Identifier newtypes for councils and principals.
//!
//! All ids are opaque u64 values assigned by the host platform. A
//! [`PrincipalId`] identifies either a user or a role; weight overrides and
//! config keys treat the two uniformly, mirroring the host's id space.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque id of the host-side community ("guild") a council lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(pub u64);

/// Opaque id of the channel a council is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u64);

/// Opaque id of a user or role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub u64);

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite identity of a council: one council per `(guild, channel)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CouncilId {
    pub guild: GuildId,
    pub channel: ChannelId,
}

impl CouncilId {
    pub fn new(guild: u64, channel: u64) -> Self {
        Self {
            guild: GuildId(guild),
            channel: ChannelId(channel),
        }
    }

    /// Storage key form, `"<guild>:<channel>"`.
    pub fn storage_key(&self) -> String {
        format!("{}:{}", self.guild.0, self.channel.0)
    }

    /// Parse the storage key form back into a [`CouncilId`].
    pub fn from_storage_key(key: &str) -> Option<Self> {
        let (g, c) = key.split_once(':')?;
        Some(Self::new(g.parse().ok()?, c.parse().ok()?))
    }
}

impl fmt::Display for CouncilId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.guild.0, self.channel.0)
    }
}

/// The authenticated actor behind an engine operation.
///
/// Authentication itself is the host platform's job; the engine only sees
/// the resulting identity, the roles currently held, and whether the actor
/// carries admin-equivalent permissions (the original's "manage server").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: PrincipalId,
    pub roles: Vec<PrincipalId>,
    pub admin: bool,
}

impl Principal {
    pub fn new(id: u64) -> Self {
        Self {
            id: PrincipalId(id),
            roles: Vec::new(),
            admin: false,
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = u64>) -> Self {
        self.roles = roles.into_iter().map(PrincipalId).collect();
        self
    }

    pub fn as_admin(mut self) -> Self {
        self.admin = true;
        self
    }

    pub fn has_role(&self, role: PrincipalId) -> bool {
        self.roles.contains(&role)
    }
}
