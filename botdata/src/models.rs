use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Settings Models
// ============================================================================

/// Per-guild bot configuration.
///
/// A missing row means the guild uses the defaults; read operations never
/// substitute defaults themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GuildSettings {
    pub guild_id: i64,
    pub prefix: String,
    pub language: String,
}

impl GuildSettings {
    pub const DEFAULT_PREFIX: &'static str = "!";
    pub const DEFAULT_LANGUAGE: &'static str = "en";

    /// The record seeded on first interaction with a guild.
    pub fn with_defaults(guild_id: i64) -> Self {
        Self {
            guild_id,
            prefix: Self::DEFAULT_PREFIX.to_string(),
            language: Self::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Per-user bot configuration, same shape as [`GuildSettings`] but stored
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserSettings {
    pub user_id: i64,
    pub prefix: String,
    pub language: String,
}

impl UserSettings {
    pub const DEFAULT_PREFIX: &'static str = "!";
    pub const DEFAULT_LANGUAGE: &'static str = "en";

    /// The record seeded on first interaction with a user.
    pub fn with_defaults(user_id: i64) -> Self {
        Self {
            user_id,
            prefix: Self::DEFAULT_PREFIX.to_string(),
            language: Self::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

// ============================================================================
// Permission Models
// ============================================================================

/// One allow/deny rule for a permission inside a guild.
///
/// `is_user` distinguishes a user-target row from a role-target row sharing
/// the same numeric id space; together with the permission name, guild and
/// target id it forms the composite key, so at most one rule exists per
/// permission+target+guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PermissionEntry {
    pub permission_name: String,
    pub guild_id: i64,
    pub target_id: i64,
    pub is_user: bool,
    pub is_whitelist: bool,
}
