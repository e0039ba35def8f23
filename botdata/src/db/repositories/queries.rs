// Table name mapping and shared column lists for repository statements

/// The closed set of tables this layer touches.
///
/// Statement text only ever interpolates names from this mapping; table
/// names never come from caller input. Values are always bound
/// positionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Table {
    Guilds,
    Users,
    Permissions,
}

impl Table {
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Table::Guilds => "guilds",
            Table::Users => "users",
            Table::Permissions => "permissions",
        }
    }
}

/// Column list for the guilds table
pub(crate) mod guild_queries {
    pub(crate) const ALL_COLUMNS: &str = "guild_id, prefix, language";
}

/// Column list for the users table
pub(crate) mod user_queries {
    pub(crate) const ALL_COLUMNS: &str = "user_id, prefix, language";
}

/// Column list for the permissions table
pub(crate) mod permission_queries {
    pub(crate) const ALL_COLUMNS: &str =
        "permission_name, guild_id, target_id, is_user, is_whitelist";
}
