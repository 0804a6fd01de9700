//! Role hierarchy and guild permission checks shared by the command groups.

use std::collections::HashMap;

use serenity::all::{Context, GuildId, Permissions, Role, RoleId, UserId};

use crate::{
    error::{command::CommandError, internal::InternalError, AppError},
    util::parse::parse_mention,
};

/// Guild-level view of one member: effective permissions and top role position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberStanding {
    pub permissions: Permissions,
    pub top_position: u16,
}

impl MemberStanding {
    pub fn can_manage_roles(&self) -> bool {
        self.permissions.administrator() || self.permissions.manage_roles()
    }

    /// Whether a role sits strictly below this member's highest role.
    pub fn outranks(&self, role: &Role) -> bool {
        role.position < self.top_position
    }
}

/// Position of the highest of the given roles; 0 when the member holds none.
pub fn top_role_position(role_ids: &[RoleId], roles: &HashMap<RoleId, Role>) -> u16 {
    role_ids
        .iter()
        .filter_map(|id| roles.get(id))
        .map(|role| role.position)
        .max()
        .unwrap_or(0)
}

/// Checks that a caller may have the bot grant or revoke `role` on their behalf.
///
/// # Returns
/// - `Ok(())` - Both caller and bot hold MANAGE_ROLES and outrank the role
/// - `Err(CommandError)` - The first failed precondition
pub fn check_role_manageable(
    role: &Role,
    caller: &MemberStanding,
    bot: &MemberStanding,
) -> Result<(), CommandError> {
    if !bot.can_manage_roles() {
        return Err(CommandError::BotMissingManageRoles);
    }
    if !caller.outranks(role) {
        return Err(CommandError::RoleAboveCaller);
    }
    if !bot.outranks(role) {
        return Err(CommandError::RoleAboveBot);
    }

    Ok(())
}

/// Finds a role by mention, raw ID or exact name.
pub fn resolve_role<'a>(value: &str, roles: &'a HashMap<RoleId, Role>) -> Option<&'a Role> {
    let value = value.trim();

    if let Some(id) = parse_mention(value, "@&") {
        if let Some(role) = roles.get(&RoleId::new(id)) {
            return Some(role);
        }
    }

    roles.values().find(|role| role.name == value)
}

/// Computes a member's standing from the guild cache, fetching the member if needed.
///
/// # Arguments
/// - `ctx` - Serenity context with the cache and HTTP client
/// - `guild_id` - Guild to inspect
/// - `user_id` - Member to inspect
///
/// # Returns
/// - `Ok(MemberStanding)` - Effective permissions and top role position
/// - `Err(AppError::InternalErr)` - The guild is not cached
/// - `Err(AppError::DiscordErr)` - Fetching the member failed
pub async fn member_standing(
    ctx: &Context,
    guild_id: GuildId,
    user_id: UserId,
) -> Result<MemberStanding, AppError> {
    let member = guild_id.member(ctx, user_id).await?;

    let guild = ctx
        .cache
        .guild(guild_id)
        .ok_or(InternalError::GuildNotCached(guild_id.get()))?;

    let permissions = if guild.owner_id == user_id {
        Permissions::all()
    } else {
        guild.member_permissions(&member)
    };

    Ok(MemberStanding {
        permissions,
        top_position: top_role_position(&member.roles, &guild.roles),
    })
}

/// Snapshot of the guild's roles from the cache.
pub fn guild_roles(ctx: &Context, guild_id: GuildId) -> Result<HashMap<RoleId, Role>, AppError> {
    let guild = ctx
        .cache
        .guild(guild_id)
        .ok_or(InternalError::GuildNotCached(guild_id.get()))?;

    Ok(guild.roles.clone())
}
