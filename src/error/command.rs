//! User-facing command failures.
//!
//! Every variant is a recoverable precondition failure: the command is rejected, state
//! is left unchanged and the `Display` text is posted back to the caller.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// Command syntax was not understood; carries the usage line.
    #[error("Usage: `{0}`")]
    Usage(String),

    /// Caller lacks the guild permission the command group requires.
    #[error(":x: You need the `{0}` permission to use this command!")]
    MissingPermission(&'static str),

    #[error(":x: Uninitialized server!")]
    UninitializedGuild,

    #[error(":x: This is not a counting channel!")]
    NotCountingChannel,

    #[error(":x: This channel is already a counting channel!")]
    AlreadyCountingChannel,

    #[error("That channel doesn't seem to exist - I can't see it!")]
    UnknownChannel,

    #[error("That role doesn't seem to exist!")]
    UnknownRole,

    #[error("I don't have the MANAGE_ROLES permission!")]
    BotMissingManageRoles,

    #[error("You do not have the MANAGE_ROLES permission!")]
    CallerMissingManageRoles,

    #[error("That role is higher or equal with your highest role - You can't manage that!")]
    RoleAboveCaller,

    #[error("That role is higher or equal with my highest role - I can't manage that!")]
    RoleAboveBot,

    #[error("That role is higher or equal with my highest role - I can't assign that!")]
    CannotAssignRole,

    #[error("Already running - check the previous message for progress!")]
    BulkJobRunning,

    #[error("There are no operations running right now!")]
    NoBulkJobRunning,

    #[error("Invalid operation!")]
    InvalidOperation,

    #[error("The `apply` operation needs a filter role: `<role>;<filterRole>`")]
    ApplyNeedsFilter,

    #[error("I don't have the `send_messages` permission in <#{0}>.")]
    CannotSendIn(u64),

    #[error("Was unable to embed a message. Need EMBED_LINKS permission.")]
    CannotEmbed,

    #[error("Was unable to add reactions. Need ADD_REACTIONS permission.")]
    CannotReact,

    #[error(":x: **There's nothing to toggle just yet. Try using other commands first.**")]
    NothingToToggle,

    #[error(":x: **InviteUtils was never enabled on this server.**")]
    InvitesNeverEnabled,

    #[error("That invite doesn't seem to exist.")]
    UnknownInvite,

    #[error("That invite doesn't seem to have any roles assigned to it.")]
    InviteHasNoRole,

    #[error("This command can only be used in a server.")]
    GuildOnly,
}
