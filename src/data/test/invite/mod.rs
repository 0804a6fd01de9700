use crate::{
    data::invite::{InviteSettingsRepository, TrackedInviteRepository},
    error::AppError,
    model::invite::{InviteGuildSettings, TrackedInvite},
};
use test_utils::{builder::TestBuilder, factory};

mod delete;
mod replace_all;
mod set_role;
mod upsert;
