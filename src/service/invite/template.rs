//! Welcome and farewell message templates.
//!
//! Templates reference positional arguments with optional attributes:
//! `{0}` the member, `{1}` the guild, `{2}` the invite and `{3}` the role granted
//! through the invite. `{{` and `}}` produce literal braces. Invite and role are only
//! available in join messages.

use thiserror::Error;

use crate::model::invite::LiveInvite;

/// Help text listing the supported placeholders.
pub const EXAMPLES: &str = "**Here are some examples!**\n\n```css
You can customize your join/leave messages as follows:
    {0} is the user.
    {1} is the server.
    {2} is the invite.
    {3} is the role.
Example formats:
    {0.mention} - mention the user.
    {0.name}    - say the user's name.
    {0.id}      - the user's ID.
    {1.name}    - name of the server.
    {2.inviter} - name of the user that made the invite.
    {2.url}     - the invite link the user joined with.
    {2.code}    - the 'code' part of the invite.
    {2.uses}    - how many times the invite was used.
    {3.name}    - the name of the role being assigned on join.
    {3.mention} - mention the role being assigned on join.
Message Examples:
    join:
        Hey {0.mention}, welcome to {1.name}! You have been assigned to {3.name}. I hope you enjoy your stay!
        User {0.mention} joined with {2.url}, referred by {2.inviter}. Welcome to {1.name}!
    leave:
        {0.name} has just left {1.name}! Bye {0.name}, hope you had a good stay!```";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown placeholder `{{{0}}}`")]
    UnknownPlaceholder(String),

    #[error("Unmatched `{{` in template")]
    UnclosedBrace,

    #[error("Unmatched `}}` in template")]
    StrayClosingBrace,
}

/// The member a message is about.
#[derive(Debug, Clone)]
pub struct MemberArg {
    pub id: u64,
    pub name: String,
}

/// The guild a message is posted for.
#[derive(Debug, Clone)]
pub struct GuildArg {
    pub id: u64,
    pub name: String,
}

/// Role granted through the join invite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleArg {
    Granted { id: u64, name: String },
    /// The invite is bound to a role that no longer exists.
    Deleted,
    /// The invite has no role bound.
    None,
}

impl RoleArg {
    fn name(&self) -> String {
        match self {
            Self::Granted { name, .. } => name.clone(),
            Self::Deleted => "deleted-role".to_string(),
            Self::None => "None".to_string(),
        }
    }

    fn mention(&self) -> String {
        match self {
            Self::Granted { id, .. } => format!("<@&{}>", id),
            _ => self.name(),
        }
    }
}

/// Values a template is rendered with.
pub struct TemplateArgs<'a> {
    pub member: &'a MemberArg,
    pub guild: &'a GuildArg,
    /// Present for join messages only.
    pub invite: Option<&'a LiveInvite>,
    /// Present for join messages only.
    pub role: Option<&'a RoleArg>,
}

impl TemplateArgs<'_> {
    fn resolve(&self, placeholder: &str) -> Option<String> {
        let (index, attribute) = match placeholder.split_once('.') {
            Some((index, attribute)) => (index, Some(attribute)),
            None => (placeholder, None),
        };

        match (index, attribute) {
            ("0", None | Some("name")) => Some(self.member.name.clone()),
            ("0", Some("mention")) => Some(format!("<@{}>", self.member.id)),
            ("0", Some("id")) => Some(self.member.id.to_string()),
            ("1", None | Some("name")) => Some(self.guild.name.clone()),
            ("1", Some("id")) => Some(self.guild.id.to_string()),
            ("2", attribute) => {
                let invite = self.invite?;
                match attribute {
                    None | Some("url") => Some(invite.url()),
                    Some("code") => Some(invite.code.clone()),
                    Some("inviter") => Some(
                        invite
                            .inviter
                            .clone()
                            .unwrap_or_else(|| LiveInvite::UNKNOWN.to_string()),
                    ),
                    Some("uses") => Some(invite.uses.to_string()),
                    Some(_) => None,
                }
            }
            ("3", attribute) => {
                let role = self.role?;
                match attribute {
                    None | Some("name") => Some(role.name()),
                    Some("mention") => Some(role.mention()),
                    Some(_) => None,
                }
            }
            _ => None,
        }
    }
}

/// Renders a template.
///
/// # Arguments
/// - `template` - Template text as configured by the guild
/// - `args` - Values for the placeholders
///
/// # Returns
/// - `Ok(String)` - Rendered message
/// - `Err(TemplateError)` - Unknown placeholder or unbalanced brace
pub fn render(template: &str, args: &TemplateArgs<'_>) -> Result<String, TemplateError> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                output.push('{');
            }
            '{' => {
                let mut placeholder = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => return Err(TemplateError::UnclosedBrace),
                        Some(c) => placeholder.push(c),
                    }
                }

                let value = args
                    .resolve(&placeholder)
                    .ok_or(TemplateError::UnknownPlaceholder(placeholder))?;
                output.push_str(&value);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                output.push('}');
            }
            '}' => return Err(TemplateError::StrayClosingBrace),
            c => output.push(c),
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> MemberArg {
        MemberArg {
            id: 42,
            name: "bob".to_string(),
        }
    }

    fn guild() -> GuildArg {
        GuildArg {
            id: 7,
            name: "Test Server".to_string(),
        }
    }

    fn invite() -> LiveInvite {
        LiveInvite {
            code: "abc123".to_string(),
            uses: 3,
            inviter: Some("alice".to_string()),
        }
    }

    #[test]
    fn renders_member_and_guild() {
        let (member, guild) = (member(), guild());
        let args = TemplateArgs {
            member: &member,
            guild: &guild,
            invite: None,
            role: None,
        };

        let rendered = render("{0.mention} ({0.name}/{0.id}) left {1.name} [{1.id}] {0} {1}", &args);

        assert_eq!(
            rendered.unwrap(),
            "<@42> (bob/42) left Test Server [7] bob Test Server"
        );
    }

    #[test]
    fn renders_invite_and_role() {
        let (member, guild, invite) = (member(), guild(), invite());
        let role = RoleArg::Granted {
            id: 9,
            name: "Friends".to_string(),
        };
        let args = TemplateArgs {
            member: &member,
            guild: &guild,
            invite: Some(&invite),
            role: Some(&role),
        };

        let rendered = render(
            "{2.code} {2.url} {2.inviter} {2.uses} {2} {3.name} {3.mention} {3}",
            &args,
        );

        assert_eq!(
            rendered.unwrap(),
            "abc123 https://discord.gg/abc123 alice 3 https://discord.gg/abc123 Friends <@&9> Friends"
        );
    }

    #[test]
    fn renders_placeholder_role_names() {
        let (member, guild, invite) = (member(), guild(), invite());
        let (deleted, unbound) = (RoleArg::Deleted, RoleArg::None);
        let deleted_args = TemplateArgs {
            member: &member,
            guild: &guild,
            invite: Some(&invite),
            role: Some(&deleted),
        };
        let unbound_args = TemplateArgs {
            member: &member,
            guild: &guild,
            invite: Some(&invite),
            role: Some(&unbound),
        };

        assert_eq!(render("{3.name}", &deleted_args).unwrap(), "deleted-role");
        assert_eq!(render("{3.mention}", &unbound_args).unwrap(), "None");
    }

    #[test]
    fn escapes_braces() {
        let (member, guild) = (member(), guild());
        let args = TemplateArgs {
            member: &member,
            guild: &guild,
            invite: None,
            role: None,
        };

        assert_eq!(render("{{0}} is {0}", &args).unwrap(), "{0} is bob");
    }

    #[test]
    fn rejects_invite_fields_in_leave_messages() {
        let (member, guild) = (member(), guild());
        let args = TemplateArgs {
            member: &member,
            guild: &guild,
            invite: None,
            role: None,
        };

        assert_eq!(
            render("{2.code}", &args),
            Err(TemplateError::UnknownPlaceholder("2.code".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_attributes_and_bad_braces() {
        let (member, guild) = (member(), guild());
        let args = TemplateArgs {
            member: &member,
            guild: &guild,
            invite: None,
            role: None,
        };

        assert_eq!(
            render("{0.avatar}", &args),
            Err(TemplateError::UnknownPlaceholder("0.avatar".to_string()))
        );
        assert_eq!(render("{0.name", &args), Err(TemplateError::UnclosedBrace));
        assert_eq!(render("oops }", &args), Err(TemplateError::StrayClosingBrace));
    }
}
