//! Serenity `Role` factories for role hierarchy tests.

use std::collections::HashMap;

use serenity::all::{Role, RoleId};

/// Creates a Serenity Role at the given hierarchy position.
///
/// The role is deserialized from the JSON shape Discord returns, with no colour, no
/// permissions and every flag off.
///
/// # Panics
/// - If the JSON cannot be deserialized into a Role
pub fn create_test_role(role_id: u64, name: &str, position: u16) -> Role {
    serde_json::from_value(serde_json::json!({
        "id": role_id.to_string(),
        "name": name,
        "color": 0,
        "hoist": false,
        "icon": null,
        "unicode_emoji": null,
        "position": position,
        "permissions": "0",
        "managed": false,
        "mentionable": false,
    }))
    .expect("test role JSON should deserialize")
}

/// Builds a guild role map from `(id, name, position)` triples.
///
/// ```rust,ignore
/// use test_utils::serenity::create_test_roles;
///
/// let roles = create_test_roles(&[(1, "@everyone", 0), (2, "Mod", 5), (3, "Admin", 10)]);
/// assert_eq!(roles.len(), 3);
/// ```
pub fn create_test_roles(roles: &[(u64, &str, u16)]) -> HashMap<RoleId, Role> {
    roles
        .iter()
        .map(|&(id, name, position)| (RoleId::new(id), create_test_role(id, name, position)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_role_at_position() {
        let role = create_test_role(42, "Mod", 5);

        assert_eq!(role.id, RoleId::new(42));
        assert_eq!(role.name, "Mod");
        assert_eq!(role.position, 5);
    }

    #[test]
    fn builds_role_map_keyed_by_id() {
        let roles = create_test_roles(&[(1, "@everyone", 0), (2, "Mod", 5)]);

        assert_eq!(roles[&RoleId::new(2)].name, "Mod");
    }
}
