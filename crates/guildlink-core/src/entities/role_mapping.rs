//! Role mappings and role reconciliation
//!
//! A mapping ties a local permission group to a remote role. The first mapping
//! (in configuration order) whose group the player holds decides the single
//! remote role the player should carry; every other mapped role is removed.

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Local group to remote role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMapping {
    #[serde(default = "default_local_group")]
    pub local_group: String,
    #[serde(default)]
    pub remote_role_id: Snowflake,
}

fn default_local_group() -> String {
    "default".to_string()
}

impl RoleMapping {
    pub fn new(local_group: impl Into<String>, remote_role_id: Snowflake) -> Self {
        Self {
            local_group: local_group.into(),
            remote_role_id,
        }
    }
}

/// First mapping whose local group `has_group` reports as held
pub fn select_mapping<'a, F>(mappings: &'a [RoleMapping], has_group: F) -> Option<&'a RoleMapping>
where
    F: Fn(&str) -> bool,
{
    mappings.iter().find(|m| has_group(&m.local_group))
}

/// Roles to add and remove in one membership update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDelta {
    pub add: Vec<Snowflake>,
    pub remove: Vec<Snowflake>,
}

impl RoleDelta {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    /// Apply to a member's current roles, keeping the original order
    pub fn apply(&self, current: &[Snowflake]) -> Vec<Snowflake> {
        let mut roles: Vec<Snowflake> = current
            .iter()
            .copied()
            .filter(|r| !self.remove.contains(r))
            .collect();
        for role in &self.add {
            if !roles.contains(role) {
                roles.push(*role);
            }
        }
        roles
    }
}

/// Reconcile a member's roles against the desired mapped role.
///
/// `universe` is the set of mapped roles that exist in the guild. Only roles
/// in the universe are ever added or removed; a `target` outside the universe
/// is treated as no target.
pub fn compute_role_delta(
    current: &[Snowflake],
    universe: &[Snowflake],
    target: Option<Snowflake>,
) -> RoleDelta {
    let target = target.filter(|t| universe.contains(t));

    let add = target
        .filter(|t| !current.contains(t))
        .into_iter()
        .collect();

    let mut remove: Vec<Snowflake> = Vec::new();
    for role in current {
        if universe.contains(role) && Some(*role) != target && !remove.contains(role) {
            remove.push(*role);
        }
    }

    RoleDelta { add, remove }
}
