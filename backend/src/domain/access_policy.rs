//! Schema visibility rules.
//!
//! The resolver asks the policy before revealing anything scoped to a
//! schema. A denied schema and a missing schema must look the same to the
//! caller, so the policy only answers yes or no.

use std::collections::{BTreeMap, BTreeSet};

use super::identifier::SchemaId;
use super::relation::Schema;
use super::viewer::{Role, Viewer};

/// Decides whether a viewer may see a schema.
#[cfg_attr(test, mockall::automock)]
pub trait AccessPolicy: Send + Sync {
    /// Deterministic in the viewer's role and the schema identity.
    fn can_view_schema(&self, viewer: &Viewer, schema: &Schema) -> bool;
}

/// Role-to-schema grant table.
///
/// # Examples
/// ```
/// use sqlegalize::domain::{
///     AccessPolicy, Role, RoleGrantPolicy, Schema, SchemaId, UserId, Viewer,
/// };
///
/// let market = Role::new("market").expect("role");
/// let policy = RoleGrantPolicy::default()
///     .grant(market.clone(), SchemaId::new("MARKET").expect("schema id"));
/// let viewer = Viewer::new(
///     UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("user id"),
///     market,
/// );
/// let schema = Schema {
///     id: SchemaId::new("MARKET").expect("schema id"),
///     name: "Market".to_owned(),
/// };
/// assert!(policy.can_view_schema(&viewer, &schema));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleGrantPolicy {
    grants: BTreeMap<Role, BTreeSet<SchemaId>>,
}

impl RoleGrantPolicy {
    /// Allow `role` to see `schema`.
    #[must_use]
    pub fn grant(mut self, role: Role, schema: SchemaId) -> Self {
        self.grants.entry(role).or_default().insert(schema);
        self
    }

    /// Schemas granted to `role`.
    pub fn schemas_for(&self, role: &Role) -> impl Iterator<Item = &SchemaId> {
        self.grants.get(role).into_iter().flatten()
    }

    /// Roles present in the table.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.grants.keys()
    }
}

impl AccessPolicy for RoleGrantPolicy {
    fn can_view_schema(&self, viewer: &Viewer, schema: &Schema) -> bool {
        self.grants
            .get(viewer.role())
            .is_some_and(|schemas| schemas.contains(&schema.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use rstest::{fixture, rstest};

    fn viewer(role: &str) -> Viewer {
        Viewer::new(
            UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("user id"),
            Role::new(role).expect("role"),
        )
    }

    fn schema(id: &str) -> Schema {
        Schema {
            id: SchemaId::new(id).expect("schema id"),
            name: id.to_owned(),
        }
    }

    #[fixture]
    fn policy() -> RoleGrantPolicy {
        RoleGrantPolicy::default()
            .grant(Role::new("market").expect("role"), SchemaId::new("MARKET").expect("id"))
            .grant(Role::new("hr").expect("role"), SchemaId::new("HR").expect("id"))
    }

    #[rstest]
    #[case("market", "MARKET", true)]
    #[case("market", "HR", false)]
    #[case("hr", "HR", true)]
    #[case("hr", "MARKET", false)]
    #[case("guest", "MARKET", false)]
    #[case("market", "UNKNOWN", false)]
    fn grants_decide_visibility(
        policy: RoleGrantPolicy,
        #[case] role: &str,
        #[case] schema_id: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(policy.can_view_schema(&viewer(role), &schema(schema_id)), expected);
    }

    #[rstest]
    fn schemas_for_unknown_role_is_empty(policy: RoleGrantPolicy) {
        let role = Role::new("guest").expect("role");
        assert_eq!(policy.schemas_for(&role).count(), 0);
    }
}
