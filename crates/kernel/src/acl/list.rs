//! Access control list: resources plus ordered allow/deny rules.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AclError, RoleGraph};

/// Outcome carried by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

/// A single allow/deny rule. `privilege: None` covers every privilege.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub role: String,
    pub resource: String,
    pub privilege: Option<String>,
    pub effect: Effect,
}

/// Result of evaluating a query, with the rule that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision<'a> {
    pub allowed: bool,
    /// `None` when no rule matched anywhere on the role chain (default deny).
    pub rule: Option<&'a Rule>,
}

/// Role graph, flat resource set and rule list.
///
/// Resources carry no hierarchy: a rule on `page:products` says nothing
/// about `page:products.software`. Only role inheritance is consulted.
#[derive(Debug, Clone, Default)]
pub struct AccessControlList {
    roles: RoleGraph,
    resources: HashSet<String>,
    /// Rules grouped by resource, each group in insertion order.
    rules: HashMap<String, Vec<Rule>>,
    rule_count: usize,
}

impl AccessControlList {
    /// Create an empty ACL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a role. See [`RoleGraph::add_role`].
    pub fn add_role(&mut self, id: &str, parent: Option<&str>) -> Result<(), AclError> {
        self.roles.add_role(id, parent)
    }

    /// Register a resource.
    pub fn add_resource(&mut self, id: &str) -> Result<(), AclError> {
        if !self.resources.insert(id.to_string()) {
            return Err(AclError::duplicate_resource(id));
        }
        Ok(())
    }

    /// Append an allow rule.
    pub fn allow(
        &mut self,
        role: &str,
        resource: &str,
        privilege: Option<&str>,
    ) -> Result<(), AclError> {
        self.add_rule(role, resource, privilege, Effect::Allow)
    }

    /// Append a deny rule.
    pub fn deny(
        &mut self,
        role: &str,
        resource: &str,
        privilege: Option<&str>,
    ) -> Result<(), AclError> {
        self.add_rule(role, resource, privilege, Effect::Deny)
    }

    /// Append a rule with an explicit effect.
    pub fn add_rule(
        &mut self,
        role: &str,
        resource: &str,
        privilege: Option<&str>,
        effect: Effect,
    ) -> Result<(), AclError> {
        if !self.roles.contains(role) {
            return Err(AclError::unknown_role(role));
        }
        if !self.resources.contains(resource) {
            return Err(AclError::unknown_resource(resource));
        }

        debug!(role, resource, ?privilege, ?effect, "adding acl rule");
        self.rules
            .entry(resource.to_string())
            .or_default()
            .push(Rule {
                role: role.to_string(),
                resource: resource.to_string(),
                privilege: privilege.map(str::to_string),
                effect,
            });
        self.rule_count += 1;
        Ok(())
    }

    /// Whether `role` may exercise `privilege` on `resource`.
    ///
    /// `privilege: None` asks about all privileges and is only answered by
    /// rules that themselves carry no privilege.
    pub fn is_allowed(
        &self,
        role: &str,
        resource: &str,
        privilege: Option<&str>,
    ) -> Result<bool, AclError> {
        Ok(self.evaluate(role, resource, privilege)?.allowed)
    }

    /// Evaluate a query and report which rule decided it.
    ///
    /// Role levels are visited nearest first (`role`, its parent, ... root).
    /// The first level holding a matching rule decides. Within a level an
    /// exact-privilege rule beats a privilege-less one, and among rules of
    /// equal specificity the one added last wins. No match means deny.
    pub fn evaluate(
        &self,
        role: &str,
        resource: &str,
        privilege: Option<&str>,
    ) -> Result<Decision<'_>, AclError> {
        if !self.resources.contains(resource) {
            return Err(AclError::unknown_resource(resource));
        }
        let chain = self.roles.ancestry(role)?;
        let rules = self
            .rules
            .get(resource)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for level in chain {
            if let Some(rule) = decide_level(rules, level, privilege) {
                return Ok(Decision {
                    allowed: rule.effect == Effect::Allow,
                    rule: Some(rule),
                });
            }
        }

        Ok(Decision {
            allowed: false,
            rule: None,
        })
    }

    /// The role graph backing this ACL.
    pub fn roles(&self) -> &RoleGraph {
        &self.roles
    }

    /// Whether `id` is a registered resource.
    pub fn has_resource(&self, id: &str) -> bool {
        self.resources.contains(id)
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rule_count
    }
}

/// Pick the deciding rule for one role level, if any rule matches.
fn decide_level<'a>(rules: &'a [Rule], role: &str, privilege: Option<&str>) -> Option<&'a Rule> {
    let mut exact = None;
    let mut wildcard = None;

    for rule in rules.iter().filter(|r| r.role == role) {
        match (rule.privilege.as_deref(), privilege) {
            (None, _) => wildcard = Some(rule),
            (Some(p), Some(q)) if p == q => exact = Some(rule),
            _ => {}
        }
    }

    exact.or(wildcard)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const X: &str = "page:x";

    fn acl() -> AccessControlList {
        let mut acl = AccessControlList::new();
        acl.add_role("guest", None).unwrap();
        acl.add_role("member", Some("guest")).unwrap();
        acl.add_role("admin", Some("member")).unwrap();
        acl.add_resource(X).unwrap();
        acl
    }

    #[test]
    fn default_deny_without_rules() {
        let acl = acl();
        for role in ["guest", "member", "admin"] {
            assert!(!acl.is_allowed(role, X, None).unwrap());
            assert!(!acl.is_allowed(role, X, Some("view")).unwrap());
        }
        assert_eq!(acl.evaluate("admin", X, None).unwrap().rule, None);
    }

    #[test]
    fn guest_allow_is_inherited() {
        let mut acl = acl();
        acl.allow("guest", X, None).unwrap();
        for role in ["guest", "member", "admin"] {
            assert!(acl.is_allowed(role, X, None).unwrap());
            assert!(acl.is_allowed(role, X, Some("edit")).unwrap());
        }
    }

    #[test]
    fn privilege_allow_does_not_grant_other_privileges() {
        let mut acl = acl();
        acl.allow("member", X, Some("view")).unwrap();
        assert!(acl.is_allowed("member", X, Some("view")).unwrap());
        assert!(!acl.is_allowed("member", X, Some("edit")).unwrap());
        assert!(!acl.is_allowed("member", X, None).unwrap());
        assert!(!acl.is_allowed("guest", X, Some("view")).unwrap());
    }

    #[test]
    fn nearer_role_overrides_inherited_rule() {
        let mut acl = acl();
        acl.allow("guest", X, None).unwrap();
        acl.deny("member", X, None).unwrap();
        assert!(acl.is_allowed("guest", X, Some("view")).unwrap());
        assert!(!acl.is_allowed("member", X, Some("view")).unwrap());
        assert!(!acl.is_allowed("admin", X, Some("view")).unwrap());
    }

    #[test]
    fn exact_privilege_beats_wildcard_at_same_level() {
        let mut acl = acl();
        acl.deny("member", X, Some("edit")).unwrap();
        acl.allow("member", X, None).unwrap();
        assert!(!acl.is_allowed("member", X, Some("edit")).unwrap());
        assert!(acl.is_allowed("member", X, Some("view")).unwrap());
    }

    #[test]
    fn latest_rule_of_equal_specificity_wins() {
        let mut acl = acl();
        acl.allow("member", X, Some("view")).unwrap();
        acl.deny("member", X, Some("view")).unwrap();
        assert!(!acl.is_allowed("member", X, Some("view")).unwrap());

        acl.allow("member", X, Some("view")).unwrap();
        assert!(acl.is_allowed("member", X, Some("view")).unwrap());
        assert_eq!(acl.rule_count(), 3);
    }

    #[test]
    fn resources_do_not_inherit_by_name() {
        let mut acl = acl();
        acl.add_resource("page:x.child").unwrap();
        acl.allow("guest", X, None).unwrap();
        assert!(!acl.is_allowed("guest", "page:x.child", None).unwrap());
    }

    #[test]
    fn unregistered_names_are_errors() {
        let mut acl = acl();
        assert_eq!(
            acl.allow("root", X, None),
            Err(AclError::unknown_role("root"))
        );
        assert_eq!(
            acl.deny("guest", "page:missing", None),
            Err(AclError::unknown_resource("page:missing"))
        );
        assert_eq!(acl.add_resource(X), Err(AclError::duplicate_resource(X)));
        assert!(matches!(
            acl.is_allowed("root", X, None),
            Err(AclError::UnknownRole { .. })
        ));
        assert!(matches!(
            acl.is_allowed("guest", "page:missing", None),
            Err(AclError::UnknownResource { .. })
        ));
    }

    #[test]
    fn decision_reports_deciding_rule() {
        let mut acl = acl();
        acl.allow("guest", X, None).unwrap();
        let decision = acl.evaluate("admin", X, Some("view")).unwrap();
        assert!(decision.allowed);
        let rule = decision.rule.unwrap();
        assert_eq!(rule.role, "guest");
        assert_eq!(rule.effect, Effect::Allow);
    }
}
