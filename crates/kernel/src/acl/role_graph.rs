//! Role registry with single-parent inheritance.

use std::collections::HashMap;

use super::AclError;

#[derive(Debug, Clone)]
struct RoleEntry {
    id: String,
    parent: Option<usize>,
}

/// Registered roles and their parent links.
///
/// Roles form a forest. A parent must be registered before its children,
/// which keeps the graph acyclic by construction; traversal is still capped
/// at the number of registered roles.
#[derive(Debug, Clone, Default)]
pub struct RoleGraph {
    roles: Vec<RoleEntry>,
    index: HashMap<String, usize>,
}

impl RoleGraph {
    /// Create an empty role graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a role, optionally inheriting from an already registered parent.
    pub fn add_role(&mut self, id: &str, parent: Option<&str>) -> Result<(), AclError> {
        if self.index.contains_key(id) {
            return Err(AclError::duplicate_role(id));
        }

        let parent = match parent {
            Some(p) => Some(self.position(p)?),
            None => None,
        };

        self.index.insert(id.to_string(), self.roles.len());
        self.roles.push(RoleEntry {
            id: id.to_string(),
            parent,
        });
        Ok(())
    }

    /// Whether `id` is a registered role.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Parent of a registered role, if any.
    pub fn parent_of(&self, id: &str) -> Result<Option<&str>, AclError> {
        let pos = self.position(id)?;
        Ok(self.roles[pos].parent.map(|p| self.roles[p].id.as_str()))
    }

    /// Role identifiers in registration order.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|r| r.id.as_str())
    }

    /// The first registered role without a parent.
    pub fn first_root(&self) -> Option<&str> {
        self.roles
            .iter()
            .find(|r| r.parent.is_none())
            .map(|r| r.id.as_str())
    }

    /// `role` followed by each ancestor up to its root, nearest first.
    pub fn ancestry(&self, role: &str) -> Result<Vec<&str>, AclError> {
        let mut current = Some(self.position(role)?);
        let mut chain = Vec::new();

        while let Some(pos) = current {
            if chain.len() >= self.roles.len() {
                return Err(AclError::CycleDetected {
                    role: role.to_string(),
                    steps: chain.len(),
                });
            }
            let entry = &self.roles[pos];
            chain.push(entry.id.as_str());
            current = entry.parent;
        }

        Ok(chain)
    }

    /// Whether `ancestor` is `role` itself or appears on its parent chain.
    pub fn is_role_or_ancestor(&self, role: &str, ancestor: &str) -> Result<bool, AclError> {
        if !self.contains(ancestor) {
            return Err(AclError::unknown_role(ancestor));
        }
        Ok(self.ancestry(role)?.contains(&ancestor))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    fn position(&self, id: &str) -> Result<usize, AclError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| AclError::unknown_role(id))
    }

    /// Rewire a parent link without validation, to exercise the cycle guard.
    #[cfg(test)]
    fn force_parent(&mut self, id: &str, parent: &str) {
        let child = self.index[id];
        let parent = self.index[parent];
        self.roles[child].parent = Some(parent);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn chain() -> RoleGraph {
        let mut graph = RoleGraph::new();
        graph.add_role("guest", None).unwrap();
        graph.add_role("member", Some("guest")).unwrap();
        graph.add_role("admin", Some("member")).unwrap();
        graph
    }

    #[test]
    fn ancestry_is_nearest_first() {
        let graph = chain();
        assert_eq!(
            graph.ancestry("admin").unwrap(),
            vec!["admin", "member", "guest"]
        );
        assert_eq!(graph.ancestry("guest").unwrap(), vec!["guest"]);
    }

    #[test]
    fn role_includes_itself_and_ancestors() {
        let graph = chain();
        assert!(graph.is_role_or_ancestor("admin", "admin").unwrap());
        assert!(graph.is_role_or_ancestor("admin", "guest").unwrap());
        assert!(!graph.is_role_or_ancestor("guest", "member").unwrap());
    }

    #[test]
    fn duplicate_role_rejected() {
        let mut graph = chain();
        assert_eq!(
            graph.add_role("member", None),
            Err(AclError::duplicate_role("member"))
        );
    }

    #[test]
    fn parent_must_be_registered_first() {
        let mut graph = RoleGraph::new();
        assert_eq!(
            graph.add_role("member", Some("guest")),
            Err(AclError::unknown_role("guest"))
        );
        assert!(graph.is_empty());
    }

    #[test]
    fn unknown_role_queries_fail() {
        let graph = chain();
        assert!(matches!(
            graph.ancestry("root"),
            Err(AclError::UnknownRole { .. })
        ));
        assert!(matches!(
            graph.is_role_or_ancestor("admin", "root"),
            Err(AclError::UnknownRole { .. })
        ));
    }

    #[test]
    fn first_root_and_parent_lookup() {
        let graph = chain();
        assert_eq!(graph.first_root(), Some("guest"));
        assert_eq!(graph.parent_of("admin").unwrap(), Some("member"));
        assert_eq!(graph.parent_of("guest").unwrap(), None);
        assert_eq!(
            graph.roles().collect::<Vec<_>>(),
            vec!["guest", "member", "admin"]
        );
    }

    #[test]
    fn cycle_is_reported_instead_of_looping() {
        let mut graph = chain();
        graph.force_parent("guest", "admin");
        let err = graph.ancestry("member").unwrap_err();
        assert!(matches!(err, AclError::CycleDetected { steps: 3, .. }));
        assert!(matches!(
            graph.is_role_or_ancestor("member", "guest"),
            Err(AclError::CycleDetected { .. })
        ));
    }
}
