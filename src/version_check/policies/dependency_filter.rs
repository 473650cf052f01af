use crate::version_check::domain::{DependencyNode, Exclusion};

/// Decides whether a graph edge is followed while building dependency maps.
///
/// Filters are shared across resolution tasks and handed to the external
/// resolver, so they must be `Send + Sync`.
pub trait DependencyFilter: Send + Sync {
    /// Returns true if `node` should be kept.
    ///
    /// # Arguments
    /// * `node` - The node reached through the edge
    /// * `parents` - The path from the graph root to the node's parent, nearest last
    fn accept(&self, node: &DependencyNode, parents: &[&DependencyNode]) -> bool;
}

/// Accepts a node only if both filters accept it.
#[derive(Debug, Clone)]
pub struct AndDependencyFilter<A, B> {
    first: A,
    second: B,
}

impl<A, B> AndDependencyFilter<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> DependencyFilter for AndDependencyFilter<A, B>
where
    A: DependencyFilter,
    B: DependencyFilter,
{
    fn accept(&self, node: &DependencyNode, parents: &[&DependencyNode]) -> bool {
        self.first.accept(node, parents) && self.second.accept(node, parents)
    }
}

/// Rejects nodes matching any exclusion declared on a dependency.
#[derive(Debug, Clone, Default)]
pub struct CheckExclusionsFilter {
    exclusions: Vec<Exclusion>,
}

impl CheckExclusionsFilter {
    pub fn new(exclusions: &[Exclusion]) -> Self {
        Self {
            exclusions: exclusions.to_vec(),
        }
    }
}

impl DependencyFilter for CheckExclusionsFilter {
    fn accept(&self, node: &DependencyNode, _parents: &[&DependencyNode]) -> bool {
        !self
            .exclusions
            .iter()
            .any(|exclusion| exclusion.matches(node.artifact()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version_check::domain::{Artifact, Dependency, ManagedBits};

    fn node(group_id: &str, artifact_id: &str) -> DependencyNode {
        DependencyNode::new(
            Dependency::new(Artifact::new(group_id, artifact_id, "1.0"), "compile"),
            ManagedBits::NONE,
            vec![],
        )
    }

    struct RejectAll;

    impl DependencyFilter for RejectAll {
        fn accept(&self, _node: &DependencyNode, _parents: &[&DependencyNode]) -> bool {
            false
        }
    }

    #[test]
    fn test_no_exclusions_accepts_everything() {
        let filter = CheckExclusionsFilter::default();
        assert!(filter.accept(&node("g", "a"), &[]));
    }

    #[test]
    fn test_wildcard_exclusion_rejects_everything() {
        let filter = CheckExclusionsFilter::new(&[Exclusion::new("*", "*")]);
        assert!(!filter.accept(&node("g", "a"), &[]));
        assert!(!filter.accept(&node("other", "b"), &[]));
    }

    #[test]
    fn test_every_exclusion_is_checked() {
        // Only checking the first exclusion would let g:b through.
        let filter = CheckExclusionsFilter::new(&[
            Exclusion::new("g", "a"),
            Exclusion::new("g", "b"),
        ]);
        assert!(!filter.accept(&node("g", "a"), &[]));
        assert!(!filter.accept(&node("g", "b"), &[]));
        assert!(filter.accept(&node("g", "c"), &[]));
    }

    #[test]
    fn test_wildcard_after_specific_exclusion_is_honored() {
        let filter = CheckExclusionsFilter::new(&[
            Exclusion::new("org.example", "first"),
            Exclusion::new("*", "*"),
        ]);
        assert!(!filter.accept(&node("g", "anything"), &[]));
    }

    #[test]
    fn test_and_filter_requires_both() {
        let exclusions = CheckExclusionsFilter::new(&[Exclusion::new("g", "a")]);
        let filter = AndDependencyFilter::new(exclusions.clone(), CheckExclusionsFilter::default());
        assert!(!filter.accept(&node("g", "a"), &[]));
        assert!(filter.accept(&node("g", "b"), &[]));

        let rejecting = AndDependencyFilter::new(exclusions, RejectAll);
        assert!(!rejecting.accept(&node("g", "b"), &[]));
    }
}
