use crate::version_check::domain::artifact::DependencyNode;
use crate::version_check::domain::qualified_name::QualifiedName;
use std::collections::HashMap;
use std::sync::Arc;

/// Identities reachable from one root, plus the subset declared directly by it.
///
/// Built once by the dependency map builder and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct DependencyMap {
    all: HashMap<QualifiedName, Arc<DependencyNode>>,
    direct: HashMap<QualifiedName, Arc<DependencyNode>>,
}

impl DependencyMap {
    /// Creates a map. Direct dependencies are added to the full map, taking
    /// precedence over a deeper node with the same identity.
    pub fn new(
        mut all: HashMap<QualifiedName, Arc<DependencyNode>>,
        direct: HashMap<QualifiedName, Arc<DependencyNode>>,
    ) -> Self {
        for (name, node) in &direct {
            all.insert(name.clone(), Arc::clone(node));
        }
        Self { all, direct }
    }

    pub fn all_dependencies(&self) -> &HashMap<QualifiedName, Arc<DependencyNode>> {
        &self.all
    }

    pub fn direct_dependencies(&self) -> &HashMap<QualifiedName, Arc<DependencyNode>> {
        &self.direct
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&Arc<DependencyNode>> {
        self.all.get(name)
    }

    pub fn get_direct(&self, name: &QualifiedName) -> Option<&Arc<DependencyNode>> {
        self.direct.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }
}
