use crate::ports::outbound::UnresolvedDependency;
use crate::shared::error::CheckError;
use crate::shared::Result;
use crate::version_check::domain::{
    DependencyMap, DependencyNode, ManagedBits, Project, ProjectKey, QualifiedName,
};
use crate::version_check::policies::{DependencyFilter, Scope};
use crate::version_check::services::check_context::CheckContext;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Unresolved dependencies sorted by how a failed resolution treats them.
#[derive(Debug, Default)]
pub struct UnresolvedPartition {
    /// Reactor projects and tolerated `system` artifacts, treated as resolved
    pub recovered: Vec<UnresolvedDependency>,
    /// Artifacts from legacy-layout repositories, dropped with a warning
    pub legacy: Vec<UnresolvedDependency>,
    /// Everything else; any entry here fails the resolution
    pub fatal: Vec<UnresolvedDependency>,
}

impl UnresolvedPartition {
    pub fn of(context: &CheckContext, unresolved: Vec<UnresolvedDependency>) -> Self {
        let mut partition = Self::default();
        let system_tolerated = !context.settings().unresolved_system_artifacts_fail_build;

        for entry in unresolved {
            let artifact = entry.dependency.artifact();
            if context.is_reactor_project(&ProjectKey::of_artifact(artifact)) {
                partition.recovered.push(entry);
            } else if system_tolerated && entry.dependency.scope() == Scope::System.as_str() {
                partition.recovered.push(entry);
            } else if entry.repository.as_ref().is_some_and(|r| r.is_legacy()) {
                partition.legacy.push(entry);
            } else {
                partition.fatal.push(entry);
            }
        }
        partition
    }
}

/// Builds dependency maps by asking the resolver for a graph and flattening it.
pub struct DependencyMapBuilder<'a> {
    context: &'a CheckContext,
}

impl<'a> DependencyMapBuilder<'a> {
    /// Maximum depth followed while flattening a graph
    const MAX_RECURSION_DEPTH: usize = 100;

    pub fn new(context: &'a CheckContext) -> Self {
        Self { context }
    }

    /// Maps the graph of the project behind a dependency node
    ///
    /// # Errors
    /// Returns `CheckError::ModelBuilding` if the project model of the node's
    /// artifact cannot be built, or any error of [`Self::map_project`].
    pub async fn map_dependency(
        &self,
        node: &DependencyNode,
        filter: &dyn DependencyFilter,
    ) -> Result<DependencyMap> {
        let project = self
            .context
            .resolver()
            .build_project(&node.artifact().to_pom_artifact())
            .await?;
        self.map_project(&project, filter).await
    }

    /// Maps the resolved graph of a project
    ///
    /// # Arguments
    /// * `project` - The project to resolve
    /// * `filter` - Applied to every edge, both during resolution and flattening
    ///
    /// # Returns
    /// The project's direct dependencies plus every dependency reachable from them
    ///
    /// # Errors
    /// Returns `CheckError::UnresolvedDependencies` if an artifact could not be
    /// resolved and is neither a reactor project, a tolerated `system`
    /// artifact nor hosted in a legacy repository.
    pub async fn map_project(
        &self,
        project: &Project,
        filter: &dyn DependencyFilter,
    ) -> Result<DependencyMap> {
        let resolution = self
            .context
            .resolver()
            .resolve_dependencies(project, filter)
            .await?;

        let partition = UnresolvedPartition::of(self.context, resolution.unresolved);
        for entry in &partition.recovered {
            debug!(dependency = %entry.dependency, "Treating unresolved dependency as resolved");
        }
        if !partition.legacy.is_empty() {
            let dependencies = describe(&partition.legacy);
            let reasons: Vec<&str> = partition.legacy.iter().map(|e| e.reason.as_str()).collect();
            warn!(
                "Could not access a legacy repository for artifacts: [{}]; Reason: {}",
                dependencies.join(", "),
                reasons.join("; ")
            );
        }
        if !partition.fatal.is_empty() {
            return Err(CheckError::UnresolvedDependencies {
                dependencies: describe(&partition.fatal),
            }
            .into());
        }

        let mut all_dependencies = HashMap::new();
        let mut parents = Vec::new();
        let direct_dependencies = Self::load_dependency_tree(
            &resolution.graph,
            filter,
            &mut parents,
            &mut all_dependencies,
        );
        Ok(DependencyMap::new(all_dependencies, direct_dependencies))
    }

    /// Returns the accepted children of `node` and adds everything below
    /// them to `all_dependencies`. The first node seen for an identity wins.
    fn load_dependency_tree<'n>(
        node: &'n DependencyNode,
        filter: &dyn DependencyFilter,
        parents: &mut Vec<&'n DependencyNode>,
        all_dependencies: &mut HashMap<QualifiedName, Arc<DependencyNode>>,
    ) -> HashMap<QualifiedName, Arc<DependencyNode>> {
        let mut direct_dependencies = HashMap::new();
        if parents.len() >= Self::MAX_RECURSION_DEPTH {
            warn!(
                artifact = %node.artifact(),
                "Maximum dependency depth of {} reached, ignoring deeper dependencies",
                Self::MAX_RECURSION_DEPTH
            );
            return direct_dependencies;
        }

        parents.push(node);
        for child in node.children() {
            log_managed_bits(child);

            if !filter.accept(child, parents) {
                continue;
            }
            direct_dependencies
                .entry(QualifiedName::from_node(child))
                .or_insert_with(|| Arc::clone(child));

            let descendants = Self::load_dependency_tree(child, filter, parents, all_dependencies);
            for (name, descendant) in descendants {
                all_dependencies.entry(name).or_insert(descendant);
            }
        }
        parents.pop();

        direct_dependencies
    }
}

fn describe(entries: &[UnresolvedDependency]) -> Vec<String> {
    entries.iter().map(|e| e.dependency.to_string()).collect()
}

fn log_managed_bits(node: &DependencyNode) {
    let bits = node.managed_bits();
    if bits.is_empty() {
        return;
    }
    let labels = [
        (ManagedBits::VERSION, "version"),
        (ManagedBits::SCOPE, "scope"),
        (ManagedBits::OPTIONAL, "optional"),
        (ManagedBits::PROPERTIES, "properties"),
        (ManagedBits::EXCLUSIONS, "exclusions"),
    ];
    for (flag, label) in labels {
        if bits.contains(flag) {
            debug!(artifact = %node.artifact(), "Managed {}", label);
        }
    }
}
