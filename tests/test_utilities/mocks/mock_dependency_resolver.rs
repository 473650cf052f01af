use async_trait::async_trait;
use dependency_versions_check::prelude::*;
use dependency_versions_check::version_check::domain::VersionConstraint;
use std::collections::HashMap;
use std::sync::Arc;

/// Mock DependencyResolver and ProjectReader backed by in-memory graphs
///
/// Every artifact lives in the `com.example` group.
pub struct MockDependencyResolver {
    root: Project,
    graphs: HashMap<ProjectKey, Vec<Arc<DependencyNode>>>,
    unresolved: HashMap<ProjectKey, Vec<UnresolvedDependency>>,
    versions: HashMap<String, Vec<ComparableVersion>>,
    should_fail: bool,
}

#[allow(dead_code)]
impl MockDependencyResolver {
    pub fn new(root: Project) -> Self {
        Self {
            root,
            graphs: HashMap::new(),
            unresolved: HashMap::new(),
            versions: HashMap::new(),
            should_fail: false,
        }
    }

    pub fn dependency(artifact_id: &str, version: &str, scope: &str) -> Dependency {
        Dependency::new(Artifact::new("com.example", artifact_id, version), scope)
    }

    pub fn key(artifact_id: &str, version: &str) -> ProjectKey {
        ProjectKey::new("com.example", artifact_id, version)
    }

    pub fn node(
        artifact_id: &str,
        version: &str,
        scope: &str,
        children: Vec<Arc<DependencyNode>>,
    ) -> Arc<DependencyNode> {
        Arc::new(DependencyNode::new(
            Self::dependency(artifact_id, version, scope),
            ManagedBits::NONE,
            children,
        ))
    }

    pub fn managed_node(artifact_id: &str, version: &str, scope: &str) -> Arc<DependencyNode> {
        Arc::new(DependencyNode::new(
            Self::dependency(artifact_id, version, scope),
            ManagedBits::VERSION,
            vec![],
        ))
    }

    /// Registers the resolved children of the project with the given key.
    pub fn with_graph(mut self, key: ProjectKey, children: Vec<Arc<DependencyNode>>) -> Self {
        self.graphs.insert(key, children);
        self
    }

    pub fn with_unresolved(mut self, key: ProjectKey, dependency: Dependency) -> Self {
        self.unresolved
            .entry(key)
            .or_default()
            .push(UnresolvedDependency {
                dependency,
                repository: None,
                reason: "Could not find artifact".to_string(),
            });
        self
    }

    pub fn with_versions(mut self, artifact_id: &str, versions: &[&str]) -> Self {
        self.versions.insert(
            artifact_id.to_string(),
            versions.iter().map(|v| ComparableVersion::new(v)).collect(),
        );
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl DependencyResolver for MockDependencyResolver {
    async fn resolve_dependencies(
        &self,
        project: &Project,
        _filter: &dyn DependencyFilter,
    ) -> Result<DependencyResolution> {
        if self.should_fail {
            anyhow::bail!("Repository unreachable");
        }
        let children = self.graphs.get(project.key()).cloned().unwrap_or_default();
        let unresolved = self
            .unresolved
            .get(project.key())
            .cloned()
            .unwrap_or_default();
        Ok(DependencyResolution::new(
            Arc::new(DependencyNode::root(project.artifact(), children)),
            unresolved,
        ))
    }

    async fn build_project(&self, artifact: &Artifact) -> Result<Project> {
        Ok(Project::new(ProjectKey::of_artifact(artifact), "jar", vec![]))
    }

    async fn resolve_version_range(&self, artifact: &Artifact) -> Result<Vec<ComparableVersion>> {
        let constraint = VersionConstraint::parse(artifact.version())?;
        let available = self
            .versions
            .get(artifact.artifact_id())
            .cloned()
            .unwrap_or_default();
        Ok(constraint.select(&available))
    }
}

impl ProjectReader for MockDependencyResolver {
    fn read_project(&self) -> Result<Project> {
        Ok(self.root.clone())
    }

    fn read_reactor_projects(&self) -> Result<Vec<ProjectKey>> {
        Ok(vec![self.root.key().clone()])
    }
}
