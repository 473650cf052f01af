//! In-memory resolver shared by the service tests.

use crate::ports::outbound::{DependencyResolution, DependencyResolver, UnresolvedDependency};
use crate::shared::error::CheckError;
use crate::shared::Result;
use crate::version_check::domain::{
    Artifact, ComparableVersion, Dependency, DependencyNode, ManagedBits, Project, ProjectKey,
    VersionConstraint,
};
use crate::version_check::policies::{DependencyFilter, StrategyProvider};
use crate::version_check::services::{CheckContext, CheckSettings, StrategyCache};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn dependency(artifact_id: &str, version: &str, scope: &str) -> Dependency {
    Dependency::new(Artifact::new("g", artifact_id, version), scope)
}

pub fn leaf(artifact_id: &str, version: &str, scope: &str) -> Arc<DependencyNode> {
    node(dependency(artifact_id, version, scope), vec![])
}

pub fn node(dependency: Dependency, children: Vec<Arc<DependencyNode>>) -> Arc<DependencyNode> {
    Arc::new(DependencyNode::new(dependency, ManagedBits::NONE, children))
}

pub fn managed(dependency: Dependency, children: Vec<Arc<DependencyNode>>) -> Arc<DependencyNode> {
    Arc::new(DependencyNode::new(dependency, ManagedBits::VERSION, children))
}

pub fn project(artifact_id: &str, dependencies: Vec<Dependency>) -> Project {
    Project::new(ProjectKey::new("g", artifact_id, "1.0"), "jar", dependencies)
}

#[derive(Default)]
pub struct InMemoryResolver {
    graphs: HashMap<ProjectKey, (Vec<Arc<DependencyNode>>, Vec<UnresolvedDependency>)>,
    projects: HashMap<ProjectKey, Project>,
    broken_models: HashSet<ProjectKey>,
    versions: HashMap<(String, String), Vec<ComparableVersion>>,
    resolve_calls: AtomicUsize,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the resolved children of the project with the given key.
    pub fn with_graph(mut self, key: ProjectKey, children: Vec<Arc<DependencyNode>>) -> Self {
        self.graphs.entry(key).or_default().0 = children;
        self
    }

    pub fn with_unresolved(mut self, key: ProjectKey, unresolved: UnresolvedDependency) -> Self {
        self.graphs.entry(key).or_default().1.push(unresolved);
        self
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.insert(project.key().clone(), project);
        self
    }

    pub fn with_broken_model(mut self, key: ProjectKey) -> Self {
        self.broken_models.insert(key);
        self
    }

    pub fn with_versions(mut self, artifact_id: &str, versions: &[&str]) -> Self {
        self.versions.insert(
            ("g".to_string(), artifact_id.to_string()),
            versions.iter().map(|v| ComparableVersion::new(v)).collect(),
        );
        self
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DependencyResolver for InMemoryResolver {
    async fn resolve_dependencies(
        &self,
        project: &Project,
        _filter: &dyn DependencyFilter,
    ) -> Result<DependencyResolution> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        let (children, unresolved) = self.graphs.get(project.key()).cloned().unwrap_or_default();
        let graph = Arc::new(DependencyNode::root(project.artifact(), children));
        Ok(DependencyResolution::new(graph, unresolved))
    }

    async fn build_project(&self, artifact: &Artifact) -> Result<Project> {
        let key = ProjectKey::of_artifact(artifact);
        if self.broken_models.contains(&key) {
            return Err(CheckError::ModelBuilding {
                artifact: artifact.to_string(),
                details: "Unknown packaging: bundle".to_string(),
            }
            .into());
        }
        Ok(self
            .projects
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Project::new(key, "jar", vec![])))
    }

    async fn resolve_version_range(&self, artifact: &Artifact) -> Result<Vec<ComparableVersion>> {
        let constraint = VersionConstraint::parse(artifact.version())?;
        let available = self
            .versions
            .get(&(artifact.group_id().to_string(), artifact.artifact_id().to_string()))
            .cloned()
            .unwrap_or_default();
        Ok(constraint.select(&available))
    }
}

pub fn context_with(
    resolver: Arc<InMemoryResolver>,
    root: Project,
    settings: CheckSettings,
) -> CheckContext {
    let strategy_cache = StrategyCache::new(&StrategyProvider::new(), &[], "default").unwrap();
    CheckContext::new(settings, vec![], strategy_cache, resolver, root, vec![])
}
