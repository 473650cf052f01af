use crate::shared::Result;
use crate::version_check::domain::{Artifact, ComparableVersion, Dependency, DependencyNode, Project};
use crate::version_check::policies::DependencyFilter;
use async_trait::async_trait;
use std::sync::Arc;

/// Content type of repositories using the pre-Maven 2 layout.
pub const LEGACY_REPOSITORY_CONTENT_TYPE: &str = "legacy";

/// Remote repository an artifact was requested from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub id: String,
    pub content_type: String,
}

impl RemoteRepository {
    pub fn new(id: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content_type: content_type.into(),
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.content_type == LEGACY_REPOSITORY_CONTENT_TYPE
    }
}

/// A dependency whose artifact could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedDependency {
    pub dependency: Dependency,
    /// Repository that failed to deliver the artifact, if known
    pub repository: Option<RemoteRepository>,
    pub reason: String,
}

/// Outcome of resolving a project's dependency graph.
///
/// Resolution may be partial: the graph holds every node that could be
/// collected and `unresolved` lists the artifacts that could not be fetched.
#[derive(Debug, Clone)]
pub struct DependencyResolution {
    pub graph: Arc<DependencyNode>,
    pub unresolved: Vec<UnresolvedDependency>,
}

impl DependencyResolution {
    pub fn new(graph: Arc<DependencyNode>, unresolved: Vec<UnresolvedDependency>) -> Self {
        Self { graph, unresolved }
    }
}

/// DependencyResolver port for the external build tool's resolution machinery
///
/// This port abstracts collecting dependency graphs, reading project models
/// of arbitrary artifacts and resolving declared version ranges.
///
/// # Async Support
/// All methods are async so many dependencies can be resolved concurrently.
/// Implementations must be `Send + Sync` to support concurrent access.
#[async_trait]
pub trait DependencyResolver: Send + Sync {
    /// Collects and resolves the dependency graph of a project
    ///
    /// # Arguments
    /// * `project` - The project whose declared dependencies are the graph roots
    /// * `filter` - Decides which edges are followed during collection
    ///
    /// # Returns
    /// The graph rooted at the project, plus every artifact that failed to resolve
    ///
    /// # Errors
    /// Returns an error if the graph cannot be collected at all
    async fn resolve_dependencies(
        &self,
        project: &Project,
        filter: &dyn DependencyFilter,
    ) -> Result<DependencyResolution>;

    /// Builds the project model described by a `pom` artifact
    ///
    /// # Arguments
    /// * `artifact` - The `pom` artifact of the project
    ///
    /// # Errors
    /// Returns `CheckError::ModelBuilding` if the model cannot be read or built
    async fn build_project(&self, artifact: &Artifact) -> Result<Project>;

    /// Lists the available versions satisfying the artifact's version specification
    ///
    /// # Arguments
    /// * `artifact` - An artifact whose version may be a range such as `[1.0,2.0)`
    ///
    /// # Returns
    /// The matching versions in ascending order
    ///
    /// # Errors
    /// Returns an error if the version specification is invalid or the
    /// available versions cannot be listed
    async fn resolve_version_range(&self, artifact: &Artifact) -> Result<Vec<ComparableVersion>>;
}
