use super::model::{GraphSnapshot, NodeModel, UnresolvedModel};
use crate::ports::outbound::{
    DependencyResolution, DependencyResolver, ProjectReader, UnresolvedDependency,
};
use crate::shared::error::CheckError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use crate::version_check::domain::{
    Artifact, ComparableVersion, DependencyNode, ManagedBits, Project, ProjectKey,
    VersionConstraint,
};
use crate::version_check::policies::DependencyFilter;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Resolved children and unresolved entries of one project's graph
#[derive(Debug, Clone, Default)]
struct ResolvedGraph {
    children: Vec<Arc<DependencyNode>>,
    unresolved: Vec<UnresolvedDependency>,
}

#[derive(Debug, Clone)]
enum ProjectModelEntry {
    Built(Project),
    Broken(String),
}

/// GraphSnapshotResolver adapter serving resolution results from a snapshot file
///
/// Implements both the DependencyResolver and the ProjectReader ports, so
/// a version check can run against a graph exported by the build tool.
///
/// Artifacts without an entry in the snapshot are treated as `jar`
/// projects without dependencies.
#[derive(Debug)]
pub struct GraphSnapshotResolver {
    source: PathBuf,
    root: Project,
    reactor: Vec<ProjectKey>,
    graphs: HashMap<ProjectKey, ResolvedGraph>,
    models: HashMap<ProjectKey, ProjectModelEntry>,
    available_versions: HashMap<(String, String), Vec<ComparableVersion>>,
}

impl GraphSnapshotResolver {
    /// Loads a snapshot file
    ///
    /// # Errors
    /// Returns `CheckError::FileReadError` if the file cannot be read safely,
    /// or `CheckError::GraphSnapshotError` if it is not a valid snapshot.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            read_regular_file(path, "graph snapshot").map_err(|e| CheckError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;
        Self::from_json(&content, path)
    }

    /// Parses snapshot content; `source` is only used in error messages
    pub fn from_json(content: &str, source: &Path) -> Result<Self> {
        let snapshot: GraphSnapshot =
            serde_json::from_str(content).map_err(|e| CheckError::GraphSnapshotError {
                path: source.to_path_buf(),
                details: e.to_string(),
            })?;
        Self::from_snapshot(snapshot, source)
    }

    fn from_snapshot(snapshot: GraphSnapshot, source: &Path) -> Result<Self> {
        let invalid = |details: String| -> anyhow::Error {
            CheckError::GraphSnapshotError {
                path: source.to_path_buf(),
                details,
            }
            .into()
        };

        let root = snapshot.project.to_project();
        let mut reactor: Vec<ProjectKey> = snapshot.reactor.iter().map(|c| c.to_key()).collect();
        if reactor.is_empty() {
            reactor.push(root.key().clone());
        }

        let mut graphs = HashMap::new();
        graphs.insert(
            root.key().clone(),
            resolved_graph(&snapshot.graph, &snapshot.unresolved),
        );

        let mut models = HashMap::new();
        for artifact in &snapshot.artifacts {
            let key = artifact.project.coordinates.to_key();
            if key == *root.key() || models.contains_key(&key) {
                return Err(invalid(format!("Artifact {} is listed more than once", key)));
            }

            let entry = match &artifact.model_error {
                Some(error) => ProjectModelEntry::Broken(error.clone()),
                None => ProjectModelEntry::Built(artifact.project.to_project()),
            };
            models.insert(key.clone(), entry);
            graphs.insert(key, resolved_graph(&artifact.graph, &artifact.unresolved));
        }

        let mut available_versions = HashMap::new();
        for (name, versions) in &snapshot.available_versions {
            let (group_id, artifact_id) = match name.split_once(':') {
                Some((group_id, artifact_id))
                    if !group_id.is_empty()
                        && !artifact_id.is_empty()
                        && !artifact_id.contains(':') =>
                {
                    (group_id.to_string(), artifact_id.to_string())
                }
                _ => {
                    return Err(invalid(format!(
                        "Available versions key '{}' must have the form 'group:artifact'",
                        name
                    )))
                }
            };
            let mut parsed: Vec<ComparableVersion> =
                versions.iter().map(|v| ComparableVersion::new(v)).collect();
            parsed.sort();
            parsed.dedup();
            available_versions.insert((group_id, artifact_id), parsed);
        }

        debug!(
            project = %root.key(),
            artifacts = models.len(),
            "Loaded graph snapshot from {}",
            source.display()
        );

        Ok(Self {
            source: source.to_path_buf(),
            root,
            reactor,
            graphs,
            models,
            available_versions,
        })
    }

    /// Path the snapshot was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }
}

fn resolved_graph(graph: &[NodeModel], unresolved: &[UnresolvedModel]) -> ResolvedGraph {
    ResolvedGraph {
        children: graph.iter().map(NodeModel::to_node).collect(),
        unresolved: unresolved.iter().map(UnresolvedModel::to_unresolved).collect(),
    }
}

#[async_trait]
impl DependencyResolver for GraphSnapshotResolver {
    /// Returns the stored graph of the project
    ///
    /// Graph edges are returned as recorded; the filter only drops
    /// unresolved entries whose edge it would not have followed.
    async fn resolve_dependencies(
        &self,
        project: &Project,
        filter: &dyn DependencyFilter,
    ) -> Result<DependencyResolution> {
        let graph = self.graphs.get(project.key()).cloned().unwrap_or_else(|| {
            debug!(project = %project.key(), "No graph recorded, assuming no dependencies");
            ResolvedGraph::default()
        });

        let root = DependencyNode::root(project.artifact(), graph.children);
        let unresolved = graph
            .unresolved
            .into_iter()
            .filter(|entry| {
                let node = DependencyNode::new(entry.dependency.clone(), ManagedBits::NONE, vec![]);
                filter.accept(&node, &[&root])
            })
            .collect();

        Ok(DependencyResolution::new(Arc::new(root), unresolved))
    }

    async fn build_project(&self, artifact: &Artifact) -> Result<Project> {
        let key = ProjectKey::of_artifact(artifact);
        if key == *self.root.key() {
            return Ok(self.root.clone());
        }

        match self.models.get(&key) {
            Some(ProjectModelEntry::Built(project)) => Ok(project.clone()),
            Some(ProjectModelEntry::Broken(details)) => Err(CheckError::ModelBuilding {
                artifact: artifact.to_string(),
                details: details.clone(),
            }
            .into()),
            None => Ok(Project::new(key, "jar", vec![])),
        }
    }

    async fn resolve_version_range(&self, artifact: &Artifact) -> Result<Vec<ComparableVersion>> {
        let constraint = VersionConstraint::parse(artifact.version())?;
        let available = self
            .available_versions
            .get(&(
                artifact.group_id().to_string(),
                artifact.artifact_id().to_string(),
            ))
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(constraint.select(available))
    }
}

impl ProjectReader for GraphSnapshotResolver {
    fn read_project(&self) -> Result<Project> {
        Ok(self.root.clone())
    }

    fn read_reactor_projects(&self) -> Result<Vec<ProjectKey>> {
        Ok(self.reactor.clone())
    }
}
