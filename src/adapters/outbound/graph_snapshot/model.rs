//! Serde model of a dependency graph snapshot file.
//!
//! A snapshot is the JSON export of everything the build tool resolved for a
//! project: the project itself, its reactor, its resolved graph, the project
//! models and graphs of the artifacts it depends on, and the versions
//! available for each `group:artifact`.

use crate::ports::outbound::{RemoteRepository, UnresolvedDependency};
use crate::version_check::domain::{
    Artifact, Dependency, DependencyNode, Exclusion, ManagedBits, Project, ProjectKey,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

fn default_packaging() -> String {
    "jar".to_string()
}

fn default_scope() -> String {
    "compile".to_string()
}

fn default_content_type() -> String {
    "default".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub project: ProjectModel,
    #[serde(default)]
    pub reactor: Vec<CoordinatesModel>,
    /// Resolved children of the project
    #[serde(default)]
    pub graph: Vec<NodeModel>,
    #[serde(default)]
    pub unresolved: Vec<UnresolvedModel>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactModel>,
    /// Keyed by `group:artifact`
    #[serde(default)]
    pub available_versions: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatesModel {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl CoordinatesModel {
    pub fn to_key(&self) -> ProjectKey {
        ProjectKey::new(&self.group_id, &self.artifact_id, &self.version)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectModel {
    #[serde(flatten)]
    pub coordinates: CoordinatesModel,
    #[serde(default = "default_packaging")]
    pub packaging: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyModel>,
}

impl ProjectModel {
    pub fn to_project(&self) -> Project {
        Project::new(
            self.coordinates.to_key(),
            &self.packaging,
            self.dependencies.iter().map(DependencyModel::to_dependency).collect(),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionModel {
    pub group_id: String,
    pub artifact_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyModel {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(rename = "type", default = "default_packaging")]
    pub artifact_type: String,
    #[serde(default)]
    pub classifier: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub exclusions: Vec<ExclusionModel>,
}

impl DependencyModel {
    pub fn to_dependency(&self) -> Dependency {
        let mut artifact = Artifact::new(&self.group_id, &self.artifact_id, &self.version)
            .with_type(&self.artifact_type);
        if !self.classifier.is_empty() {
            artifact = artifact.with_classifier(&self.classifier);
        }
        Dependency::new(artifact, &self.scope)
            .with_optional(self.optional)
            .with_exclusions(
                self.exclusions
                    .iter()
                    .map(|e| Exclusion::new(&e.group_id, &e.artifact_id))
                    .collect(),
            )
    }
}

/// A resolved graph node: the edge that pulled it in, what dependency
/// management overrode on it, and its own resolved children.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeModel {
    #[serde(flatten)]
    pub dependency: DependencyModel,
    #[serde(default)]
    pub managed: Vec<String>,
    #[serde(default)]
    pub children: Vec<NodeModel>,
}

impl NodeModel {
    pub fn to_node(&self) -> Arc<DependencyNode> {
        let dependency = self.dependency.to_dependency();
        let managed = self
            .managed
            .iter()
            .fold(ManagedBits::NONE, |bits, name| match ManagedBits::from_name(name) {
                Some(bit) => bits | bit,
                None => {
                    warn!(artifact = %dependency.artifact(), "Ignoring unknown managed attribute '{}'", name);
                    bits
                }
            });
        let children = self.children.iter().map(NodeModel::to_node).collect();
        Arc::new(DependencyNode::new(dependency, managed, children))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryModel {
    pub id: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedModel {
    #[serde(flatten)]
    pub dependency: DependencyModel,
    #[serde(default)]
    pub repository: Option<RepositoryModel>,
    #[serde(default)]
    pub reason: String,
}

impl UnresolvedModel {
    pub fn to_unresolved(&self) -> UnresolvedDependency {
        UnresolvedDependency {
            dependency: self.dependency.to_dependency(),
            repository: self
                .repository
                .as_ref()
                .map(|r| RemoteRepository::new(&r.id, &r.content_type)),
            reason: self.reason.clone(),
        }
    }
}

/// Project model and resolved graph of an artifact the project depends on.
///
/// `model_error` marks an artifact whose project model could not be built.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactModel {
    #[serde(flatten)]
    pub project: ProjectModel,
    #[serde(default)]
    pub graph: Vec<NodeModel>,
    #[serde(default)]
    pub unresolved: Vec<UnresolvedModel>,
    #[serde(default)]
    pub model_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_defaults() {
        let model: DependencyModel = serde_json::from_str(
            r#"{"groupId": "g", "artifactId": "a", "version": "1.0"}"#,
        )
        .unwrap();
        let dependency = model.to_dependency();

        assert_eq!(dependency.scope(), "compile");
        assert!(!dependency.is_optional());
        assert_eq!(dependency.artifact().artifact_type(), "jar");
        assert_eq!(dependency.artifact().classifier(), "");
    }

    #[test]
    fn test_node_with_managed_bits_and_children() {
        let model: NodeModel = serde_json::from_str(
            r#"{
                "groupId": "g", "artifactId": "a", "version": "2.0", "scope": "runtime",
                "classifier": "tests", "type": "test-jar",
                "managed": ["version", "SCOPE", "bogus"],
                "children": [{"groupId": "g", "artifactId": "b", "version": "1.0", "optional": true}]
            }"#,
        )
        .unwrap();
        let node = model.to_node();

        assert_eq!(node.artifact().to_string(), "g:a:test-jar:tests:2.0");
        assert!(node.is_managed_version());
        assert!(node.managed_bits().contains(ManagedBits::SCOPE));
        assert!(!node.managed_bits().contains(ManagedBits::OPTIONAL));
        assert_eq!(node.children().len(), 1);
        assert!(node.children()[0].is_optional());
    }

    #[test]
    fn test_unresolved_repository_defaults() {
        let model: UnresolvedModel = serde_json::from_str(
            r#"{"groupId": "g", "artifactId": "a", "version": "1.0",
                "repository": {"id": "central"}, "reason": "not found"}"#,
        )
        .unwrap();
        let unresolved = model.to_unresolved();

        let repository = unresolved.repository.unwrap();
        assert_eq!(repository.id, "central");
        assert!(!repository.is_legacy());
        assert_eq!(unresolved.reason, "not found");
    }

    #[test]
    fn test_project_exclusions() {
        let model: ProjectModel = serde_json::from_str(
            r#"{"groupId": "g", "artifactId": "app", "version": "1.0",
                "dependencies": [{"groupId": "g", "artifactId": "a", "version": "[1.0,2.0)",
                                  "exclusions": [{"groupId": "x", "artifactId": "*"}]}]}"#,
        )
        .unwrap();
        let project = model.to_project();

        assert_eq!(project.packaging(), "jar");
        assert_eq!(project.key().to_string(), "g:app:1.0");
        let exclusions = project.dependencies()[0].exclusions();
        assert_eq!(exclusions.len(), 1);
        assert_eq!(exclusions[0].group_id(), "x");
    }
}
