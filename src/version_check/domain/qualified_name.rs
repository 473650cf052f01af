use crate::shared::Result;
use crate::version_check::domain::artifact::{
    Artifact, Dependency, DependencyNode, Project, DEFAULT_ARTIFACT_TYPE,
};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

const TEST_JAR_TYPE: &str = "test-jar";
const TESTS_CLASSIFIER: &str = "tests";

/// Version-independent identity of an artifact.
///
/// Two names are equal when group and artifact match and either both denote a
/// test artifact (`test-jar`, or `jar` with classifier `tests`), or the type
/// (default `jar`) and classifier (default empty) match. Hashing and ordering
/// follow the same normalization.
#[derive(Debug, Clone)]
pub struct QualifiedName {
    group_id: String,
    artifact_id: String,
    artifact_type: Option<String>,
    classifier: Option<String>,
}

impl QualifiedName {
    /// Creates a qualified name.
    ///
    /// # Errors
    /// Returns an error if a classifier is given without a type.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        artifact_type: Option<String>,
        classifier: Option<String>,
    ) -> Result<Self> {
        if artifact_type.is_none() && classifier.is_some() {
            anyhow::bail!("A classifier requires an artifact type");
        }
        Ok(Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            artifact_type,
            classifier,
        })
    }

    pub fn from_artifact(artifact: &Artifact) -> Self {
        let classifier = Some(artifact.classifier())
            .filter(|classifier| !classifier.is_empty())
            .map(str::to_string);
        Self {
            group_id: artifact.group_id().to_string(),
            artifact_id: artifact.artifact_id().to_string(),
            artifact_type: Some(artifact.artifact_type().to_string()),
            classifier,
        }
    }

    pub fn from_dependency(dependency: &Dependency) -> Self {
        Self::from_artifact(dependency.artifact())
    }

    pub fn from_node(node: &DependencyNode) -> Self {
        Self::from_artifact(node.artifact())
    }

    pub fn from_project(project: &Project) -> Self {
        Self {
            group_id: project.group_id().to_string(),
            artifact_id: project.artifact_id().to_string(),
            artifact_type: None,
            classifier: None,
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn artifact_type(&self) -> Option<&str> {
        self.artifact_type.as_deref()
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    /// True for `test-jar` artifacts and for `jar` artifacts classified as `tests`.
    pub fn has_tests(&self) -> bool {
        match (self.artifact_type.as_deref(), self.classifier.as_deref()) {
            (Some(TEST_JAR_TYPE), _) => true,
            (Some(DEFAULT_ARTIFACT_TYPE), Some(TESTS_CLASSIFIER)) => true,
            _ => false,
        }
    }

    /// `group:artifact[:type][:classifier]`
    pub fn full_name(&self) -> String {
        let mut name = self.minimal_name();
        if let Some(artifact_type) = &self.artifact_type {
            name.push(':');
            name.push_str(artifact_type);
        }
        if let Some(classifier) = &self.classifier {
            name.push(':');
            name.push_str(classifier);
        }
        name
    }

    /// `group:artifact`, followed by ` (tests)` or ` (classifier)` when present.
    pub fn short_name(&self) -> String {
        let mut name = self.minimal_name();
        if self.has_tests() {
            name.push_str(" (tests)");
        } else if let Some(classifier) = &self.classifier {
            name.push_str(&format!(" ({classifier})"));
        }
        name
    }

    /// `group:artifact`
    pub fn minimal_name(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Display width of the short name, used to align reports.
    pub fn display_width(&self) -> usize {
        self.short_name().chars().count()
    }

    fn normalized_type_and_classifier(&self) -> (&str, &str) {
        if self.has_tests() {
            return (TEST_JAR_TYPE, TESTS_CLASSIFIER);
        }
        (
            self.artifact_type.as_deref().unwrap_or(DEFAULT_ARTIFACT_TYPE),
            self.classifier.as_deref().unwrap_or(""),
        )
    }
}

impl PartialEq for QualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.group_id == other.group_id
            && self.artifact_id == other.artifact_id
            && self.normalized_type_and_classifier() == other.normalized_type_and_classifier()
    }
}

impl Eq for QualifiedName {}

impl Hash for QualifiedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group_id.hash(state);
        self.artifact_id.hash(state);
        self.normalized_type_and_classifier().hash(state);
    }
}

impl Ord for QualifiedName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.minimal_name()
            .cmp(&other.minimal_name())
            .then_with(|| {
                self.normalized_type_and_classifier()
                    .cmp(&other.normalized_type_and_classifier())
            })
    }
}

impl PartialOrd for QualifiedName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}
