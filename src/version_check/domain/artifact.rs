use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

pub const DEFAULT_ARTIFACT_TYPE: &str = "jar";
pub const POM_ARTIFACT_TYPE: &str = "pom";
pub const SNAPSHOT_VERSION: &str = "SNAPSHOT";

fn snapshot_timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.*)-(\d{8}\.\d{6})-(\d+)$").expect("snapshot timestamp regex must compile")
    })
}

/// Coordinates of a single artifact: group, artifact, version, type and classifier.
///
/// The version is whatever the producer supplied: a resolved version on graph
/// nodes, a version specification (possibly a range) on declared dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    group_id: String,
    artifact_id: String,
    version: String,
    artifact_type: String,
    classifier: String,
}

impl Artifact {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            artifact_type: DEFAULT_ARTIFACT_TYPE.to_string(),
            classifier: String::new(),
        }
    }

    pub fn with_type(mut self, artifact_type: impl Into<String>) -> Self {
        self.artifact_type = artifact_type.into();
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = classifier.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn artifact_type(&self) -> &str {
        &self.artifact_type
    }

    /// Classifier, empty when the artifact has none
    pub fn classifier(&self) -> &str {
        &self.classifier
    }

    pub fn is_snapshot(&self) -> bool {
        self.version.ends_with(SNAPSHOT_VERSION) || snapshot_timestamp_re().is_match(&self.version)
    }

    /// Returns the version with a deployed snapshot timestamp folded back to `-SNAPSHOT`.
    ///
    /// `1.0-20240101.123456-7` becomes `1.0-SNAPSHOT`; every other version is returned as is.
    pub fn base_version(&self) -> String {
        match snapshot_timestamp_re().captures(&self.version) {
            Some(captures) => format!("{}-{}", &captures[1], SNAPSHOT_VERSION),
            None => self.version.clone(),
        }
    }

    /// Returns the coordinates of the project model (POM) describing this artifact.
    pub fn to_pom_artifact(&self) -> Artifact {
        if self.artifact_type == POM_ARTIFACT_TYPE && self.classifier.is_empty() {
            return self.clone();
        }
        Artifact::new(&self.group_id, &self.artifact_id, &self.version).with_type(POM_ARTIFACT_TYPE)
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.group_id, self.artifact_id, self.artifact_type
        )?;
        if !self.classifier.is_empty() {
            write!(f, ":{}", self.classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}

/// A `group:artifact` pair excluded from a dependency's transitive graph.
///
/// Either segment may be `*` to match any value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Exclusion {
    group_id: String,
    artifact_id: String,
}

impl Exclusion {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn matches(&self, artifact: &Artifact) -> bool {
        segment_matches(&self.group_id, artifact.group_id())
            && segment_matches(&self.artifact_id, artifact.artifact_id())
    }
}

fn segment_matches(pattern: &str, value: &str) -> bool {
    pattern == "*" || pattern == value
}

/// A dependency edge: the requested artifact plus scope, optional flag and exclusions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    artifact: Artifact,
    scope: String,
    optional: bool,
    exclusions: Vec<Exclusion>,
}

impl Dependency {
    pub fn new(artifact: Artifact, scope: impl Into<String>) -> Self {
        Self {
            artifact,
            scope: scope.into(),
            optional: false,
            exclusions: Vec::new(),
        }
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_exclusions(mut self, exclusions: Vec<Exclusion>) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}", self.artifact, self.scope)?;
        if self.optional {
            write!(f, ", optional")?;
        }
        write!(f, "]")
    }
}

/// Bit set recording which parts of a dependency were overridden by dependency management.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ManagedBits(u8);

impl ManagedBits {
    pub const NONE: ManagedBits = ManagedBits(0);
    pub const VERSION: ManagedBits = ManagedBits(1);
    pub const SCOPE: ManagedBits = ManagedBits(1 << 1);
    pub const OPTIONAL: ManagedBits = ManagedBits(1 << 2);
    pub const PROPERTIES: ManagedBits = ManagedBits(1 << 3);
    pub const EXCLUSIONS: ManagedBits = ManagedBits(1 << 4);

    pub fn contains(self, other: ManagedBits) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parses a managed-bit name as it appears in graph snapshots.
    pub fn from_name(name: &str) -> Option<ManagedBits> {
        match name.to_ascii_lowercase().as_str() {
            "version" => Some(Self::VERSION),
            "scope" => Some(Self::SCOPE),
            "optional" => Some(Self::OPTIONAL),
            "properties" => Some(Self::PROPERTIES),
            "exclusions" => Some(Self::EXCLUSIONS),
            _ => None,
        }
    }
}

impl std::ops::BitOr for ManagedBits {
    type Output = ManagedBits;

    fn bitor(self, rhs: ManagedBits) -> ManagedBits {
        ManagedBits(self.0 | rhs.0)
    }
}

/// A node of a resolved dependency graph.
///
/// The root node of a graph carries no dependency; every other node carries the
/// edge that pulled it in, and its artifact holds the version resolution selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    artifact: Artifact,
    dependency: Option<Dependency>,
    managed: ManagedBits,
    children: Vec<Arc<DependencyNode>>,
}

impl DependencyNode {
    pub fn root(artifact: Artifact, children: Vec<Arc<DependencyNode>>) -> Self {
        Self {
            artifact,
            dependency: None,
            managed: ManagedBits::NONE,
            children,
        }
    }

    pub fn new(
        dependency: Dependency,
        managed: ManagedBits,
        children: Vec<Arc<DependencyNode>>,
    ) -> Self {
        Self {
            artifact: dependency.artifact().clone(),
            dependency: Some(dependency),
            managed,
            children,
        }
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn version(&self) -> &str {
        self.artifact.version()
    }

    pub fn dependency(&self) -> Option<&Dependency> {
        self.dependency.as_ref()
    }

    pub fn managed_bits(&self) -> ManagedBits {
        self.managed
    }

    pub fn is_managed_version(&self) -> bool {
        self.managed.contains(ManagedBits::VERSION)
    }

    pub fn is_optional(&self) -> bool {
        self.dependency.as_ref().is_some_and(Dependency::is_optional)
    }

    pub fn children(&self) -> &[Arc<DependencyNode>] {
        &self.children
    }
}

/// Group, artifact and version of a project; used to recognize reactor projects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectKey {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ProjectKey {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    pub fn of_artifact(artifact: &Artifact) -> Self {
        Self::new(
            artifact.group_id(),
            artifact.artifact_id(),
            artifact.version(),
        )
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A project model: coordinates, packaging and declared dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    key: ProjectKey,
    packaging: String,
    dependencies: Vec<Dependency>,
}

impl Project {
    pub fn new(key: ProjectKey, packaging: impl Into<String>, dependencies: Vec<Dependency>) -> Self {
        Self {
            key,
            packaging: packaging.into(),
            dependencies,
        }
    }

    pub fn key(&self) -> &ProjectKey {
        &self.key
    }

    pub fn group_id(&self) -> &str {
        &self.key.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.key.artifact_id
    }

    pub fn version(&self) -> &str {
        &self.key.version
    }

    pub fn packaging(&self) -> &str {
        &self.packaging
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Returns the POM artifact of this project, used as the root of its resolved graph.
    pub fn artifact(&self) -> Artifact {
        Artifact::new(self.group_id(), self.artifact_id(), self.version()).with_type(POM_ARTIFACT_TYPE)
    }
}
