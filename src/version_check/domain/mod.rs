pub mod artifact;
pub mod check_rules;
pub mod dependency_map;
pub mod qualified_name;
pub mod qualified_name_matcher;
pub mod version;
pub mod version_range;
pub mod version_resolution;

pub use artifact::{
    Artifact, Dependency, DependencyNode, Exclusion, ManagedBits, Project, ProjectKey,
};
pub use check_rules::{ResolverRule, VersionCheckExclusion};
pub use dependency_map::DependencyMap;
pub use qualified_name::QualifiedName;
pub use qualified_name_matcher::{compile_wildcard, QualifiedNameMatcher};
pub use version::{ArtifactVersion, ComparableVersion};
pub use version_range::{VersionConstraint, VersionRange};
pub use version_resolution::{
    ResolutionMap, ResolutionVerdict, VersionResolution, VersionResolutionCollection,
    VersionResolutionElement,
};
