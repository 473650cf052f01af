//! Result model of a version check.
//!
//! Traversal produces [`VersionResolution`] facts. The comparison step pairs
//! each fact with its conflict flag in a [`ResolutionVerdict`], and
//! [`ResolutionMap::from_verdicts`] folds all verdicts into collections grouped
//! by identity and expected version.

use crate::version_check::domain::qualified_name::QualifiedName;
use crate::version_check::domain::version::ComparableVersion;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// "Identity X was requested at `expected_version` by `requesting_dependency`."
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionResolution {
    requesting_dependency: QualifiedName,
    expected_version: ComparableVersion,
    managed_dependency: bool,
    direct_dependency: bool,
}

impl VersionResolution {
    pub fn for_direct_dependency(
        requesting_dependency: QualifiedName,
        expected_version: ComparableVersion,
        managed_dependency: bool,
    ) -> Self {
        Self {
            requesting_dependency,
            expected_version,
            managed_dependency,
            direct_dependency: true,
        }
    }

    pub fn for_transitive_dependency(
        requesting_dependency: QualifiedName,
        expected_version: ComparableVersion,
        managed_dependency: bool,
    ) -> Self {
        Self {
            requesting_dependency,
            expected_version,
            managed_dependency,
            direct_dependency: false,
        }
    }

    pub fn requesting_dependency(&self) -> &QualifiedName {
        &self.requesting_dependency
    }

    pub fn expected_version(&self) -> &ComparableVersion {
        &self.expected_version
    }

    pub fn is_managed_dependency(&self) -> bool {
        self.managed_dependency
    }

    pub fn is_direct_dependency(&self) -> bool {
        self.direct_dependency
    }
}

/// A resolution together with the outcome of its compatibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionVerdict {
    resolution: VersionResolution,
    conflict: bool,
}

impl ResolutionVerdict {
    pub fn new(resolution: VersionResolution, conflict: bool) -> Self {
        Self {
            resolution,
            conflict,
        }
    }

    pub fn resolution(&self) -> &VersionResolution {
        &self.resolution
    }

    pub fn has_conflict(&self) -> bool {
        self.conflict
    }

    fn into_element(self) -> (ComparableVersion, VersionResolutionElement) {
        let VersionResolution {
            requesting_dependency,
            expected_version,
            managed_dependency,
            direct_dependency,
        } = self.resolution;
        let element = VersionResolutionElement {
            requesting_dependency,
            managed_dependency,
            direct_dependency,
            conflict: self.conflict,
        };
        (expected_version, element)
    }
}

/// One requester of a version.
///
/// Equality and ordering ignore the conflict flag, so the same requester
/// seen twice folds into one element.
#[derive(Debug, Clone)]
pub struct VersionResolutionElement {
    requesting_dependency: QualifiedName,
    managed_dependency: bool,
    direct_dependency: bool,
    conflict: bool,
}

impl VersionResolutionElement {
    pub fn requesting_dependency(&self) -> &QualifiedName {
        &self.requesting_dependency
    }

    pub fn is_managed_dependency(&self) -> bool {
        self.managed_dependency
    }

    pub fn is_direct_dependency(&self) -> bool {
        self.direct_dependency
    }

    pub fn has_conflict(&self) -> bool {
        self.conflict
    }

    fn key(&self) -> (&QualifiedName, bool, bool) {
        (
            &self.requesting_dependency,
            self.managed_dependency,
            self.direct_dependency,
        )
    }
}

impl PartialEq for VersionResolutionElement {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for VersionResolutionElement {}

impl Ord for VersionResolutionElement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for VersionResolutionElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Every requester of one expected version of one identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionResolutionCollection {
    expected_version: ComparableVersion,
    requesting_dependencies: BTreeSet<VersionResolutionElement>,
}

impl VersionResolutionCollection {
    pub fn expected_version(&self) -> &ComparableVersion {
        &self.expected_version
    }

    pub fn requesting_dependencies(&self) -> &BTreeSet<VersionResolutionElement> {
        &self.requesting_dependencies
    }

    pub fn has_conflict(&self) -> bool {
        self.requesting_dependencies.iter().any(|e| e.conflict)
    }

    pub fn has_direct_dependencies(&self) -> bool {
        self.requesting_dependencies
            .iter()
            .any(|e| e.direct_dependency)
    }

    pub fn has_managed_dependencies(&self) -> bool {
        self.requesting_dependencies
            .iter()
            .any(|e| e.managed_dependency)
    }

    /// True if the expected version is the same version as `version`, ignoring notation.
    pub fn is_match_for(&self, version: &ComparableVersion) -> bool {
        self.expected_version.canonical() == version.canonical()
    }
}

/// Identity to the collections of versions requested for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionMap {
    entries: BTreeMap<QualifiedName, BTreeSet<VersionResolutionCollection>>,
}

impl ResolutionMap {
    /// Folds verdicts into collections grouped by identity and expected version.
    ///
    /// The result does not depend on the order of `verdicts`: when the same
    /// requester is recorded more than once for a version, the element is
    /// conflicting if any of the records is.
    pub fn from_verdicts<I>(verdicts: I) -> Self
    where
        I: IntoIterator<Item = (QualifiedName, ResolutionVerdict)>,
    {
        let mut grouped: BTreeMap<
            QualifiedName,
            BTreeMap<ComparableVersion, BTreeSet<VersionResolutionElement>>,
        > = BTreeMap::new();

        for (name, verdict) in verdicts {
            let (expected_version, element) = verdict.into_element();
            let elements = grouped
                .entry(name)
                .or_default()
                .entry(expected_version)
                .or_default();
            let keep_existing = elements
                .get(&element)
                .is_some_and(|existing| existing.conflict || !element.conflict);
            if !keep_existing {
                elements.replace(element);
            }
        }

        let entries = grouped
            .into_iter()
            .map(|(name, versions)| {
                let collections = versions
                    .into_iter()
                    .map(|(expected_version, requesting_dependencies)| {
                        VersionResolutionCollection {
                            expected_version,
                            requesting_dependencies,
                        }
                    })
                    .collect();
                (name, collections)
            })
            .collect();

        Self { entries }
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&BTreeSet<VersionResolutionCollection>> {
        self.entries.get(name)
    }

    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&QualifiedName, &BTreeSet<VersionResolutionCollection>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keeps only the identities for which `keep` returns true.
    pub fn filtered<F>(&self, mut keep: F) -> ResolutionMap
    where
        F: FnMut(&QualifiedName, &BTreeSet<VersionResolutionCollection>) -> bool,
    {
        let entries = self
            .entries
            .iter()
            .filter(|(name, collections)| keep(name, collections))
            .map(|(name, collections)| (name.clone(), collections.clone()))
            .collect();
        ResolutionMap { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(artifact_id: &str) -> QualifiedName {
        QualifiedName::new("g", artifact_id, None, None).unwrap()
    }

    fn verdict(requester: &str, version: &str, direct: bool, conflict: bool) -> ResolutionVerdict {
        let resolution = if direct {
            VersionResolution::for_direct_dependency(name(requester), ComparableVersion::new(version), false)
        } else {
            VersionResolution::for_transitive_dependency(
                name(requester),
                ComparableVersion::new(version),
                true,
            )
        };
        ResolutionVerdict::new(resolution, conflict)
    }

    #[test]
    fn test_groups_by_identity_and_version() {
        let map = ResolutionMap::from_verdicts(vec![
            (name("a"), verdict("root", "1.0", true, false)),
            (name("a"), verdict("b", "0.9", false, true)),
            (name("a"), verdict("c", "1.0.0", false, false)),
            (name("b"), verdict("root", "2.0", true, false)),
        ]);

        assert_eq!(map.len(), 2);
        let collections: Vec<_> = map.get(&name("a")).unwrap().iter().collect();
        assert_eq!(collections.len(), 2);
        assert_eq!(collections[0].expected_version().as_str(), "0.9");
        assert!(collections[0].has_conflict());
        assert!(!collections[0].has_direct_dependencies());
        assert!(collections[0].has_managed_dependencies());

        assert_eq!(collections[1].requesting_dependencies().len(), 2);
        assert!(!collections[1].has_conflict());
        assert!(collections[1].has_direct_dependencies());
        assert!(collections[1].is_match_for(&ComparableVersion::new("1")));
        assert!(!collections[1].is_match_for(&ComparableVersion::new("1.1")));
    }

    #[test]
    fn test_duplicate_requesters_fold_into_one_element() {
        let map = ResolutionMap::from_verdicts(vec![
            (name("a"), verdict("b", "0.9", false, false)),
            (name("a"), verdict("b", "0.9", false, false)),
        ]);
        let collection = map.get(&name("a")).unwrap().iter().next().unwrap();
        assert_eq!(collection.requesting_dependencies().len(), 1);
    }

    #[test]
    fn test_fold_is_order_independent() {
        let forward = vec![
            (name("a"), verdict("b", "0.9", false, false)),
            (name("a"), verdict("b", "0.9", false, true)),
            (name("a"), verdict("root", "1.0", true, false)),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let forward = ResolutionMap::from_verdicts(forward);
        let backward = ResolutionMap::from_verdicts(backward);
        assert_eq!(forward, backward);

        let collection = forward.get(&name("a")).unwrap().iter().next().unwrap();
        assert!(collection.has_conflict());
        assert!(backward.get(&name("a")).unwrap().iter().next().unwrap().has_conflict());
    }

    #[test]
    fn test_elements_ordered_by_requester() {
        let map = ResolutionMap::from_verdicts(vec![
            (name("x"), verdict("zeta", "1.0", false, false)),
            (name("x"), verdict("alpha", "1.0", false, false)),
        ]);
        let collection = map.get(&name("x")).unwrap().iter().next().unwrap();
        let requesters: Vec<String> = collection
            .requesting_dependencies()
            .iter()
            .map(|e| e.requesting_dependency().minimal_name())
            .collect();
        assert_eq!(requesters, vec!["g:alpha", "g:zeta"]);
    }

    #[test]
    fn test_filtered() {
        let map = ResolutionMap::from_verdicts(vec![
            (name("a"), verdict("b", "0.9", false, true)),
            (name("c"), verdict("root", "1.0", true, false)),
        ]);
        let conflicts = map.filtered(|_, collections| collections.iter().any(|c| c.has_conflict()));
        assert_eq!(conflicts.len(), 1);
        assert!(conflicts.get(&name("a")).is_some());
    }
}
