use crate::version_check::domain::{QualifiedName, ResolutionMap, VersionResolutionCollection};
use std::collections::BTreeSet;

/// Narrows a resolution map down to the identities a report is about.
///
/// Every enabled condition must hold for an identity to be kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Keep identities with at least one conflicting version
    pub conflicts_only: bool,
    /// Keep identities declared directly by the root project
    pub direct_only: bool,
    /// Keep identities whose version is managed
    pub managed_only: bool,
}

impl ReportFilter {
    pub fn accepts(&self, collections: &BTreeSet<VersionResolutionCollection>) -> bool {
        let any = |predicate: fn(&VersionResolutionCollection) -> bool| collections.iter().any(predicate);

        (!self.conflicts_only || any(VersionResolutionCollection::has_conflict))
            && (!self.direct_only || any(VersionResolutionCollection::has_direct_dependencies))
            && (!self.managed_only || any(VersionResolutionCollection::has_managed_dependencies))
    }

    pub fn apply(&self, map: &ResolutionMap) -> ResolutionMap {
        map.filtered(|_: &QualifiedName, collections| self.accepts(collections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version_check::domain::{ComparableVersion, ResolutionVerdict, VersionResolution};

    fn name(artifact_id: &str) -> QualifiedName {
        QualifiedName::new("g", artifact_id, None, None).unwrap()
    }

    fn sample() -> ResolutionMap {
        let direct = |managed, conflict| {
            ResolutionVerdict::new(
                VersionResolution::for_direct_dependency(name("root"), ComparableVersion::new("1.0"), managed),
                conflict,
            )
        };
        let transitive = |conflict| {
            ResolutionVerdict::new(
                VersionResolution::for_transitive_dependency(name("lib"), ComparableVersion::new("0.9"), false),
                conflict,
            )
        };
        ResolutionMap::from_verdicts(vec![
            (name("plain"), direct(false, false)),
            (name("managed"), direct(true, false)),
            (name("conflicting"), transitive(true)),
            (name("transitive"), transitive(false)),
        ])
    }

    fn names(map: &ResolutionMap) -> Vec<String> {
        map.iter().map(|(name, _)| name.artifact_id().to_string()).collect()
    }

    #[test]
    fn test_default_keeps_everything() {
        assert_eq!(ReportFilter::default().apply(&sample()).len(), 4);
    }

    #[test]
    fn test_single_conditions() {
        let map = sample();
        let conflicts = ReportFilter {
            conflicts_only: true,
            ..ReportFilter::default()
        };
        assert_eq!(names(&conflicts.apply(&map)), vec!["conflicting"]);

        let direct = ReportFilter {
            direct_only: true,
            ..ReportFilter::default()
        };
        assert_eq!(names(&direct.apply(&map)), vec!["managed", "plain"]);

        let managed = ReportFilter {
            managed_only: true,
            ..ReportFilter::default()
        };
        assert_eq!(names(&managed.apply(&map)), vec!["managed"]);
    }

    #[test]
    fn test_conditions_combine() {
        let filter = ReportFilter {
            conflicts_only: true,
            direct_only: true,
            managed_only: false,
        };
        assert!(filter.apply(&sample()).is_empty());
    }
}
