//! Builder for constructing VersionReport from a resolution map

use super::version_report::{
    DependencyEntryView, ReportSummary, RequestedVersionView, RequesterView, Severity,
    VersionReport,
};
use crate::application::dto::{CheckRequest, ReportMode};
use crate::shared::Result;
use crate::version_check::domain::{
    ComparableVersion, DependencyMap, Project, QualifiedName, ResolutionMap,
    VersionResolutionCollection,
};
use crate::version_check::services::StrategyCache;
use std::collections::BTreeSet;

const DIRECT_CONFLICT_FAILURE: &str = "Version conflict in direct dependencies detected!";
const TRANSITIVE_CONFLICT_FAILURE: &str = "Version conflict in transitive dependencies detected!";

/// Builder for constructing VersionReport from the outcome of a check
///
/// Applies the request's report filter, resolves every reported identity
/// against the root dependency map and decides the build outcome from the
/// fail flags.
pub struct VersionReportBuilder;

impl VersionReportBuilder {
    /// Builds the report of one run
    ///
    /// # Arguments
    /// * `request` - The request; supplies mode, filters and fail flags
    /// * `project` - The checked project
    /// * `resolutions` - The unfiltered resolution map
    /// * `root_dependencies` - Dependency map of the checked project
    /// * `strategies` - Strategy selection used during the check
    ///
    /// # Errors
    /// Returns an error if a reported identity is not part of the root dependency map.
    pub fn build(
        request: &CheckRequest,
        project: &Project,
        resolutions: &ResolutionMap,
        root_dependencies: &DependencyMap,
        strategies: &StrategyCache,
    ) -> Result<VersionReport> {
        let filtered = request.filter.apply(resolutions);

        let mut summary = ReportSummary {
            checked: resolutions.len(),
            reported: filtered.len(),
            ..ReportSummary::default()
        };

        let mut entries = Vec::with_capacity(filtered.len());
        for (name, collections) in filtered.iter() {
            let entry =
                Self::build_entry(request, name, collections, root_dependencies, strategies)?;
            if entry.conflict {
                summary.conflicting += 1;
                summary.direct_conflicts |= entry.direct;
                summary.transitive_conflicts |= !entry.direct;
            }
            entries.push(entry);
        }

        Ok(VersionReport {
            mode: request.mode,
            project: project.key().to_string(),
            header: Self::header(request),
            scope: request.settings.scope.clone(),
            deep_scan: request.settings.deep_scan,
            failure: Self::failure(request, &summary),
            entries,
            summary,
        })
    }

    fn header(request: &CheckRequest) -> String {
        let filter = request.filter;
        let deep_scan = if request.settings.deep_scan {
            " using deep scan"
        } else {
            ""
        };
        let conflicts_only = if filter.conflicts_only {
            ", reporting only conflicts"
        } else {
            ""
        };

        match request.mode {
            ReportMode::Check => format!(
                "Checking {}{} dependencies{} for '{}' scope{}",
                if filter.direct_only { "direct" } else { "all" },
                if filter.managed_only { ", managed" } else { "" },
                deep_scan,
                request.settings.scope,
                conflicts_only
            ),
            ReportMode::List => format!(
                "{}{} dependencies{} for '{}' scope{}:",
                if filter.direct_only { "Direct" } else { "All" },
                if filter.managed_only { " managed" } else { "" },
                deep_scan,
                request.settings.scope,
                conflicts_only
            ),
        }
    }

    fn build_entry(
        request: &CheckRequest,
        name: &QualifiedName,
        collections: &BTreeSet<VersionResolutionCollection>,
        root_dependencies: &DependencyMap,
        strategies: &StrategyCache,
    ) -> Result<DependencyEntryView> {
        let node = root_dependencies.get(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Dependency {} is missing from the resolved dependency tree",
                name.short_name()
            )
        })?;

        let resolved = ComparableVersion::new(node.version());
        let direct = collections
            .iter()
            .any(VersionResolutionCollection::has_direct_dependencies);
        let conflict = collections
            .iter()
            .any(VersionResolutionCollection::has_conflict);

        let fails_build = conflict
            && (request.conflicts_fail_build || (direct && request.direct_conflicts_fail_build));
        let severity = match (fails_build, conflict) {
            (true, _) => Severity::Error,
            (false, true) => Severity::Warn,
            (false, false) => Severity::Info,
        };

        let requested_versions = collections
            .iter()
            .map(|collection| Self::build_requested_version(collection, &resolved))
            .collect();

        Ok(DependencyEntryView {
            name: name.short_name(),
            scope: node
                .dependency()
                .map(|dependency| dependency.scope().to_string())
                .unwrap_or_default(),
            resolved_version: resolved.to_string(),
            direct,
            managed: node.is_managed_version(),
            strategy: strategies.for_qualified_name(name).name().to_string(),
            conflict,
            severity,
            requested_versions,
        })
    }

    fn build_requested_version(
        collection: &VersionResolutionCollection,
        resolved: &ComparableVersion,
    ) -> RequestedVersionView {
        RequestedVersionView {
            version: collection.expected_version().to_string(),
            conflict: collection.has_conflict(),
            matches_resolved: collection.is_match_for(resolved),
            direct: collection.has_direct_dependencies(),
            requesters: collection
                .requesting_dependencies()
                .iter()
                .map(|element| RequesterView {
                    name: element.requesting_dependency().short_name(),
                    direct: element.is_direct_dependency(),
                    managed: element.is_managed_dependency(),
                    conflict: element.has_conflict(),
                })
                .collect(),
        }
    }

    fn failure(request: &CheckRequest, summary: &ReportSummary) -> Option<String> {
        if summary.direct_conflicts
            && (request.conflicts_fail_build || request.direct_conflicts_fail_build)
        {
            return Some(DIRECT_CONFLICT_FAILURE.to_string());
        }
        if summary.transitive_conflicts && request.conflicts_fail_build {
            return Some(TRANSITIVE_CONFLICT_FAILURE.to_string());
        }
        None
    }
}
