use crate::ports::outbound::DependencyResolver;
use crate::version_check::domain::{
    ComparableVersion, Project, ProjectKey, QualifiedName, VersionCheckExclusion,
};
use crate::version_check::services::strategy_cache::StrategyCache;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Traversal settings of a version check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSettings {
    /// Requested scope, e.g. `test` or `compile+runtime`
    pub scope: String,
    /// Scan every reachable dependency instead of the declared ones only
    pub deep_scan: bool,
    /// Resolve dependencies in parallel
    pub fast_resolution: bool,
    /// Treat unresolved `system` scope artifacts as fatal
    pub unresolved_system_artifacts_fail_build: bool,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            scope: "test".to_string(),
            deep_scan: false,
            fast_resolution: true,
            unresolved_system_artifacts_fail_build: false,
        }
    }
}

/// Everything a version check run needs, passed explicitly through the services.
///
/// The context owns the strategy cache and the resolver handle; it is shared
/// read-only between resolution tasks through an `Arc`.
pub struct CheckContext {
    settings: CheckSettings,
    exclusions: Vec<VersionCheckExclusion>,
    strategy_cache: StrategyCache,
    resolver: Arc<dyn DependencyResolver>,
    root_project: Project,
    reactor_projects: HashSet<ProjectKey>,
}

impl CheckContext {
    pub fn new(
        settings: CheckSettings,
        exclusions: Vec<VersionCheckExclusion>,
        strategy_cache: StrategyCache,
        resolver: Arc<dyn DependencyResolver>,
        root_project: Project,
        reactor_projects: impl IntoIterator<Item = ProjectKey>,
    ) -> Self {
        Self {
            settings,
            exclusions,
            strategy_cache,
            resolver,
            root_project,
            reactor_projects: reactor_projects.into_iter().collect(),
        }
    }

    pub fn settings(&self) -> &CheckSettings {
        &self.settings
    }

    pub fn exclusions(&self) -> &[VersionCheckExclusion] {
        &self.exclusions
    }

    pub fn strategy_cache(&self) -> &StrategyCache {
        &self.strategy_cache
    }

    pub fn resolver(&self) -> &dyn DependencyResolver {
        self.resolver.as_ref()
    }

    pub fn root_project(&self) -> &Project {
        &self.root_project
    }

    pub fn is_reactor_project(&self, key: &ProjectKey) -> bool {
        self.reactor_projects.contains(key)
    }

    /// True if an exclusion suppresses this `(name, expected, resolved)` triple.
    pub fn is_excluded(
        &self,
        name: &QualifiedName,
        expected: &ComparableVersion,
        resolved: &ComparableVersion,
    ) -> bool {
        self.exclusions
            .iter()
            .any(|exclusion| exclusion.matches(name, expected, resolved))
    }

    /// Decides whether `resolved` conflicts with `expected` for `name`.
    ///
    /// Excluded triples never conflict; everything else is judged by the
    /// strategy selected for `name`.
    pub fn is_conflict(
        &self,
        name: &QualifiedName,
        expected: &ComparableVersion,
        resolved: &ComparableVersion,
    ) -> bool {
        if self.is_excluded(name, expected, resolved) {
            debug!(
                dependency = %name,
                expected = %expected,
                resolved = %resolved,
                "Version resolution is excluded by configuration"
            );
            return false;
        }
        let strategy = self.strategy_cache.for_qualified_name(name);
        !strategy.is_compatible(expected, resolved)
    }
}

impl fmt::Debug for CheckContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckContext")
            .field("settings", &self.settings)
            .field("root_project", &self.root_project.key())
            .field("exclusions", &self.exclusions.len())
            .field("reactor_projects", &self.reactor_projects.len())
            .finish()
    }
}
