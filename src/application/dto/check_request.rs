use crate::shared::error::CheckError;
use crate::shared::Result;
use crate::version_check::policies::{COMPILE_PLUS_RUNTIME, DEFAULT_STRATEGY};
use crate::version_check::services::{CheckSettings, ReportFilter};
use serde::Serialize;

/// Scopes a version check may be requested for
pub const VALID_SCOPES: [&str; 4] = ["compile", "runtime", "test", COMPILE_PLUS_RUNTIME];

/// Which report a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Report conflicts and decide whether they fail the build
    Check,
    /// List resolved versions, without failing
    List,
}

impl ReportMode {
    /// `check` reports only conflicts unless asked otherwise; `list` reports everything.
    pub fn default_conflicts_only(self) -> bool {
        matches!(self, ReportMode::Check)
    }
}

/// Assigns a strategy to the identities matching the include patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSpec {
    pub strategy: String,
    pub includes: Vec<String>,
}

impl ResolverSpec {
    pub fn new(strategy: impl Into<String>, includes: Vec<String>) -> Self {
        Self {
            strategy: strategy.into(),
            includes,
        }
    }
}

/// A known conflict to ignore, as written in the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSpec {
    pub dependency: String,
    pub expected: Option<String>,
    pub resolved: Option<String>,
}

impl ExclusionSpec {
    pub fn new(
        dependency: impl Into<String>,
        expected: Option<String>,
        resolved: Option<String>,
    ) -> Self {
        Self {
            dependency: dependency.into(),
            expected,
            resolved,
        }
    }
}

/// CheckRequest - Internal request DTO for the version check use case
///
/// Built with [`CheckRequest::builder`], which applies the per-mode
/// defaults and rejects requests that cannot describe a valid run.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    /// Report to produce
    pub mode: ReportMode,
    /// Traversal settings handed to the resolution services
    pub settings: CheckSettings,
    /// Which identities end up in the report
    pub filter: ReportFilter,
    /// Strategy used for identities no resolver rule matches
    pub default_strategy: String,
    pub resolvers: Vec<ResolverSpec>,
    pub exclusions: Vec<ExclusionSpec>,
    /// Skip the run entirely
    pub skip: bool,
    /// Check projects with `pom` packaging too
    pub include_pom_projects: bool,
    /// Any conflict fails the build
    pub conflicts_fail_build: bool,
    /// Conflicts of direct dependencies fail the build
    pub direct_conflicts_fail_build: bool,
}

impl CheckRequest {
    pub fn builder(mode: ReportMode) -> CheckRequestBuilder {
        CheckRequestBuilder::new(mode)
    }
}

/// Builder for [`CheckRequest`]
#[derive(Debug, Clone)]
pub struct CheckRequestBuilder {
    request: CheckRequest,
}

impl CheckRequestBuilder {
    fn new(mode: ReportMode) -> Self {
        Self {
            request: CheckRequest {
                mode,
                settings: CheckSettings::default(),
                filter: ReportFilter {
                    conflicts_only: mode.default_conflicts_only(),
                    ..ReportFilter::default()
                },
                default_strategy: DEFAULT_STRATEGY.to_string(),
                resolvers: Vec::new(),
                exclusions: Vec::new(),
                skip: false,
                include_pom_projects: false,
                conflicts_fail_build: false,
                direct_conflicts_fail_build: false,
            },
        }
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.request.settings.scope = scope.into();
        self
    }

    pub fn deep_scan(mut self, deep_scan: bool) -> Self {
        self.request.settings.deep_scan = deep_scan;
        self
    }

    pub fn fast_resolution(mut self, fast_resolution: bool) -> Self {
        self.request.settings.fast_resolution = fast_resolution;
        self
    }

    pub fn unresolved_system_artifacts_fail_build(mut self, fail_build: bool) -> Self {
        self.request.settings.unresolved_system_artifacts_fail_build = fail_build;
        self
    }

    pub fn conflicts_only(mut self, conflicts_only: bool) -> Self {
        self.request.filter.conflicts_only = conflicts_only;
        self
    }

    pub fn direct_only(mut self, direct_only: bool) -> Self {
        self.request.filter.direct_only = direct_only;
        self
    }

    pub fn managed_only(mut self, managed_only: bool) -> Self {
        self.request.filter.managed_only = managed_only;
        self
    }

    pub fn default_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.request.default_strategy = strategy.into();
        self
    }

    pub fn resolvers(mut self, resolvers: Vec<ResolverSpec>) -> Self {
        self.request.resolvers = resolvers;
        self
    }

    pub fn exclusions(mut self, exclusions: Vec<ExclusionSpec>) -> Self {
        self.request.exclusions = exclusions;
        self
    }

    pub fn skip(mut self, skip: bool) -> Self {
        self.request.skip = skip;
        self
    }

    pub fn include_pom_projects(mut self, include: bool) -> Self {
        self.request.include_pom_projects = include;
        self
    }

    pub fn conflicts_fail_build(mut self, fail_build: bool) -> Self {
        self.request.conflicts_fail_build = fail_build;
        self
    }

    pub fn direct_conflicts_fail_build(mut self, fail_build: bool) -> Self {
        self.request.direct_conflicts_fail_build = fail_build;
        self
    }

    /// Validates and returns the request
    ///
    /// # Errors
    /// Returns `CheckError::Validation` if the scope is not one of
    /// [`VALID_SCOPES`], or if a strategy name or exclusion pattern is blank.
    pub fn build(self) -> Result<CheckRequest> {
        let request = self.request;

        if !VALID_SCOPES.contains(&request.settings.scope.as_str()) {
            return Err(validation(format!("Scope '{}' is invalid", request.settings.scope)));
        }
        if request.default_strategy.trim().is_empty() {
            return Err(validation("Default strategy must not be empty"));
        }
        if let Some(position) = request
            .resolvers
            .iter()
            .position(|resolver| resolver.strategy.trim().is_empty())
        {
            return Err(validation(format!(
                "Resolver #{} has no strategy name",
                position + 1
            )));
        }
        if let Some(position) = request
            .exclusions
            .iter()
            .position(|exclusion| exclusion.dependency.trim().is_empty())
        {
            return Err(validation(format!(
                "Exclusion #{} has no dependency pattern",
                position + 1
            )));
        }

        Ok(request)
    }
}

fn validation(message: impl Into<String>) -> anyhow::Error {
    CheckError::Validation {
        message: message.into(),
    }
    .into()
}
