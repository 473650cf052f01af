//! Version report read model
//!
//! The report is shared by the text and JSON formatters; every field is
//! already resolved to display values.

use crate::application::dto::ReportMode;
use serde::Serialize;

/// How loudly an entry is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

/// Main read model of a version check run
#[derive(Debug, Clone, Serialize)]
pub struct VersionReport {
    pub mode: ReportMode,
    /// Coordinates of the checked project
    pub project: String,
    /// One-line description of what was checked
    pub header: String,
    pub scope: String,
    pub deep_scan: bool,
    pub entries: Vec<DependencyEntryView>,
    pub summary: ReportSummary,
    /// Build failure message, when the fail flags turn a conflict into a failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl VersionReport {
    pub fn has_conflicts(&self) -> bool {
        self.summary.conflicting > 0
    }
}

/// Counts over the whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Identities checked before report filters were applied
    pub checked: usize,
    /// Identities in the report
    pub reported: usize,
    /// Reported identities with at least one conflicting version
    pub conflicting: usize,
    pub direct_conflicts: bool,
    pub transitive_conflicts: bool,
}

/// One checked identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEntryView {
    /// Short name, e.g. `com.google.guava:guava` or `g:a (tests)`
    pub name: String,
    pub scope: String,
    pub resolved_version: String,
    /// Declared directly by the checked project
    pub direct: bool,
    /// Resolved version was set by dependency management
    pub managed: bool,
    pub strategy: String,
    pub conflict: bool,
    pub severity: Severity,
    pub requested_versions: Vec<RequestedVersionView>,
}

/// One expected version of an identity, with everyone who asked for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestedVersionView {
    pub version: String,
    pub conflict: bool,
    /// Same version as the resolved one
    pub matches_resolved: bool,
    pub direct: bool,
    pub requesters: Vec<RequesterView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequesterView {
    pub name: String,
    pub direct: bool,
    pub managed: bool,
    pub conflict: bool,
}
