use crate::application::read_models::VersionReport;

/// CheckResponse - Internal response DTO from the version check use case
///
/// Carries the report for adapters to format, or the reason the run was
/// skipped. Whether the build fails is decided by the report itself.
#[derive(Debug, Clone)]
pub struct CheckResponse {
    /// The report; `None` when the run was skipped
    pub report: Option<VersionReport>,
    /// Why the run was skipped, if it was
    pub skipped_reason: Option<String>,
}

impl CheckResponse {
    pub fn completed(report: VersionReport) -> Self {
        Self {
            report: Some(report),
            skipped_reason: None,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            report: None,
            skipped_reason: Some(reason.into()),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped_reason.is_some()
    }

    /// Message of the build failure the report calls for, if any
    pub fn failure_message(&self) -> Option<&str> {
        self.report
            .as_ref()
            .and_then(|report| report.failure.as_deref())
    }
}
