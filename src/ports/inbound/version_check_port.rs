use crate::application::dto::{CheckRequest, CheckResponse};
use crate::shared::Result;

/// VersionCheckPort - Inbound port for the dependency version check
///
/// This port defines the interface that external adapters (CLI, build
/// integrations, etc.) use to run a version check.
pub trait VersionCheckPort {
    /// Checks the project's dependency versions for conflicts
    ///
    /// # Arguments
    /// * `request` - Scope, traversal, strategy and reporting options
    ///
    /// # Returns
    /// The report of every checked dependency plus the build outcome
    ///
    /// # Errors
    /// Returns an error if:
    /// - The configuration names an unknown scope or strategy
    /// - Dependencies cannot be resolved
    /// - A declared version range does not contain the resolved version
    fn check_versions(&self, request: CheckRequest) -> Result<CheckResponse>;
}
