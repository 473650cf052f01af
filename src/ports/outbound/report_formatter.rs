use crate::application::read_models::VersionReport;
use crate::shared::Result;

/// ReportFormatter port for rendering a version report
///
/// This port abstracts the output format (plain text, JSON, ...).
pub trait ReportFormatter {
    /// Formats a version report into a string
    ///
    /// # Arguments
    /// * `report` - The read model produced by the version check
    ///
    /// # Returns
    /// Formatted report content as a string
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, report: &VersionReport) -> Result<String>;
}
