use crate::application::read_models::VersionReport;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use chrono::Utc;
use serde::Serialize;

const TOOL_NAME: &str = "dependency-versions-check";

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    tool: Tool,
    #[serde(flatten)]
    report: &'a VersionReport,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    version: String,
}

/// JsonFormatter adapter serializing the report read model as pretty JSON
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &VersionReport) -> Result<String> {
        let document = JsonReport {
            generated_at: Utc::now().to_rfc3339(),
            tool: Tool {
                name: TOOL_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            report,
        };
        serde_json::to_string_pretty(&document).map_err(Into::into)
    }
}
