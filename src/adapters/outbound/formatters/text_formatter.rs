use crate::application::dto::ReportMode;
use crate::application::read_models::{DependencyEntryView, Severity, VersionReport};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use owo_colors::{OwoColorize, Style};

/// Indentation of the expected-version lines below an entry
const VERSION_INDENT: &str = "       ";

/// TextFormatter adapter rendering the report for terminals and log files
///
/// `check` reports print one block per identity: the resolved version, then
/// every expected version with the dependencies that asked for it. `list`
/// reports print one aligned row per identity.
pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.use_color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn strong(&self, text: &str) -> String {
        self.paint(text, Style::new().bold())
    }

    fn failure(&self, text: &str) -> String {
        self.paint(text, Style::new().bold().red())
    }

    fn success(&self, text: &str) -> String {
        self.paint(text, Style::new().bold().green())
    }

    fn warning(&self, text: &str) -> String {
        self.paint(text, Style::new().bold().yellow())
    }

    fn severity_tag(&self, severity: Severity) -> String {
        match severity {
            Severity::Info => "[INFO] ".to_string(),
            Severity::Warn => self.warning("[WARN] "),
            Severity::Error => self.failure("[ERROR] "),
        }
    }
}

/// Helper methods for rendering the two report layouts
impl TextFormatter {
    fn render_check_entry(&self, output: &mut String, entry: &DependencyEntryView) {
        output.push_str(&self.severity_tag(entry.severity));
        output.push_str(&format!(
            "{}: {} ({}{}) - scope: {} - strategy: {}\n",
            self.strong(&entry.name),
            self.strong(&entry.resolved_version),
            if entry.direct { "direct" } else { "transitive" },
            if entry.managed { ", managed" } else { "" },
            entry.scope,
            entry.strategy
        ));

        let version_padding = entry
            .requested_versions
            .iter()
            .map(|v| v.version.chars().count())
            .max()
            .unwrap_or(0);

        for requested in &entry.requested_versions {
            let padded = format!("{:<width$}", requested.version, width = version_padding + 1);
            output.push_str(VERSION_INDENT);
            if requested.conflict {
                output.push_str(&self.failure(&padded));
            } else if requested.matches_resolved {
                output.push_str(&self.success(&padded));
            } else {
                output.push_str(&padded);
            }

            let requesters: Vec<String> = requested
                .requesters
                .iter()
                .map(|requester| {
                    if requester.direct {
                        self.strong(&format!("*{}*", requester.name))
                    } else {
                        requester.name.clone()
                    }
                })
                .collect();
            output.push_str("expected by ");
            output.push_str(&requesters.join(", "));
            output.push('\n');
        }
    }

    fn render_list(&self, output: &mut String, entries: &[DependencyEntryView]) {
        let name_padding = entries
            .iter()
            .map(|e| e.name.chars().count())
            .max()
            .unwrap_or(0);
        let scope_padding = entries
            .iter()
            .map(|e| e.scope.chars().count())
            .max()
            .unwrap_or(0);

        for entry in entries {
            output.push_str(&format!(
                "{:<name_width$}{:<scope_width$}",
                format!("{}: ", entry.name),
                entry.scope,
                name_width = name_padding + 2,
                scope_width = scope_padding + 1
            ));

            if entry.managed {
                output.push_str(&self.warning(&entry.resolved_version));
            } else if entry.direct {
                output.push_str(&self.strong(&entry.resolved_version));
            } else {
                output.push_str(&entry.resolved_version);
            }

            let unselected: Vec<String> = entry
                .requested_versions
                .iter()
                .filter(|requested| !requested.matches_resolved)
                .map(|requested| {
                    if requested.conflict {
                        self.failure(&format!("!{}!", requested.version))
                    } else if requested.direct {
                        self.strong(&format!("*{}*", requested.version))
                    } else {
                        requested.version.clone()
                    }
                })
                .collect();
            if !unselected.is_empty() {
                output.push_str(&format!(" ({})", unselected.join(", ")));
            }
            output.push('\n');
        }
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &VersionReport) -> Result<String> {
        let mut output = String::new();
        output.push_str(&report.header);
        output.push('\n');

        match report.mode {
            ReportMode::Check => {
                for entry in &report.entries {
                    self.render_check_entry(&mut output, entry);
                }
            }
            ReportMode::List => self.render_list(&mut output, &report.entries),
        }

        if let Some(failure) = &report.failure {
            output.push('\n');
            output.push_str(&self.failure(failure));
            output.push('\n');
        }

        Ok(output)
    }
}
