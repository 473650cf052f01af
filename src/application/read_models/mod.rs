//! Read models for CQRS-lite pattern
//!
//! This module contains view-optimized structs that provide
//! a denormalized representation of a version check for the formatters.

mod version_report;
mod version_report_builder;

pub use version_report::{
    DependencyEntryView, ReportSummary, RequestedVersionView, RequesterView, Severity,
    VersionReport,
};
pub use version_report_builder::VersionReportBuilder;
