//! dependency-versions-check - Dependency version conflict detection
//!
//! This library checks a resolved Maven dependency graph for version
//! conflicts: for every dependency it records which version each requester
//! expected, and lets a per-dependency strategy decide whether the version
//! that was actually resolved can stand in for it.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`version_check`): identities, versions, scopes, strategies and the resolution engine
//! - **Application Layer** (`application`): The check use case, request/response DTOs and the report read model
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use dependency_versions_check::prelude::*;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! // Create adapters
//! let snapshot = Arc::new(GraphSnapshotResolver::from_path(Path::new("graph.json"))?);
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case
//! let use_case = CheckVersionsUseCase::new(
//!     Arc::clone(&snapshot),
//!     Arc::clone(&snapshot),
//!     progress_reporter,
//! );
//!
//! // Execute
//! let request = CheckRequest::builder(ReportMode::Check)
//!     .scope("compile")
//!     .direct_conflicts_fail_build(true)
//!     .build()?;
//! let response = use_case.execute(request)?;
//!
//! // Format output
//! if let Some(report) = response.report {
//!     let output = TextFormatter::new(false).format(&report)?;
//!     println!("{}", output);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod ports;
pub mod shared;
pub mod version_check;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
    pub use crate::adapters::outbound::formatters::{JsonFormatter, TextFormatter};
    pub use crate::adapters::outbound::graph_snapshot::GraphSnapshotResolver;
    pub use crate::application::dto::{
        CheckRequest, CheckResponse, ExclusionSpec, OutputFormat, ReportMode, ResolverSpec,
    };
    pub use crate::application::read_models::{Severity, VersionReport};
    pub use crate::application::use_cases::CheckVersionsUseCase;
    pub use crate::ports::inbound::VersionCheckPort;
    pub use crate::ports::outbound::{
        DependencyResolution, DependencyResolver, OutputPresenter, ProgressReporter,
        ProjectReader, ReportFormatter, UnresolvedDependency,
    };
    pub use crate::shared::error::{CheckError, ExitCode};
    pub use crate::shared::Result;
    pub use crate::version_check::domain::{
        Artifact, ComparableVersion, Dependency, DependencyNode, ManagedBits, Project,
        ProjectKey, QualifiedName,
    };
    pub use crate::version_check::policies::{DependencyFilter, Strategy, StrategyProvider};
}
