/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (dependency resolution, console, output).
pub mod dependency_resolver;
pub mod output_presenter;
pub mod progress_reporter;
pub mod project_reader;
pub mod report_formatter;

pub use dependency_resolver::{
    DependencyResolution, DependencyResolver, RemoteRepository, UnresolvedDependency,
};
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use project_reader::ProjectReader;
pub use report_formatter::ReportFormatter;
