mod cli;

use cli::{Args, Command};
use dependency_versions_check::adapters::outbound::console::StderrProgressReporter;
use dependency_versions_check::adapters::outbound::graph_snapshot::GraphSnapshotResolver;
use dependency_versions_check::application::dto::{
    CheckRequest, CheckRequestBuilder, OutputFormat, ReportMode,
};
use dependency_versions_check::application::factories::{
    FormatterFactory, PresenterFactory, PresenterType,
};
use dependency_versions_check::application::use_cases::CheckVersionsUseCase;
use dependency_versions_check::config::{discover_config, load_config_from_path, ConfigFile};
use dependency_versions_check::ports::outbound::{OutputPresenter, ReportFormatter};
use dependency_versions_check::shared::error::ExitCode;
use dependency_versions_check::shared::Result;
use std::io::IsTerminal;
use std::path::Path;
use std::process;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse command-line arguments; clap exits with code 2 on invalid input
    let args = Args::parse_args();
    init_tracing(args.verbose, args.quiet);

    match run(args) {
        Ok(exit_code) => process::exit(exit_code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    let common = args.command.common();

    // Load configuration
    let config = load_config(common.config.as_deref(), &common.graph)?;
    let request = build_request(&args.command, &config)?;
    let format = match (args.format, config.format.as_deref()) {
        (Some(format), _) => format,
        (None, Some(format)) => format.parse().map_err(anyhow::Error::msg)?,
        (None, None) => OutputFormat::default(),
    };

    // Create adapters (Dependency Injection)
    let snapshot = Arc::new(GraphSnapshotResolver::from_path(&common.graph)?);
    let progress_reporter = StderrProgressReporter::new().quiet(args.quiet);

    // Create use case with injected dependencies
    let use_case =
        CheckVersionsUseCase::new(Arc::clone(&snapshot), Arc::clone(&snapshot), progress_reporter);

    // Execute use case
    let response = use_case.execute(request)?;
    let Some(report) = response.report else {
        debug!(reason = ?response.skipped_reason, "Version check skipped");
        return Ok(ExitCode::Success);
    };

    if !args.quiet {
        eprintln!("{}", FormatterFactory::progress_message(format));
    }

    let use_color = format == OutputFormat::Text
        && !args.no_color
        && args.output.is_none()
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal();
    let formatted_output = FormatterFactory::create(format, use_color).format(&report)?;

    // Present output
    PresenterFactory::create(PresenterType::for_output(args.output))
        .present(&formatted_output)?;

    match report.failure {
        Some(failure) => {
            eprintln!("❌ {}", failure);
            Ok(ExitCode::ConflictsDetected)
        }
        None => Ok(ExitCode::Success),
    }
}

/// Reads the explicit config file, or looks for one next to the graph
/// snapshot and then in the working directory.
fn load_config(explicit: Option<&Path>, graph: &Path) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        info!("Using config file {}", path.display());
        return load_config_from_path(path);
    }

    let graph_dir = graph
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let working_dir = std::env::current_dir()?;
    Ok(discover_config(&[graph_dir, working_dir.as_path()])?.unwrap_or_default())
}

/// Merges command line and config file into a request; flags win over the file.
fn build_request(command: &Command, config: &ConfigFile) -> Result<CheckRequest> {
    let mode = match command {
        Command::Check(_) => ReportMode::Check,
        Command::List(_) => ReportMode::List,
    };
    let builder = apply_config(CheckRequest::builder(mode), config, mode);
    apply_flags(builder, command).build()
}

fn apply_config(
    mut builder: CheckRequestBuilder,
    config: &ConfigFile,
    mode: ReportMode,
) -> CheckRequestBuilder {
    if let Some(scope) = &config.scope {
        builder = builder.scope(scope.as_str());
    }
    if let Some(deep_scan) = config.deep_scan {
        builder = builder.deep_scan(deep_scan);
    }
    if let Some(direct_only) = config.direct_only {
        builder = builder.direct_only(direct_only);
    }
    if let Some(managed_only) = config.managed_only {
        builder = builder.managed_only(managed_only);
    }
    if let Some(conflicts_only) = config.conflicts_only {
        builder = builder.conflicts_only(conflicts_only);
    }
    if let Some(fast_resolution) = config.fast_resolution {
        builder = builder.fast_resolution(fast_resolution);
    }
    if let Some(fail_build) = config.unresolved_system_artifacts_fail_build {
        builder = builder.unresolved_system_artifacts_fail_build(fail_build);
    }
    if let Some(include) = config.include_pom_projects {
        builder = builder.include_pom_projects(include);
    }
    if let Some(skip) = config.skip {
        builder = builder.skip(skip);
    }
    if let Some(strategy) = &config.default_strategy {
        builder = builder.default_strategy(strategy.as_str());
    }
    if config.resolvers.is_some() {
        builder = builder.resolvers(config.resolver_specs());
    }
    if config.exclusions.is_some() {
        builder = builder.exclusions(config.exclusion_specs());
    }

    // Listing never fails the build
    if mode == ReportMode::Check {
        if let Some(fail_build) = config.conflicts_fail_build {
            builder = builder.conflicts_fail_build(fail_build);
        }
        if let Some(fail_build) = config.direct_conflicts_fail_build {
            builder = builder.direct_conflicts_fail_build(fail_build);
        }
    }
    builder
}

fn apply_flags(mut builder: CheckRequestBuilder, command: &Command) -> CheckRequestBuilder {
    let common = command.common();
    if let Some(scope) = &common.scope {
        builder = builder.scope(scope.as_str());
    }
    if common.deep_scan {
        builder = builder.deep_scan(true);
    }
    if common.direct_only {
        builder = builder.direct_only(true);
    }
    if common.managed_only {
        builder = builder.managed_only(true);
    }
    if common.sequential {
        builder = builder.fast_resolution(false);
    }
    if common.include_pom_projects {
        builder = builder.include_pom_projects(true);
    }
    if common.skip {
        builder = builder.skip(true);
    }

    match command {
        Command::Check(args) => {
            if args.all {
                builder = builder.conflicts_only(false);
            }
            if args.fail_on_conflict {
                builder = builder.conflicts_fail_build(true);
            }
            if args.fail_on_direct_conflict {
                builder = builder.direct_conflicts_fail_build(true);
            }
        }
        Command::List(args) => {
            if args.conflicts_only {
                builder = builder.conflicts_only(true);
            }
        }
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn command(args: &[&str]) -> Command {
        Args::try_parse_from(std::iter::once("dvc").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    fn config(yaml: &str) -> ConfigFile {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn test_defaults_without_config() {
        let request = build_request(
            &command(&["check", "-g", "graph.json"]),
            &ConfigFile::default(),
        )
        .unwrap();

        assert_eq!(request.mode, ReportMode::Check);
        assert_eq!(request.settings.scope, "test");
        assert!(request.settings.fast_resolution);
        assert!(request.filter.conflicts_only);
        assert_eq!(request.default_strategy, "default");
    }

    #[test]
    fn test_config_values_apply() {
        let config = config(
            r#"
scope: compile
deep_scan: true
fast_resolution: false
conflicts_fail_build: true
default_strategy: apr
resolvers:
  - strategy: single-digit
    includes: ["g:*"]
"#,
        );
        let request = build_request(&command(&["check", "-g", "graph.json"]), &config).unwrap();

        assert_eq!(request.settings.scope, "compile");
        assert!(request.settings.deep_scan);
        assert!(!request.settings.fast_resolution);
        assert!(request.conflicts_fail_build);
        assert_eq!(request.default_strategy, "apr");
        assert_eq!(request.resolvers.len(), 1);
    }

    #[test]
    fn test_flags_override_config() {
        let config = config("scope: compile\nconflicts_only: true\nfast_resolution: true\n");
        let request = build_request(
            &command(&[
                "check", "-g", "graph.json", "--scope", "runtime", "--all", "--sequential",
            ]),
            &config,
        )
        .unwrap();

        assert_eq!(request.settings.scope, "runtime");
        assert!(!request.filter.conflicts_only);
        assert!(!request.settings.fast_resolution);
    }

    #[test]
    fn test_list_ignores_fail_settings() {
        let config = config("conflicts_fail_build: true\ndirect_conflicts_fail_build: true\n");
        let request = build_request(&command(&["list", "-g", "graph.json"]), &config).unwrap();

        assert_eq!(request.mode, ReportMode::List);
        assert!(!request.filter.conflicts_only);
        assert!(!request.conflicts_fail_build);
        assert!(!request.direct_conflicts_fail_build);

        let request = build_request(
            &command(&["list", "-g", "graph.json", "--conflicts-only"]),
            &ConfigFile::default(),
        )
        .unwrap();
        assert!(request.filter.conflicts_only);
    }

    #[test]
    fn test_load_config_next_to_graph() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("dvc.config.yml"),
            "default_strategy: two-digits-backward-compatible\n",
        )
        .unwrap();

        let config = load_config(None, &temp_dir.path().join("graph.json")).unwrap();
        assert_eq!(
            config.default_strategy.as_deref(),
            Some("two-digits-backward-compatible")
        );
    }

    #[test]
    fn test_load_explicit_config_missing() {
        let result = load_config(Some(Path::new("/nonexistent/dvc.yml")), Path::new("graph.json"));
        assert!(result.is_err());
    }
}
