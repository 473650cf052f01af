use crate::application::dto::{CheckRequest, CheckResponse};
use crate::application::read_models::VersionReportBuilder;
use crate::ports::inbound::VersionCheckPort;
use crate::ports::outbound::{DependencyResolver, ProgressReporter, ProjectReader};
use crate::shared::Result;
use crate::version_check::domain::artifact::POM_ARTIFACT_TYPE;
use crate::version_check::domain::{
    DependencyMap, Project, ResolutionMap, ResolverRule, VersionCheckExclusion,
};
use crate::version_check::policies::{ScopeLimitingFilter, StrategyProvider};
use crate::version_check::services::{
    CheckContext, DependencyMapBuilder, DependencyTreeResolver, ProgressCallback, StrategyCache,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// CheckVersionsUseCase - Core use case for the dependency version check
///
/// This use case orchestrates a check run using generic dependency
/// injection for all infrastructure dependencies.
///
/// # Type Parameters
/// * `R` - DependencyResolver implementation, shared with the resolution workers
/// * `P` - ProjectReader implementation
/// * `PR` - ProgressReporter implementation
pub struct CheckVersionsUseCase<R, P, PR> {
    resolver: Arc<R>,
    project_reader: P,
    progress_reporter: PR,
    strategy_provider: StrategyProvider,
}

impl<R, P, PR> CheckVersionsUseCase<R, P, PR>
where
    R: DependencyResolver + 'static,
    P: ProjectReader,
    PR: ProgressReporter,
{
    /// Creates a new CheckVersionsUseCase with injected dependencies and the
    /// built-in strategies
    pub fn new(resolver: Arc<R>, project_reader: P, progress_reporter: PR) -> Self {
        Self {
            resolver,
            project_reader,
            progress_reporter,
            strategy_provider: StrategyProvider::new(),
        }
    }

    /// Replaces the registry strategies are looked up in
    pub fn with_strategy_provider(mut self, strategy_provider: StrategyProvider) -> Self {
        self.strategy_provider = strategy_provider;
        self
    }

    /// Executes the version check use case
    ///
    /// # Arguments
    /// * `request` - Scope, traversal, strategy and reporting options
    ///
    /// # Returns
    /// CheckResponse with the report, or the reason the run was skipped
    pub fn execute(&self, request: CheckRequest) -> Result<CheckResponse> {
        // Step 1: Validate the configuration before anything is resolved
        let exclusions = Self::compile_exclusions(&request)?;
        let scope_filter = ScopeLimitingFilter::dependency_scope(&request.settings.scope)?;

        if request.skip {
            self.progress_reporter.report("⏭️  Skipping version check");
            return Ok(CheckResponse::skipped("Skipping version check"));
        }

        // Step 2: Read the project
        let project = self.project_reader.read_project()?;
        if !request.include_pom_projects && project.packaging() == POM_ARTIFACT_TYPE {
            self.progress_reporter
                .report(&format!("⏭️  Ignoring POM project {}", project.key()));
            return Ok(CheckResponse::skipped("Ignoring POM project"));
        }

        debug!(project = %project.key(), mode = ?request.mode, "Starting version check");
        let strategy_cache = self.build_strategy_cache(&request)?;
        let reactor_projects = self.project_reader.read_reactor_projects()?;

        let context = Arc::new(CheckContext::new(
            request.settings.clone(),
            exclusions,
            strategy_cache,
            Arc::clone(&self.resolver) as Arc<dyn DependencyResolver>,
            project.clone(),
            reactor_projects,
        ));

        // Step 3: Map the project's resolved dependency graph
        let root_dependencies = self.map_root_project(&context, &project, &scope_filter)?;

        // Step 4: Resolve every dependency's own graph and compare versions
        let resolutions =
            self.resolve_with_progress(&context, &root_dependencies, &project, &scope_filter)?;

        // Step 5: Build the report
        let report = VersionReportBuilder::build(
            &request,
            &project,
            &resolutions,
            &root_dependencies,
            context.strategy_cache(),
        )?;

        let conflicting = resolutions
            .iter()
            .filter(|(_, collections)| collections.iter().any(|c| c.has_conflict()))
            .count();
        self.progress_reporter.report_completion(&format!(
            "✅ Version check complete: {} dependencies checked, {} with conflicts",
            report.summary.checked, conflicting
        ));

        Ok(CheckResponse::completed(report))
    }

    fn compile_exclusions(request: &CheckRequest) -> Result<Vec<VersionCheckExclusion>> {
        request
            .exclusions
            .iter()
            .map(|exclusion| {
                VersionCheckExclusion::new(
                    &exclusion.dependency,
                    exclusion.expected.as_deref(),
                    exclusion.resolved.as_deref(),
                )
            })
            .collect()
    }

    fn build_strategy_cache(&self, request: &CheckRequest) -> Result<StrategyCache> {
        let rules = request
            .resolvers
            .iter()
            .map(|resolver| ResolverRule::new(resolver.strategy.as_str(), resolver.includes.as_slice()))
            .collect::<Result<Vec<_>>>()?;
        StrategyCache::new(&self.strategy_provider, &rules, &request.default_strategy)
    }

    /// Builds the dependency map of the root project
    ///
    /// Runs on a single-threaded runtime of its own; the resolution workers
    /// are only started afterwards.
    fn map_root_project(
        &self,
        context: &CheckContext,
        project: &Project,
        scope_filter: &ScopeLimitingFilter,
    ) -> Result<DependencyMap> {
        self.progress_reporter.report(&format!(
            "📖 Resolving dependencies of {} for '{}' scope",
            project.key(),
            context.settings().scope
        ));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to start dependency resolution: {}", e))?;
        let root_dependencies = runtime
            .block_on(DependencyMapBuilder::new(context).map_project(project, scope_filter))?;

        self.progress_reporter.report(&format!(
            "✅ Detected {} direct and {} total dependencies",
            root_dependencies.direct_dependencies().len(),
            root_dependencies.len()
        ));
        Ok(root_dependencies)
    }

    /// Runs the dependency tree resolver while a progress bar polls its counters
    fn resolve_with_progress(
        &self,
        context: &Arc<CheckContext>,
        root_dependencies: &DependencyMap,
        project: &Project,
        scope_filter: &ScopeLimitingFilter,
    ) -> Result<ResolutionMap> {
        self.progress_reporter
            .report("🔍 Checking dependency versions...");

        // Create atomic counters for thread-safe progress sharing
        let progress_current = Arc::new(AtomicUsize::new(0));
        let progress_total = Arc::new(AtomicUsize::new(0));
        let is_done = Arc::new(AtomicBool::new(false));

        let current_clone = progress_current.clone();
        let total_clone = progress_total.clone();
        let done_clone = is_done.clone();

        let progress_handle = thread::spawn(move || {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} - {msg}")
                    .expect("Failed to set progress bar template")
                    .progress_chars("=>-"),
            );
            pb.set_message("Resolving dependency trees...");

            while !done_clone.load(Ordering::Relaxed) {
                let current = current_clone.load(Ordering::Relaxed);
                let total = total_clone.load(Ordering::Relaxed);

                if total > 0 {
                    pb.set_length(total as u64);
                    pb.set_position(current as u64);
                } else {
                    pb.tick();
                }

                thread::sleep(Duration::from_millis(50));
            }

            pb.finish_and_clear();
        });

        let progress_callback: ProgressCallback = Arc::new(move |current: usize, total: usize| {
            progress_current.store(current, Ordering::Relaxed);
            progress_total.store(total, Ordering::Relaxed);
        });

        let result = DependencyTreeResolver::new(Arc::clone(context), root_dependencies.clone())
            .and_then(|mut resolver| {
                resolver = resolver.with_progress(progress_callback);
                let resolutions = resolver.compute_resolution_map(project, scope_filter);
                resolver.close();
                resolutions
            });

        // Signal completion and wait for progress bar thread
        is_done.store(true, Ordering::Relaxed);
        let _ = progress_handle.join();

        result
    }
}

impl<R, P, PR> VersionCheckPort for CheckVersionsUseCase<R, P, PR>
where
    R: DependencyResolver + 'static,
    P: ProjectReader,
    PR: ProgressReporter,
{
    fn check_versions(&self, request: CheckRequest) -> Result<CheckResponse> {
        self.execute(request)
    }
}
