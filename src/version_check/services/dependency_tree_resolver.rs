use crate::shared::error::CheckError;
use crate::shared::Result;
use crate::version_check::domain::{
    ComparableVersion, Dependency, DependencyMap, DependencyNode, Project, QualifiedName,
    ResolutionMap, ResolutionVerdict, VersionResolution,
};
use crate::version_check::policies::{
    AndDependencyFilter, CheckExclusionsFilter, DependencyFilter, Scope, ScopeLimitingFilter,
};
use crate::version_check::services::check_context::CheckContext;
use crate::version_check::services::dependency_map_builder::DependencyMapBuilder;
use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// Progress callback invoked with `(completed, total)` after each dependency
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

type Verdicts = Vec<(QualifiedName, ResolutionVerdict)>;

const WORKER_THREADS_PER_CORE: usize = 5;
const WORKER_THREAD_NAME: &str = "dependency-version-check-worker";
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(2);

/// Computes, for every dependency of a project, the versions its requesters expect.
///
/// The resolver owns a worker pool for its lifetime. With fast resolution
/// enabled every dependency is resolved by its own task; each task returns its
/// verdicts and the results are merged once all tasks have finished. The pool
/// is shut down with a bounded grace period on [`close`](Self::close) or drop.
///
/// The resolver blocks on its own runtime and must not be driven from within
/// an async context.
pub struct DependencyTreeResolver {
    context: Arc<CheckContext>,
    root_dependency_map: Arc<DependencyMap>,
    runtime: Option<Runtime>,
    progress: Option<ProgressCallback>,
}

impl DependencyTreeResolver {
    /// Creates a resolver for the given root dependency map
    ///
    /// # Errors
    /// Returns an error if the worker pool cannot be started
    pub fn new(context: Arc<CheckContext>, root_dependency_map: DependencyMap) -> Result<Self> {
        let cores = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(cores * WORKER_THREADS_PER_CORE)
            .thread_name(WORKER_THREAD_NAME)
            .enable_time()
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to start dependency resolution workers: {}", e))?;

        Ok(Self {
            context,
            root_dependency_map: Arc::new(root_dependency_map),
            runtime: Some(runtime),
            progress: None,
        })
    }

    /// Registers a callback that is told how many dependencies have been processed.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Computes the resolution map of a project
    ///
    /// # Arguments
    /// * `project` - The root project; its declared dependencies are scanned
    ///   unless deep scan is enabled
    /// * `scope_filter` - The requested scope visibility
    ///
    /// # Returns
    /// Every checked identity with the versions requested for it
    ///
    /// # Errors
    /// Returns `CheckError::Execution` naming every dependency whose resolution
    /// failed, after all dependencies have been processed.
    pub fn compute_resolution_map(
        &self,
        project: &Project,
        scope_filter: &ScopeLimitingFilter,
    ) -> Result<ResolutionMap> {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Dependency tree resolver has been closed"))?;

        let dependencies = self.dependencies_to_scan(project);
        let fast_resolution = self.context.settings().fast_resolution;
        debug!(
            parallel = fast_resolution,
            dependencies = dependencies.len(),
            "Resolving dependency versions"
        );

        let outcomes = if fast_resolution {
            self.resolve_in_parallel(runtime, dependencies, scope_filter)
        } else {
            self.resolve_sequentially(runtime, dependencies, scope_filter)
        };

        let mut verdicts = Vec::new();
        let mut failures = Vec::new();
        for (dependency, outcome) in outcomes {
            match outcome {
                Ok(found) => verdicts.extend(found),
                Err(error) => failures.push((dependency, error)),
            }
        }

        if !failures.is_empty() {
            return Err(aggregate_failures(failures));
        }
        Ok(ResolutionMap::from_verdicts(verdicts))
    }

    /// Shuts down the worker pool, abandoning tasks that do not finish within
    /// the grace period. Further calls to `compute_resolution_map` fail.
    pub fn close(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(SHUTDOWN_GRACE_PERIOD);
        }
    }

    fn dependencies_to_scan(&self, project: &Project) -> Vec<Dependency> {
        if self.context.settings().deep_scan {
            debug!("Running deep scan");
            self.root_dependency_map
                .all_dependencies()
                .values()
                .filter_map(|node| node.dependency().cloned())
                .collect()
        } else {
            project.dependencies().to_vec()
        }
    }

    fn resolve_in_parallel(
        &self,
        runtime: &Runtime,
        dependencies: Vec<Dependency>,
        scope_filter: &ScopeLimitingFilter,
    ) -> Vec<(Dependency, Result<Verdicts>)> {
        let total = dependencies.len();
        let completed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = dependencies
            .iter()
            .map(|dependency| {
                let context = Arc::clone(&self.context);
                let root_map = Arc::clone(&self.root_dependency_map);
                let dependency = dependency.clone();
                let scope_filter = scope_filter.clone();
                let completed = Arc::clone(&completed);
                let progress = self.progress.clone();

                runtime.spawn(async move {
                    let outcome =
                        resolve_project_dependency(&context, &root_map, &dependency, &scope_filter)
                            .await;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(progress) = progress {
                        progress(done, total);
                    }
                    outcome
                })
            })
            .collect();

        let results = runtime.block_on(futures::future::join_all(handles));

        dependencies
            .into_iter()
            .zip(results)
            .filter_map(|(dependency, result)| match result {
                Ok(outcome) => Some((dependency, outcome)),
                Err(join_error) if join_error.is_cancelled() => {
                    warn!(dependency = %dependency, "Dependency resolution was cancelled");
                    None
                }
                Err(join_error) => {
                    let error = anyhow::anyhow!("Dependency resolution panicked: {}", join_error);
                    Some((dependency, Err(error)))
                }
            })
            .collect()
    }

    fn resolve_sequentially(
        &self,
        runtime: &Runtime,
        dependencies: Vec<Dependency>,
        scope_filter: &ScopeLimitingFilter,
    ) -> Vec<(Dependency, Result<Verdicts>)> {
        let total = dependencies.len();
        dependencies
            .into_iter()
            .enumerate()
            .map(|(index, dependency)| {
                let outcome = runtime.block_on(resolve_project_dependency(
                    &self.context,
                    &self.root_dependency_map,
                    &dependency,
                    scope_filter,
                ));
                if let Some(progress) = &self.progress {
                    progress(index + 1, total);
                }
                (dependency, outcome)
            })
            .collect()
    }
}

impl Drop for DependencyTreeResolver {
    fn drop(&mut self) {
        self.close();
    }
}

/// Resolves one dependency of the root: its own version if it is declared
/// directly, and the versions its transitive dependencies expect.
async fn resolve_project_dependency(
    context: &CheckContext,
    root_map: &DependencyMap,
    dependency: &Dependency,
    visible_scopes: &ScopeLimitingFilter,
) -> Result<Verdicts> {
    let name = QualifiedName::from_dependency(dependency);
    let mut verdicts = Vec::new();

    if let Some(node) = root_map.get_direct(&name) {
        ensure_visible(visible_scopes, dependency, node)?;
        verdicts.push(direct_resolution(context, dependency, node).await?);
    }

    // Declared in a scope outside the requested one
    let Some(node) = root_map.get(&name) else {
        return Ok(verdicts);
    };
    ensure_visible(visible_scopes, dependency, node)?;

    if dependency.scope() == Scope::System.as_str() {
        debug!(dependency = %dependency, "Not resolving transitive dependencies of system scope dependency");
        return Ok(verdicts);
    }

    // test and provided scope do not propagate to the dependency's own graph
    let transitive_scope = ScopeLimitingFilter::transitive_scope(dependency.scope())?;
    match transitive_resolutions(context, root_map, dependency, node, transitive_scope).await {
        Ok(found) => verdicts.extend(found),
        Err(error) if is_model_building_error(&error) => {
            if node.children().is_empty() {
                debug!(dependency = %dependency, "Ignoring model building error, no children were declared");
            } else {
                warn!(
                    "Could not read POM for {}, ignoring project and its dependencies!",
                    dependency
                );
            }
        }
        Err(error) => return Err(error),
    }

    Ok(verdicts)
}

fn ensure_visible(
    visible_scopes: &ScopeLimitingFilter,
    dependency: &Dependency,
    node: &DependencyNode,
) -> Result<()> {
    if !visible_scopes.accept(node, &[]) {
        anyhow::bail!(
            "Dependency {} maps to {}, but the scope filter would exclude it",
            dependency,
            node.artifact()
        );
    }
    Ok(())
}

async fn direct_resolution(
    context: &CheckContext,
    dependency: &Dependency,
    node: &DependencyNode,
) -> Result<(QualifiedName, ResolutionVerdict)> {
    let mut artifact = dependency.artifact().to_pom_artifact();
    if artifact.is_snapshot() {
        // Range resolution would otherwise try to match the timestamp
        let base_version = artifact.base_version();
        artifact = artifact.with_version(base_version);
    }

    let available = context.resolver().resolve_version_range(&artifact).await?;
    let selected = ComparableVersion::new(&node.artifact().base_version());
    if !available.contains(&selected) {
        return Err(CheckError::RangeInconsistency {
            dependency: dependency.to_string(),
            specification: dependency.artifact().base_version(),
            resolved: node.version().to_string(),
        }
        .into());
    }

    let name = QualifiedName::from_dependency(dependency);
    let resolved = ComparableVersion::new(node.version());
    let resolution = VersionResolution::for_direct_dependency(
        QualifiedName::from_project(context.root_project()),
        resolved.clone(),
        node.is_managed_version(),
    );
    let conflict = context.is_conflict(&name, &resolved, &resolved);
    Ok((name, ResolutionVerdict::new(resolution, conflict)))
}

async fn transitive_resolutions(
    context: &CheckContext,
    root_map: &DependencyMap,
    dependency: &Dependency,
    node: &DependencyNode,
    scope_filter: ScopeLimitingFilter,
) -> Result<Verdicts> {
    let filter = AndDependencyFilter::new(
        scope_filter.clone(),
        CheckExclusionsFilter::new(dependency.exclusions()),
    );
    let dependency_map = DependencyMapBuilder::new(context)
        .map_dependency(node, &filter)
        .await?;
    let requester = QualifiedName::from_dependency(dependency);

    let mut verdicts = Vec::new();
    for transitive in dependency_map.all_dependencies().values() {
        if !scope_filter.accept(transitive, &[]) || transitive.is_optional() {
            continue;
        }

        let name = QualifiedName::from_node(transitive);
        // Requested here but overridden elsewhere in the root graph
        let Some(project_node) = root_map.get(&name) else {
            continue;
        };

        let expected = ComparableVersion::new(transitive.version());
        let resolved = ComparableVersion::new(project_node.version());
        let conflict = context.is_conflict(&name, &expected, &resolved);
        let resolution = VersionResolution::for_transitive_dependency(
            requester.clone(),
            expected,
            project_node.is_managed_version(),
        );
        verdicts.push((name, ResolutionVerdict::new(resolution, conflict)));
    }
    Ok(verdicts)
}

fn is_model_building_error(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<CheckError>(),
        Some(CheckError::ModelBuilding { .. })
    )
}

/// Folds per-dependency failures into one execution error. Unresolved
/// artifacts are listed together; every other failure contributes its message.
fn aggregate_failures(failures: Vec<(Dependency, anyhow::Error)>) -> anyhow::Error {
    let mut roots = BTreeSet::new();
    let mut unresolved = BTreeSet::new();
    let mut messages = BTreeSet::new();

    for (dependency, error) in failures {
        roots.insert(dependency.artifact().to_string());
        match error.downcast_ref::<CheckError>() {
            Some(CheckError::UnresolvedDependencies { dependencies }) => {
                unresolved.extend(dependencies.iter().cloned());
            }
            _ => {
                messages.insert(format!("{:#}", error));
            }
        }
    }

    let mut message = messages.into_iter().collect::<Vec<_>>().join("\n");
    if !unresolved.is_empty() {
        if !message.is_empty() {
            message.push('\n');
        }
        message.push_str(&format!(
            "Could not resolve dependencies: [{}]",
            unresolved.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }

    CheckError::Execution {
        roots: roots.into_iter().collect(),
        message,
    }
    .into()
}
