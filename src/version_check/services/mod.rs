pub mod check_context;
pub mod dependency_map_builder;
pub mod dependency_tree_resolver;
pub mod report_filter;
pub mod strategy_cache;

pub use check_context::{CheckContext, CheckSettings};
pub use dependency_map_builder::DependencyMapBuilder;
pub use dependency_tree_resolver::{DependencyTreeResolver, ProgressCallback};
pub use report_filter::ReportFilter;
pub use strategy_cache::StrategyCache;

#[cfg(test)]
pub(crate) mod test_support;
