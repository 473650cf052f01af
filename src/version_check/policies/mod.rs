pub mod dependency_filter;
pub mod scope_filter;
pub mod strategy;
pub mod strategy_provider;

pub use dependency_filter::{AndDependencyFilter, CheckExclusionsFilter, DependencyFilter};
pub use scope_filter::{Scope, ScopeLimitingFilter, COMPILE_PLUS_RUNTIME, RUNTIME_PLUS_SYSTEM};
pub use strategy::{
    checks, ComponentPipeline, Strategy, Verdict, APR_STRATEGY, DEFAULT_STRATEGY,
    SINGLE_DIGIT_STRATEGY, TWO_DIGITS_BACKWARD_COMPATIBLE_STRATEGY,
};
pub use strategy_provider::StrategyProvider;
