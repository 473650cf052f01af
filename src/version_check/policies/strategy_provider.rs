use crate::version_check::policies::strategy::Strategy;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of strategies by name. Lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct StrategyProvider {
    strategies: HashMap<String, Arc<Strategy>>,
}

impl StrategyProvider {
    /// Creates a provider holding the four built-in strategies.
    pub fn new() -> Self {
        Self::empty()
            .with_strategy(Strategy::default_strategy())
            .with_strategy(Strategy::apr())
            .with_strategy(Strategy::single_digit())
            .with_strategy(Strategy::two_digits_backward_compatible())
    }

    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Registers a strategy, replacing any strategy of the same name.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategies
            .insert(strategy.name().to_ascii_lowercase(), Arc::new(strategy));
        self
    }

    pub fn for_name(&self, name: &str) -> Option<Arc<Strategy>> {
        self.strategies.get(&name.to_ascii_lowercase()).cloned()
    }

    /// Registered strategy names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .strategies
            .values()
            .map(|strategy| strategy.name().to_string())
            .collect();
        names.sort();
        names
    }
}

impl Default for StrategyProvider {
    fn default() -> Self {
        Self::new()
    }
}
