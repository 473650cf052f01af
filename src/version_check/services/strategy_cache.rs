use crate::shared::error::CheckError;
use crate::shared::Result;
use crate::version_check::domain::{QualifiedName, QualifiedNameMatcher, ResolverRule};
use crate::version_check::policies::{Strategy, StrategyProvider};
use dashmap::DashMap;
use std::sync::Arc;

/// Selects the strategy for each identity.
///
/// Resolver rules are checked in declaration order and the first matching
/// include pattern wins; identities matched by no rule use the default
/// strategy. Lookups are memoized and safe to populate from many threads.
#[derive(Debug)]
pub struct StrategyCache {
    default_strategy: Arc<Strategy>,
    patterns: Vec<(QualifiedNameMatcher, Arc<Strategy>)>,
    cache: DashMap<QualifiedName, Arc<Strategy>>,
}

impl StrategyCache {
    /// Builds the cache, resolving every strategy name up front
    ///
    /// # Arguments
    /// * `provider` - Registry of the available strategies
    /// * `rules` - Resolver rules in declaration order
    /// * `default_strategy` - Name of the strategy used when no rule matches
    ///
    /// # Errors
    /// Returns `CheckError::InvalidConfiguration` if the default strategy or a
    /// strategy named by a rule does not exist.
    pub fn new(
        provider: &StrategyProvider,
        rules: &[ResolverRule],
        default_strategy: &str,
    ) -> Result<Self> {
        let default_strategy = provider.for_name(default_strategy).ok_or_else(|| {
            CheckError::invalid_configuration(format!(
                "Could not locate default version strategy '{default_strategy}'"
            ))
        })?;

        let mut patterns = Vec::new();
        for rule in rules {
            let strategy = provider.for_name(rule.strategy()).ok_or_else(|| {
                CheckError::invalid_configuration(format!(
                    "Could not locate version strategy {}! Check for typos!",
                    rule.strategy()
                ))
            })?;
            for include in rule.includes() {
                patterns.push((include.clone(), Arc::clone(&strategy)));
            }
        }

        Ok(Self {
            default_strategy,
            patterns,
            cache: DashMap::new(),
        })
    }

    pub fn default_strategy(&self) -> &Arc<Strategy> {
        &self.default_strategy
    }

    /// Returns the strategy responsible for `name`.
    pub fn for_qualified_name(&self, name: &QualifiedName) -> Arc<Strategy> {
        if let Some(cached) = self.cache.get(name) {
            return Arc::clone(&cached);
        }

        let strategy = self
            .patterns
            .iter()
            .find(|(matcher, _)| matcher.matches(name))
            .map(|(_, strategy)| Arc::clone(strategy))
            .unwrap_or_else(|| Arc::clone(&self.default_strategy));

        // A concurrent lookup may have stored the same strategy already
        Arc::clone(&self.cache.entry(name.clone()).or_insert(strategy))
    }
}
