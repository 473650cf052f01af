use crate::shared::error::CheckError;
use crate::shared::Result;
use crate::version_check::domain::DependencyNode;
use crate::version_check::policies::dependency_filter::DependencyFilter;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const COMPILE_PLUS_RUNTIME: &str = "compile+runtime";
pub const RUNTIME_PLUS_SYSTEM: &str = "runtime+system";

/// The five dependency scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    Compile,
    Runtime,
    Test,
    Provided,
    System,
}

impl Scope {
    pub const ALL: [Scope; 5] = [
        Scope::Compile,
        Scope::Runtime,
        Scope::Test,
        Scope::Provided,
        Scope::System,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
            Scope::Provided => "provided",
            Scope::System => "system",
        }
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| format!("Unknown scope: {s}"))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Accepts graph edges whose scope belongs to a fixed scope set.
///
/// Edges without a dependency (the graph root) are always accepted; scopes
/// outside the five known ones are always rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLimitingFilter {
    scopes: BTreeSet<Scope>,
}

impl ScopeLimitingFilter {
    /// Scopes visible when resolving a project in the requested scope.
    ///
    /// # Errors
    /// Returns `CheckError::InvalidConfiguration` for an unknown scope name.
    pub fn dependency_scope(scope: &str) -> Result<Self> {
        use Scope::*;
        let scopes: &[Scope] = match scope {
            "compile" => &[Compile, System, Provided],
            "runtime" => &[Compile, Runtime],
            COMPILE_PLUS_RUNTIME => &[Compile, System, Provided, Runtime],
            RUNTIME_PLUS_SYSTEM => &[Compile, System, Runtime],
            "test" => &Scope::ALL,
            _ => {
                return Err(
                    CheckError::invalid_configuration(format!("Scope '{scope}' is unknown!")).into(),
                )
            }
        };
        Ok(Self::of(scopes))
    }

    /// Scopes in which the graph below an edge of scope `scope` is resolved.
    ///
    /// `test` and `provided` do not propagate: their own dependencies are
    /// resolved as `compile+runtime`.
    ///
    /// # Errors
    /// Returns `CheckError::InvalidConfiguration` for an unknown scope name.
    pub fn transitive_scope(scope: &str) -> Result<Self> {
        match scope {
            "compile" | "runtime" | COMPILE_PLUS_RUNTIME | RUNTIME_PLUS_SYSTEM => {
                Self::dependency_scope(scope)
            }
            "test" | "provided" => Self::dependency_scope(COMPILE_PLUS_RUNTIME),
            _ => Err(CheckError::invalid_configuration(format!(
                "Scope '{scope}' is unknown!"
            ))
            .into()),
        }
    }

    fn of(scopes: &[Scope]) -> Self {
        Self {
            scopes: scopes.iter().copied().collect(),
        }
    }

    pub fn scopes(&self) -> &BTreeSet<Scope> {
        &self.scopes
    }

    /// Returns true if `scope` names one of the scopes in this set.
    pub fn accepts_scope(&self, scope: &str) -> bool {
        scope
            .parse::<Scope>()
            .is_ok_and(|scope| self.scopes.contains(&scope))
    }
}

impl DependencyFilter for ScopeLimitingFilter {
    fn accept(&self, node: &DependencyNode, _parents: &[&DependencyNode]) -> bool {
        match node.dependency() {
            None => true,
            Some(dependency) => self.accepts_scope(dependency.scope()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version_check::domain::{Artifact, Dependency, ManagedBits};

    fn node_in_scope(scope: &str) -> DependencyNode {
        DependencyNode::new(
            Dependency::new(Artifact::new("g", "a", "1.0"), scope),
            ManagedBits::NONE,
            vec![],
        )
    }

    fn accepted(filter: &ScopeLimitingFilter) -> Vec<&'static str> {
        Scope::ALL
            .into_iter()
            .filter(|scope| filter.accept(&node_in_scope(scope.as_str()), &[]))
            .map(Scope::as_str)
            .collect()
    }

    #[test]
    fn test_compile_visibility() {
        let filter = ScopeLimitingFilter::dependency_scope("compile").unwrap();
        assert_eq!(accepted(&filter), vec!["compile", "provided", "system"]);
        assert!(!filter.accept(&node_in_scope("runtime"), &[]));
        assert!(!filter.accept(&node_in_scope("test"), &[]));
    }

    #[test]
    fn test_runtime_visibility() {
        let filter = ScopeLimitingFilter::dependency_scope("runtime").unwrap();
        assert_eq!(accepted(&filter), vec!["compile", "runtime"]);
    }

    #[test]
    fn test_combined_visibility() {
        let filter = ScopeLimitingFilter::dependency_scope("compile+runtime").unwrap();
        assert_eq!(
            accepted(&filter),
            vec!["compile", "runtime", "provided", "system"]
        );

        let filter = ScopeLimitingFilter::dependency_scope("runtime+system").unwrap();
        assert_eq!(accepted(&filter), vec!["compile", "runtime", "system"]);
    }

    #[test]
    fn test_test_visibility_accepts_all() {
        let filter = ScopeLimitingFilter::dependency_scope("test").unwrap();
        assert_eq!(
            accepted(&filter),
            vec!["compile", "runtime", "test", "provided", "system"]
        );
    }

    #[test]
    fn test_unknown_visibility_scope() {
        let result = ScopeLimitingFilter::dependency_scope("import");
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Scope 'import' is unknown!"));
    }

    #[test]
    fn test_transitive_scopes() {
        for scope in ["compile", "runtime", "compile+runtime", "runtime+system"] {
            assert_eq!(
                ScopeLimitingFilter::transitive_scope(scope).unwrap(),
                ScopeLimitingFilter::dependency_scope(scope).unwrap()
            );
        }
        let combined = ScopeLimitingFilter::dependency_scope("compile+runtime").unwrap();
        assert_eq!(ScopeLimitingFilter::transitive_scope("test").unwrap(), combined);
        assert_eq!(ScopeLimitingFilter::transitive_scope("provided").unwrap(), combined);
    }

    #[test]
    fn test_unknown_transitive_scope() {
        assert!(ScopeLimitingFilter::transitive_scope("system").is_err());
        assert!(ScopeLimitingFilter::transitive_scope("bogus").is_err());
    }

    #[test]
    fn test_root_node_is_always_accepted() {
        let filter = ScopeLimitingFilter::dependency_scope("compile").unwrap();
        let root = DependencyNode::root(Artifact::new("g", "root", "1.0"), vec![]);
        assert!(filter.accept(&root, &[]));
    }

    #[test]
    fn test_unknown_edge_scope_is_rejected() {
        let filter = ScopeLimitingFilter::dependency_scope("test").unwrap();
        assert!(!filter.accept(&node_in_scope("import"), &[]));
        assert!(!filter.accept(&node_in_scope("COMPILE"), &[]));
    }
}
