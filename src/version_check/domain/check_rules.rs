use crate::shared::error::CheckError;
use crate::shared::Result;
use crate::version_check::domain::qualified_name::QualifiedName;
use crate::version_check::domain::qualified_name_matcher::QualifiedNameMatcher;
use crate::version_check::domain::version::ComparableVersion;

/// Suppresses one known conflict: an identity pattern plus the exact expected
/// and resolved versions.
#[derive(Debug, Clone)]
pub struct VersionCheckExclusion {
    matcher: QualifiedNameMatcher,
    expected: ComparableVersion,
    resolved: ComparableVersion,
}

impl VersionCheckExclusion {
    /// # Errors
    /// Returns `CheckError::InvalidConfiguration` if either version is missing
    /// or the dependency pattern is invalid.
    pub fn new(dependency: &str, expected: Option<&str>, resolved: Option<&str>) -> Result<Self> {
        fn non_blank(version: Option<&str>) -> Option<&str> {
            version.map(str::trim).filter(|v| !v.is_empty())
        }
        let (Some(expected), Some(resolved)) = (non_blank(expected), non_blank(resolved)) else {
            return Err(CheckError::invalid_configuration(format!(
                "Invalid exclusion specification: '{dependency}' needs both an expected and a resolved version"
            ))
            .into());
        };

        Ok(Self {
            matcher: QualifiedNameMatcher::new(dependency)?,
            expected: ComparableVersion::new(expected),
            resolved: ComparableVersion::new(resolved),
        })
    }

    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    pub fn matches(
        &self,
        name: &QualifiedName,
        expected: &ComparableVersion,
        resolved: &ComparableVersion,
    ) -> bool {
        self.matcher.matches(name) && self.expected == *expected && self.resolved == *resolved
    }
}

/// Assigns a strategy, by name, to every identity matching one of the include patterns.
#[derive(Debug, Clone)]
pub struct ResolverRule {
    strategy: String,
    includes: Vec<QualifiedNameMatcher>,
}

impl ResolverRule {
    /// # Errors
    /// Returns `CheckError::InvalidConfiguration` if an include pattern is invalid.
    pub fn new<S: AsRef<str>>(strategy: impl Into<String>, includes: &[S]) -> Result<Self> {
        let includes = includes
            .iter()
            .map(|pattern| QualifiedNameMatcher::new(pattern.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            strategy: strategy.into(),
            includes,
        })
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn includes(&self) -> &[QualifiedNameMatcher] {
        &self.includes
    }
}
