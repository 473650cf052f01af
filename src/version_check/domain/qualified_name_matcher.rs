use crate::shared::error::CheckError;
use crate::shared::Result;
use crate::version_check::domain::qualified_name::QualifiedName;
use regex::Regex;

/// Matches qualified names against a `group[:artifact]` wildcard pattern.
#[derive(Debug, Clone)]
pub struct QualifiedNameMatcher {
    pattern: String,
    group: Regex,
    artifact: Regex,
}

impl QualifiedNameMatcher {
    /// Compiles a `group[:artifact]` pattern. A missing artifact segment matches any artifact.
    ///
    /// # Errors
    /// Returns `CheckError::InvalidConfiguration` if the pattern has more than two segments.
    pub fn new(pattern: &str) -> Result<Self> {
        let segments: Vec<&str> = pattern.split(':').map(str::trim).collect();
        match segments.as_slice() {
            [group] => Ok(Self::from_segments(pattern, group, "")),
            [group, artifact] => Ok(Self::from_segments(pattern, group, artifact)),
            _ => Err(CheckError::invalid_configuration(format!(
                "Pattern {pattern} is not a valid inclusion pattern!"
            ))
            .into()),
        }
    }

    /// Builds a matcher that matches exactly the group and artifact of `name`.
    pub fn for_qualified_name(name: &QualifiedName) -> Self {
        Self::from_segments(&name.minimal_name(), name.group_id(), name.artifact_id())
    }

    fn from_segments(pattern: &str, group: &str, artifact: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            group: compile_wildcard(group),
            artifact: compile_wildcard(artifact),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, name: &QualifiedName) -> bool {
        self.group.is_match(name.group_id()) && self.artifact.is_match(name.artifact_id())
    }
}

/// Compiles a wildcard into an anchored regular expression.
///
/// `*` matches any sequence, including the empty one; every other character
/// matches itself. The empty wildcard matches everything.
pub fn compile_wildcard(wildcard: &str) -> Regex {
    if wildcard.is_empty() {
        return match_anything();
    }

    let mut expression = String::from("^");
    for (index, literal) in wildcard.split('*').enumerate() {
        if index > 0 {
            expression.push_str(".*");
        }
        expression.push_str(&regex::escape(literal));
    }
    expression.push('$');

    Regex::new(&expression).expect("escaped wildcard expression must compile")
}

fn match_anything() -> Regex {
    Regex::new("^.*$").expect("match-anything expression must compile")
}
