//! Version compatibility strategies.
//!
//! A strategy decides whether a resolved version may stand in for the version
//! a consumer expected. Component-wise strategies are an ordered pipeline of
//! plain comparison functions; the first step that is not `Undecided` wins.

use crate::version_check::domain::{ArtifactVersion, ComparableVersion};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_STRATEGY: &str = "default";
pub const APR_STRATEGY: &str = "apr";
pub const SINGLE_DIGIT_STRATEGY: &str = "single-digit";
pub const TWO_DIGITS_BACKWARD_COMPATIBLE_STRATEGY: &str = "two-digits-backward-compatible";

/// Outcome of a single comparison step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Incompatible,
    Compatible,
    Undecided,
}

pub type ComponentCheck = fn(expected: u32, resolved: u32) -> Verdict;
pub type QualifierCheck = fn(expected: &str, resolved: &str) -> Verdict;
pub type CompatibilityFn = dyn Fn(&ComparableVersion, &ComparableVersion) -> bool + Send + Sync;

/// Comparison steps shared by the component-wise strategies.
pub mod checks {
    use super::Verdict;

    pub fn same(expected: u32, resolved: u32) -> Verdict {
        if expected == resolved {
            Verdict::Undecided
        } else {
            Verdict::Incompatible
        }
    }

    pub fn not_older(expected: u32, resolved: u32) -> Verdict {
        if resolved < expected {
            Verdict::Incompatible
        } else {
            Verdict::Undecided
        }
    }

    pub fn any(_expected: u32, _resolved: u32) -> Verdict {
        Verdict::Undecided
    }

    pub fn both_zero(expected: u32, resolved: u32) -> Verdict {
        if expected != 0 || resolved != 0 {
            Verdict::Incompatible
        } else {
            Verdict::Undecided
        }
    }

    pub fn same_qualifier(expected: &str, resolved: &str) -> Verdict {
        if expected == resolved {
            Verdict::Undecided
        } else {
            Verdict::Incompatible
        }
    }
}

/// Per-component comparison steps, evaluated major, minor, patch, qualifier.
#[derive(Debug, Clone, Copy)]
pub struct ComponentPipeline {
    pub major: ComponentCheck,
    pub minor: ComponentCheck,
    pub patch: ComponentCheck,
    pub qualifier: QualifierCheck,
}

impl ComponentPipeline {
    pub const APR: ComponentPipeline = ComponentPipeline {
        major: checks::same,
        minor: checks::not_older,
        patch: checks::any,
        qualifier: checks::same_qualifier,
    };

    /// Shifts the apr rules one component to the left and pins the patch level to zero.
    pub const TWO_DIGITS_BACKWARD_COMPATIBLE: ComponentPipeline = ComponentPipeline {
        major: Self::APR.minor,
        minor: Self::APR.patch,
        patch: checks::both_zero,
        qualifier: Self::APR.qualifier,
    };

    fn evaluate(&self, expected: &ArtifactVersion, resolved: &ArtifactVersion) -> bool {
        let steps = [
            (self.major)(expected.major(), resolved.major()),
            (self.minor)(expected.minor(), resolved.minor()),
            (self.patch)(expected.incremental(), resolved.incremental()),
            (self.qualifier)(expected.qualifier(), resolved.qualifier()),
        ];
        steps
            .into_iter()
            .find(|verdict| *verdict != Verdict::Undecided)
            .map_or(true, |verdict| verdict == Verdict::Compatible)
    }
}

#[derive(Clone)]
enum Rule {
    Ordering,
    MajorOnly,
    Components(ComponentPipeline),
    Custom(Arc<CompatibilityFn>),
}

/// A named compatibility policy.
#[derive(Clone)]
pub struct Strategy {
    name: String,
    rule: Rule,
}

impl Strategy {
    /// Resolved must not be older than expected, by full version ordering.
    pub fn default_strategy() -> Self {
        Self::with_rule(DEFAULT_STRATEGY, Rule::Ordering)
    }

    /// Same major, resolved minor not older, same qualifier.
    pub fn apr() -> Self {
        Self::from_components(APR_STRATEGY, ComponentPipeline::APR)
    }

    /// Resolved major not older; nothing else is compared.
    pub fn single_digit() -> Self {
        Self::with_rule(SINGLE_DIGIT_STRATEGY, Rule::MajorOnly)
    }

    /// Two-component versions: resolved major not older, no patch level, same qualifier.
    pub fn two_digits_backward_compatible() -> Self {
        Self::from_components(
            TWO_DIGITS_BACKWARD_COMPATIBLE_STRATEGY,
            ComponentPipeline::TWO_DIGITS_BACKWARD_COMPATIBLE,
        )
    }

    pub fn from_components(name: impl Into<String>, pipeline: ComponentPipeline) -> Self {
        Self::with_rule(name, Rule::Components(pipeline))
    }

    /// Wraps an arbitrary compatibility function, called as `(expected, resolved)`.
    pub fn custom<F>(name: impl Into<String>, is_compatible: F) -> Self
    where
        F: Fn(&ComparableVersion, &ComparableVersion) -> bool + Send + Sync + 'static,
    {
        Self::with_rule(name, Rule::Custom(Arc::new(is_compatible)))
    }

    fn with_rule(name: impl Into<String>, rule: Rule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if an artifact at `resolved` may stand in for one at `expected`.
    pub fn is_compatible(&self, expected: &ComparableVersion, resolved: &ComparableVersion) -> bool {
        match &self.rule {
            Rule::Ordering => resolved.compare_version(expected) != Ordering::Less,
            Rule::MajorOnly => {
                let (expected, resolved) = decompose(expected, resolved);
                resolved.major() >= expected.major()
            }
            Rule::Components(pipeline) => {
                let (expected, resolved) = decompose(expected, resolved);
                pipeline.evaluate(&expected, &resolved)
            }
            Rule::Custom(is_compatible) => is_compatible(expected, resolved),
        }
    }
}

fn decompose(
    expected: &ComparableVersion,
    resolved: &ComparableVersion,
) -> (ArtifactVersion, ArtifactVersion) {
    (
        ArtifactVersion::parse(expected.canonical()),
        ArtifactVersion::parse(resolved.canonical()),
    )
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy").field("name", &self.name).finish()
    }
}
