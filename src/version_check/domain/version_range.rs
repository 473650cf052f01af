use crate::shared::error::CheckError;
use crate::shared::Result;
use crate::version_check::domain::version::ComparableVersion;
use std::cmp::Ordering;

/// One end of a version range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    pub version: ComparableVersion,
    pub inclusive: bool,
}

/// A single interval such as `[1.0,2.0)`; a missing bound is unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    lower: Option<Bound>,
    upper: Option<Bound>,
}

impl VersionRange {
    pub fn contains(&self, version: &ComparableVersion) -> bool {
        let above_lower = self.lower.as_ref().map_or(true, |bound| {
            match version.compare_version(&bound.version) {
                Ordering::Greater => true,
                Ordering::Equal => bound.inclusive,
                Ordering::Less => false,
            }
        });
        let below_upper = self.upper.as_ref().map_or(true, |bound| {
            match version.compare_version(&bound.version) {
                Ordering::Less => true,
                Ordering::Equal => bound.inclusive,
                Ordering::Greater => false,
            }
        });
        above_lower && below_upper
    }
}

/// A dependency's version specification: a plain version or a union of ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConstraint {
    Exact(ComparableVersion),
    Ranges(Vec<VersionRange>),
}

impl VersionConstraint {
    /// Parses `1.0`, `[1.0,2.0)`, `(,1.5]`, `[1.2]` or a comma-separated union of ranges.
    ///
    /// # Errors
    /// Returns `CheckError::InvalidVersionRange` for unbalanced brackets,
    /// reversed bounds or exclusive single-version ranges.
    pub fn parse(specification: &str) -> Result<Self> {
        let invalid = |details: &str| -> anyhow::Error {
            CheckError::InvalidVersionRange {
                specification: specification.to_string(),
                details: details.to_string(),
            }
            .into()
        };

        let trimmed = specification.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty version specification"));
        }
        if !trimmed.starts_with(['[', '(']) {
            if trimmed.contains(['[', ']', '(', ')', ',']) {
                return Err(invalid("unexpected range characters in plain version"));
            }
            return Ok(VersionConstraint::Exact(ComparableVersion::new(trimmed)));
        }

        let mut ranges = Vec::new();
        let mut rest = trimmed;
        while !rest.is_empty() {
            let lower_inclusive = match rest.chars().next() {
                Some('[') => true,
                Some('(') => false,
                _ => return Err(invalid("expected '[' or '(' to open a range")),
            };
            let close = rest
                .find([']', ')'])
                .ok_or_else(|| invalid("unbounded range, missing ']' or ')'"))?;
            let upper_inclusive = rest[close..].starts_with(']');
            let body = &rest[1..close];

            ranges.push(parse_range(body, lower_inclusive, upper_inclusive).map_err(|e| invalid(&e))?);

            rest = rest[close + 1..].trim_start();
            if let Some(after_comma) = rest.strip_prefix(',') {
                rest = after_comma.trim_start();
                if rest.is_empty() {
                    return Err(invalid("trailing ',' after range"));
                }
            } else if !rest.is_empty() {
                return Err(invalid("ranges must be separated by ','"));
            }
        }

        Ok(VersionConstraint::Ranges(ranges))
    }

    pub fn contains(&self, version: &ComparableVersion) -> bool {
        match self {
            VersionConstraint::Exact(exact) => exact == version,
            VersionConstraint::Ranges(ranges) => ranges.iter().any(|range| range.contains(version)),
        }
    }

    /// Picks the versions this constraint admits, in ascending order.
    ///
    /// A plain version always selects itself, whether or not it is listed in
    /// `available`; a range selects the available versions it contains.
    pub fn select(&self, available: &[ComparableVersion]) -> Vec<ComparableVersion> {
        match self {
            VersionConstraint::Exact(exact) => vec![exact.clone()],
            VersionConstraint::Ranges(_) => {
                let mut selected: Vec<ComparableVersion> = available
                    .iter()
                    .filter(|version| self.contains(version))
                    .cloned()
                    .collect();
                selected.sort();
                selected.dedup();
                selected
            }
        }
    }
}

fn parse_range(
    body: &str,
    lower_inclusive: bool,
    upper_inclusive: bool,
) -> std::result::Result<VersionRange, String> {
    let Some((lower, upper)) = body.split_once(',') else {
        let version = body.trim();
        if !(lower_inclusive && upper_inclusive) || version.is_empty() {
            return Err(format!("single version range '{body}' must be written as [version]"));
        }
        let bound = Bound {
            version: ComparableVersion::new(version),
            inclusive: true,
        };
        return Ok(VersionRange {
            lower: Some(bound.clone()),
            upper: Some(bound),
        });
    };

    if upper.contains(',') {
        return Err(format!("range '{body}' has more than two bounds"));
    }

    let bound = |version: &str, inclusive: bool| {
        let version = version.trim();
        (!version.is_empty()).then(|| Bound {
            version: ComparableVersion::new(version),
            inclusive,
        })
    };
    let range = VersionRange {
        lower: bound(lower, lower_inclusive),
        upper: bound(upper, upper_inclusive),
    };

    if let (Some(lower), Some(upper)) = (&range.lower, &range.upper) {
        if upper.version.compare_version(&lower.version) == Ordering::Less {
            return Err(format!("range '{body}' has its upper bound below its lower bound"));
        }
    }
    Ok(range)
}
