//! Version ordering and decomposition.
//!
//! [`ComparableVersion`] implements the Maven ordering: numeric items compare
//! numerically, qualifiers follow `alpha < beta < milestone < rc < snapshot <
//! "" (release) < sp`, unknown qualifiers sort after all known ones, and
//! trailing zero items are insignificant (`1.0 == 1`).
//!
//! [`ArtifactVersion`] splits a version into major, minor, incremental and
//! qualifier components for the component-wise strategies.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

const QUALIFIERS: [&str; 7] = ["alpha", "beta", "milestone", "rc", "snapshot", "", "sp"];
const RELEASE_VERSION_INDEX: &str = "5";

#[derive(Debug, Clone)]
enum Item {
    /// Digits without leading zeros; zero is `"0"`.
    Int(String),
    Str(String),
    List(Vec<Item>),
}

impl Item {
    fn int(digits: &str) -> Item {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Item::Int("0".to_string())
        } else {
            Item::Int(trimmed.to_string())
        }
    }

    fn string(value: &str, followed_by_digit: bool) -> Item {
        let value = if followed_by_digit && value.len() == 1 {
            match value {
                "a" => "alpha",
                "b" => "beta",
                "m" => "milestone",
                other => other,
            }
        } else {
            value
        };
        let value = match value {
            "ga" | "final" | "release" => "",
            "cr" => "rc",
            other => other,
        };
        Item::Str(value.to_string())
    }

    fn parse(is_digit: bool, value: &str) -> Item {
        if is_digit {
            Item::int(value)
        } else {
            Item::string(value, false)
        }
    }

    fn is_null(&self) -> bool {
        match self {
            Item::Int(digits) => digits == "0",
            Item::Str(value) => comparable_qualifier(value) == RELEASE_VERSION_INDEX,
            Item::List(items) => items.is_empty(),
        }
    }

    /// Compares against another item, `None` standing for a missing (padding) item.
    fn compare_to(&self, other: Option<&Item>) -> Ordering {
        match (self, other) {
            (Item::Int(digits), None) => {
                if digits == "0" {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            (Item::Int(left), Some(Item::Int(right))) => compare_digits(left, right),
            (Item::Int(_), Some(_)) => Ordering::Greater,

            (Item::Str(value), None) => comparable_qualifier(value).as_str().cmp(RELEASE_VERSION_INDEX),
            (Item::Str(_), Some(Item::Int(_))) => Ordering::Less,
            (Item::Str(left), Some(Item::Str(right))) => {
                comparable_qualifier(left).cmp(&comparable_qualifier(right))
            }
            (Item::Str(_), Some(Item::List(_))) => Ordering::Less,

            (Item::List(items), None) => match items.first() {
                None => Ordering::Equal,
                Some(first) => first.compare_to(None),
            },
            (Item::List(_), Some(Item::Int(_))) => Ordering::Less,
            (Item::List(_), Some(Item::Str(_))) => Ordering::Greater,
            (Item::List(left), Some(Item::List(right))) => compare_lists(left, right),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Int(digits) => write!(f, "{digits}"),
            Item::Str(value) => write!(f, "{value}"),
            Item::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        let separator = if matches!(item, Item::List(_)) { '-' } else { '.' };
                        write!(f, "{separator}")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

fn compare_digits(left: &str, right: &str) -> Ordering {
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}

fn compare_lists(left: &[Item], right: &[Item]) -> Ordering {
    let length = left.len().max(right.len());
    for index in 0..length {
        let result = match (left.get(index), right.get(index)) {
            (None, None) => Ordering::Equal,
            (None, Some(r)) => r.compare_to(None).reverse(),
            (Some(l), r) => l.compare_to(r),
        };
        if result != Ordering::Equal {
            return result;
        }
    }
    Ordering::Equal
}

/// Maps a qualifier to a string whose natural order is the qualifier order.
fn comparable_qualifier(qualifier: &str) -> String {
    match QUALIFIERS.iter().position(|known| *known == qualifier) {
        Some(index) => index.to_string(),
        None => format!("{}-{}", QUALIFIERS.len(), qualifier),
    }
}

/// Drops trailing null items, stopping at the first non-null item that is not a list.
fn normalize(items: &mut Vec<Item>) {
    let mut index = items.len();
    while index > 0 {
        index -= 1;
        if items[index].is_null() {
            items.remove(index);
        } else if !matches!(items[index], Item::List(_)) {
            break;
        }
    }
}

fn parse_items(version: &str) -> Vec<Item> {
    // Each '-' and each digit/letter transition opens a nested list that holds
    // everything after it, so the nesting is a chain kept here as a stack.
    let mut stack: Vec<Vec<Item>> = vec![Vec::new()];
    let chars: Vec<char> = version.chars().collect();
    let mut is_digit = false;
    let mut start = 0;

    let substring = |from: usize, to: usize| -> String { chars[from..to].iter().collect() };

    for (index, &c) in chars.iter().enumerate() {
        let current = stack.len() - 1;
        if c == '.' || c == '-' {
            if index == start {
                stack[current].push(Item::int("0"));
            } else {
                stack[current].push(Item::parse(is_digit, &substring(start, index)));
            }
            start = index + 1;
            if c == '-' {
                stack.push(Vec::new());
            }
        } else if c.is_ascii_digit() {
            if !is_digit && index > start {
                stack[current].push(Item::string(&substring(start, index), true));
                start = index;
                stack.push(Vec::new());
            }
            is_digit = true;
        } else {
            if is_digit && index > start {
                stack[current].push(Item::parse(true, &substring(start, index)));
                start = index;
                stack.push(Vec::new());
            }
            is_digit = false;
        }
    }

    if chars.len() > start {
        let current = stack.len() - 1;
        stack[current].push(Item::parse(is_digit, &substring(start, chars.len())));
    }

    let mut items = stack.pop().unwrap_or_default();
    normalize(&mut items);
    while let Some(mut parent) = stack.pop() {
        parent.push(Item::List(items));
        normalize(&mut parent);
        items = parent;
    }
    items
}

/// A version with Maven ordering semantics.
///
/// Equality and hashing use the canonical form (`1.0.0`, `1.0` and `1` are equal);
/// `Display` shows the version as written.
#[derive(Debug, Clone)]
pub struct ComparableVersion {
    value: String,
    canonical: String,
    items: Vec<Item>,
}

impl ComparableVersion {
    pub fn new(version: &str) -> Self {
        let items = parse_items(&version.to_lowercase());
        let canonical = Item::List(items.clone()).to_string();
        Self {
            value: version.to_string(),
            canonical,
            items,
        }
    }

    /// The version as originally written
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Canonical form: trailing zeros dropped, aliases expanded, lowercase
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Compares by Maven version ordering alone.
    ///
    /// Unlike `Ord`, two versions with different canonical forms may compare as
    /// equal here; strategies use this comparison.
    pub fn compare_version(&self, other: &ComparableVersion) -> Ordering {
        compare_lists(&self.items, &other.items)
    }
}

impl PartialEq for ComparableVersion {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for ComparableVersion {}

impl Hash for ComparableVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl Ord for ComparableVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_version(other)
            .then_with(|| self.canonical.cmp(&other.canonical))
    }
}

impl PartialOrd for ComparableVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ComparableVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A version split into `major.minor.incremental[-qualifier]`.
///
/// Versions that do not follow the dotted numeric scheme keep the whole string
/// as qualifier, with every numeric component reported as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactVersion {
    major: Option<u32>,
    minor: Option<u32>,
    incremental: Option<u32>,
    build_number: Option<u32>,
    qualifier: Option<String>,
}

impl ArtifactVersion {
    pub fn parse(version: &str) -> Self {
        let mut parsed = ArtifactVersion::default();

        let (main_part, suffix) = match version.split_once('-') {
            Some((main_part, suffix)) => (main_part, Some(suffix)),
            None => (version, None),
        };

        if let Some(suffix) = suffix {
            if suffix.len() == 1 || !suffix.starts_with('0') {
                match try_parse_int(suffix) {
                    Some(build_number) => parsed.build_number = Some(build_number),
                    None => parsed.qualifier = Some(suffix.to_string()),
                }
            } else {
                parsed.qualifier = Some(suffix.to_string());
            }
        }

        if !main_part.contains('.') && !main_part.starts_with('0') {
            match try_parse_int(main_part) {
                Some(major) => parsed.major = Some(major),
                None => {
                    parsed.qualifier = Some(version.to_string());
                    parsed.build_number = None;
                }
            }
            return parsed;
        }

        let malformed = main_part.contains("..")
            || main_part.starts_with('.')
            || main_part.ends_with('.');
        let components = if malformed {
            None
        } else {
            parse_dotted(main_part)
        };

        match components {
            Some((major, minor, incremental, extra)) => {
                parsed.major = major;
                parsed.minor = minor;
                parsed.incremental = incremental;
                if let Some(extra) = extra {
                    parsed.qualifier = Some(extra);
                }
            }
            None => {
                parsed = ArtifactVersion {
                    qualifier: Some(version.to_string()),
                    ..ArtifactVersion::default()
                };
            }
        }
        parsed
    }

    pub fn major(&self) -> u32 {
        self.major.unwrap_or(0)
    }

    pub fn minor(&self) -> u32 {
        self.minor.unwrap_or(0)
    }

    pub fn incremental(&self) -> u32 {
        self.incremental.unwrap_or(0)
    }

    pub fn build_number(&self) -> u32 {
        self.build_number.unwrap_or(0)
    }

    /// Qualifier, empty when the version has none
    pub fn qualifier(&self) -> &str {
        self.qualifier.as_deref().unwrap_or("")
    }
}

type DottedComponents = (Option<u32>, Option<u32>, Option<u32>, Option<String>);

fn parse_dotted(main_part: &str) -> Option<DottedComponents> {
    let mut tokens = main_part.split('.').filter(|token| !token.is_empty());
    let mut numbers = [None; 3];
    for slot in numbers.iter_mut() {
        match tokens.next() {
            Some(token) => *slot = Some(strict_int(token)?),
            None => break,
        }
    }
    let [major, minor, incremental] = numbers;
    let extra = match tokens.next() {
        Some(token) if is_digits(token) => return None,
        Some(token) => Some(token.to_string()),
        None => None,
    };
    Some((major, minor, incremental, extra))
}

/// Parses a dotted component, rejecting leading zeros (`01`).
fn strict_int(token: &str) -> Option<u32> {
    if token.len() > 1 && token.starts_with('0') {
        return None;
    }
    try_parse_int(token)
}

fn try_parse_int(value: &str) -> Option<u32> {
    if !is_digits(value) {
        return None;
    }
    value.parse::<u32>().ok().filter(|number| *number <= i32::MAX as u32)
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(version: &str) -> ComparableVersion {
        ComparableVersion::new(version)
    }

    fn assert_ordered(versions: &[&str]) {
        for pair in versions.windows(2) {
            assert_eq!(
                v(pair[0]).compare_version(&v(pair[1])),
                Ordering::Less,
                "{} < {}",
                pair[0],
                pair[1]
            );
            assert_eq!(
                v(pair[1]).compare_version(&v(pair[0])),
                Ordering::Greater,
                "{} > {}",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn test_canonical_drops_trailing_zeros() {
        assert_eq!(v("1.3.0").canonical(), "1.3");
        assert_eq!(v("2.0").canonical(), "2");
        assert_eq!(v("2.0.1").canonical(), "2.0.1");
        assert_eq!(v("1.0-SNAPSHOT").canonical(), "1-snapshot");
        assert_eq!(v("1.2.3-android").canonical(), "1.2.3-android");
    }

    #[test]
    fn test_aliases_and_single_letter_qualifiers() {
        assert_eq!(v("1.0-ga"), v("1"));
        assert_eq!(v("1.0.FINAL"), v("1"));
        assert_eq!(v("1-cr1"), v("1-rc1"));
        assert_eq!(v("1a1"), v("1-alpha-1"));
        assert_eq!(v("1b2").canonical(), v("1-beta-2").canonical());
    }

    #[test]
    fn test_equality_ignores_case_and_trailing_zeros() {
        assert_eq!(v("1.0.0"), v("1"));
        assert_eq!(v("1.0-RC1"), v("1-rc1"));
        assert_ne!(v("1.0.1"), v("1"));
        assert_eq!(v("1.0.0").to_string(), "1.0.0");
    }

    #[test]
    fn test_numeric_ordering() {
        assert_ordered(&["1", "1.1", "1.2", "1.10", "2", "10"]);
        assert_ordered(&["0.9", "1.0", "1.0.1"]);
        assert_ordered(&["1.9999999999999", "1.10000000000000"]);
    }

    #[test]
    fn test_qualifier_ordering() {
        assert_ordered(&[
            "1-alpha",
            "1-beta",
            "1-milestone",
            "1-rc",
            "1-snapshot",
            "1",
            "1-sp",
        ]);
        assert_ordered(&["1-alpha-1", "1-alpha-2", "1-beta-1"]);
        assert_ordered(&["1-sp", "1-abc", "1-def"]);
    }

    #[test]
    fn test_release_is_newer_than_snapshot() {
        assert_eq!(
            v("1.0").compare_version(&v("1.0-SNAPSHOT")),
            Ordering::Greater
        );
        assert_eq!(v("1.0.1").compare_version(&v("1.0")), Ordering::Greater);
    }

    #[test]
    fn test_ord_is_consistent_with_eq() {
        assert_eq!(v("1.0").cmp(&v("1")), Ordering::Equal);
        assert_eq!(v("1.1").cmp(&v("1.01.0")), Ordering::Equal);
        assert_eq!(v("1.1").compare_version(&v("1.01.0")), Ordering::Equal);
    }

    #[test]
    fn test_artifact_version_dotted() {
        let version = ArtifactVersion::parse("1.2.3");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 2);
        assert_eq!(version.incremental(), 3);
        assert_eq!(version.qualifier(), "");
    }

    #[test]
    fn test_artifact_version_with_qualifier() {
        let version = ArtifactVersion::parse("1.2.3-android");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 2);
        assert_eq!(version.incremental(), 3);
        assert_eq!(version.qualifier(), "android");
    }

    #[test]
    fn test_artifact_version_with_build_number() {
        let version = ArtifactVersion::parse("1.2-7");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 2);
        assert_eq!(version.build_number(), 7);
        assert_eq!(version.qualifier(), "");
    }

    #[test]
    fn test_artifact_version_major_only() {
        let version = ArtifactVersion::parse("25");
        assert_eq!(version.major(), 25);
        assert_eq!(version.minor(), 0);
        assert_eq!(version.incremental(), 0);
    }

    #[test]
    fn test_artifact_version_fallback_to_qualifier() {
        for input in ["1.2.3.4", "1..2", "01.2", "abc", "1.x.2", ".1"] {
            let version = ArtifactVersion::parse(input);
            assert_eq!(version.major(), 0, "{input}");
            assert_eq!(version.minor(), 0, "{input}");
            assert_eq!(version.incremental(), 0, "{input}");
            assert_eq!(version.qualifier(), input);
        }
    }

    #[test]
    fn test_artifact_version_fourth_token_is_qualifier() {
        let version = ArtifactVersion::parse("1.2.3.Final");
        assert_eq!(version.incremental(), 3);
        assert_eq!(version.qualifier(), "Final");
    }
}
