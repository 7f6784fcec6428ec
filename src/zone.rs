//! Zones: sets of territories used to decide whether an address falls in
//! a shipping or tax region.
//!
//! Zone rules are independent of the metadata tables. A territory compares
//! the raw address values, so rules for countries with subdivision lists
//! should use subdivision ids.
//!
//! # Examples
//!
//! ```
//! use intl_address::{Address, ExactMatcher, PostCodeRange, Territory, Zone};
//!
//! let zone: Zone = [
//!     Territory::new().with_country("AU").with_administrative_area("VIC"),
//!     Territory::new()
//!         .with_country("AU")
//!         .with_included_post_codes(ExactMatcher::new().with_range(PostCodeRange::new(2000, 2234))),
//! ]
//! .into_iter()
//! .collect();
//!
//! let sydney = Address::builder().country("AU").administrative_area("NSW").post_code("2000").build();
//! let perth = Address::builder().country("AU").administrative_area("WA").post_code("6000").build();
//!
//! assert!(zone.contains(&sydney));
//! assert!(!zone.contains(&perth));
//! ```

use std::fmt;

use regex::Regex;

use crate::address::Address;

/// An inclusive range of numeric post codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PostCodeRange {
    start: i64,
    end: i64,
}

impl PostCodeRange {
    /// Creates the range `start..=end`. A range with `start > end` is empty.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// First post code in the range
    #[must_use]
    pub const fn start(&self) -> i64 {
        self.start
    }

    /// Last post code in the range
    #[must_use]
    pub const fn end(&self) -> i64 {
        self.end
    }

    /// Returns true if `value` lies within the range.
    #[must_use]
    pub const fn contains(&self, value: i64) -> bool {
        self.start <= value && value <= self.end
    }
}

/// Matches post codes against a literal list and numeric ranges.
///
/// Literals are compared exactly. Post codes that parse as integers are
/// also checked against the ranges; anything else never matches a range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExactMatcher {
    matches: Vec<String>,
    ranges: Vec<PostCodeRange>,
}

impl ExactMatcher {
    /// Creates a matcher that matches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a literal post code.
    #[must_use]
    pub fn with_match(mut self, post_code: impl Into<String>) -> Self {
        self.matches.push(post_code.into());
        self
    }

    /// Adds a numeric range.
    #[must_use]
    pub fn with_range(mut self, range: PostCodeRange) -> Self {
        self.ranges.push(range);
        self
    }

    /// Literal post codes
    #[must_use]
    pub fn literals(&self) -> &[String] {
        &self.matches
    }

    /// Numeric ranges
    #[must_use]
    pub fn ranges(&self) -> &[PostCodeRange] {
        &self.ranges
    }

    /// Returns true if `post_code` is a listed literal or a number inside
    /// one of the ranges.
    #[must_use]
    pub fn matches(&self, post_code: &str) -> bool {
        if self.matches.iter().any(|m| m == post_code) {
            return true;
        }
        post_code
            .parse::<i64>()
            .is_ok_and(|n| self.ranges.iter().any(|r| r.contains(n)))
    }
}

/// Matches post codes against a regular expression, anywhere in the string.
///
/// Anchor the pattern with `^` and `$` to match whole post codes.
#[derive(Clone)]
pub struct RegexMatcher(Regex);

impl RegexMatcher {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if the pattern is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    /// Returns the pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns true if the pattern matches somewhere in `post_code`.
    #[must_use]
    pub fn matches(&self, post_code: &str) -> bool {
        self.0.is_match(post_code)
    }
}

impl From<Regex> for RegexMatcher {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

impl fmt::Debug for RegexMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RegexMatcher").field(&self.as_str()).finish()
    }
}

impl PartialEq for RegexMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for RegexMatcher {}

#[cfg(feature = "serde")]
impl serde::Serialize for RegexMatcher {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RegexMatcher {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        Self::new(&pattern).map_err(serde::de::Error::custom)
    }
}

/// A post code predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PostCodeMatcher {
    /// Literal and range matching
    Exact(ExactMatcher),
    /// Regular expression matching
    Regex(RegexMatcher),
}

impl PostCodeMatcher {
    /// Returns true if `post_code` satisfies the matcher.
    #[must_use]
    pub fn matches(&self, post_code: &str) -> bool {
        match self {
            Self::Exact(m) => m.matches(post_code),
            Self::Regex(m) => m.matches(post_code),
        }
    }
}

impl From<ExactMatcher> for PostCodeMatcher {
    fn from(matcher: ExactMatcher) -> Self {
        Self::Exact(matcher)
    }
}

impl From<RegexMatcher> for PostCodeMatcher {
    fn from(matcher: RegexMatcher) -> Self {
        Self::Regex(matcher)
    }
}

/// A single zone rule.
///
/// Every condition that is set must hold. Blank geographic fields match
/// anything. The country is compared exactly; the subdivision fields
/// ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Territory {
    country: String,
    administrative_area: String,
    locality: String,
    dependent_locality: String,
    included_post_codes: Option<PostCodeMatcher>,
    excluded_post_codes: Option<PostCodeMatcher>,
}

impl Territory {
    /// Creates a territory that contains every address.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the territory to a country code.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Restricts the territory to an administrative area.
    #[must_use]
    pub fn with_administrative_area(mut self, administrative_area: impl Into<String>) -> Self {
        self.administrative_area = administrative_area.into();
        self
    }

    /// Restricts the territory to a locality.
    #[must_use]
    pub fn with_locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = locality.into();
        self
    }

    /// Restricts the territory to a dependent locality.
    #[must_use]
    pub fn with_dependent_locality(mut self, dependent_locality: impl Into<String>) -> Self {
        self.dependent_locality = dependent_locality.into();
        self
    }

    /// Only post codes accepted by `matcher` are inside.
    #[must_use]
    pub fn with_included_post_codes(mut self, matcher: impl Into<PostCodeMatcher>) -> Self {
        self.included_post_codes = Some(matcher.into());
        self
    }

    /// Post codes accepted by `matcher` are outside.
    #[must_use]
    pub fn with_excluded_post_codes(mut self, matcher: impl Into<PostCodeMatcher>) -> Self {
        self.excluded_post_codes = Some(matcher.into());
        self
    }

    /// Returns true if `address` satisfies every condition.
    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        let same =
            |rule: &str, value: &str| rule.is_empty() || rule.to_lowercase() == value.to_lowercase();

        if !self.country.is_empty() && self.country != address.country() {
            return false;
        }
        if !same(&self.administrative_area, address.administrative_area())
            || !same(&self.locality, address.locality())
            || !same(&self.dependent_locality, address.dependent_locality())
        {
            return false;
        }

        let post_code = address.post_code();
        let included = self
            .included_post_codes
            .as_ref()
            .is_none_or(|m| m.matches(post_code));
        let excluded = self
            .excluded_post_codes
            .as_ref()
            .is_some_and(|m| m.matches(post_code));
        included && !excluded
    }
}

/// An ordered list of territories. An address is in the zone if any
/// territory contains it; the empty zone contains nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Zone(Vec<Territory>);

impl Zone {
    /// Creates an empty zone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a territory.
    pub fn push(&mut self, territory: Territory) {
        self.0.push(territory);
    }

    /// Returns the territories.
    #[must_use]
    pub fn territories(&self) -> &[Territory] {
        &self.0
    }

    /// Returns true if any territory contains `address`.
    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        self.0.iter().any(|t| t.contains(address))
    }
}

impl FromIterator<Territory> for Zone {
    fn from_iter<I: IntoIterator<Item = Territory>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Territory>> for Zone {
    fn from(territories: Vec<Territory>) -> Self {
        Self(territories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn melbourne(post_code: &str) -> Address {
        Address::builder()
            .country("AU")
            .administrative_area("VIC")
            .locality("Melbourne")
            .post_code(post_code)
            .build()
    }

    #[test]
    fn ranges_need_numeric_post_codes() {
        let m = ExactMatcher::new().with_range(PostCodeRange::new(3000, 3020));
        assert!(m.matches("3010"));
        assert!(m.matches("3000"));
        assert!(m.matches("3020"));
        assert!(!m.matches("9999"));
        assert!(!m.matches("ABCDE"));
    }

    #[test]
    fn literals_match_exactly() {
        let m = ExactMatcher::new().with_match("SW1A 1AA");
        assert!(m.matches("SW1A 1AA"));
        assert!(!m.matches("sw1a 1aa"));
    }

    #[test]
    fn regex_is_unanchored() {
        let m = RegexMatcher::new(r"\d{3}").unwrap();
        assert!(m.matches("AB123C"));
        assert!(!m.matches("AB12C"));
        assert!(RegexMatcher::new("(").is_err());
    }

    #[test]
    fn subdivisions_ignore_case() {
        let t = Territory::new()
            .with_country("AU")
            .with_administrative_area("vic")
            .with_locality("MELBOURNE");
        assert!(t.contains(&melbourne("")));
        assert!(t.contains(&melbourne("3000")));
    }

    #[test]
    fn country_is_case_sensitive() {
        assert!(!Territory::new().with_country("au").contains(&melbourne("3000")));
    }

    #[test]
    fn excluded_post_codes_win() {
        let t = Territory::new()
            .with_country("AU")
            .with_included_post_codes(ExactMatcher::new().with_range(PostCodeRange::new(3000, 3999)))
            .with_excluded_post_codes(ExactMatcher::new().with_match("3004"));
        assert!(t.contains(&melbourne("3000")));
        assert!(!t.contains(&melbourne("3004")));
        assert!(!t.contains(&melbourne("2000")));
    }

    #[test]
    fn empty_territory_contains_everything_empty_zone_nothing() {
        assert!(Territory::new().contains(&Address::default()));
        assert!(!Zone::new().contains(&melbourne("3000")));
    }
}
