//! Per-country address metadata and the metadata store.
//!
//! Each country carries a fixed-depth subdivision tree (administrative
//! area, locality, dependent locality) per language and a post code
//! pattern tree of the same shape. [`Metadata::global`] holds the built-in
//! table; [`Metadata::from_json`] loads a custom one.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::BUILTIN_METADATA_JSON;
use crate::field::{FieldName, FieldSet};
use crate::region_names::{Collator, RegionNamer};
use crate::template::AddressFormat;

/// A dependent locality (suburb, district, neighborhood).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentLocality {
    pub(crate) id: String,
    pub(crate) name: String,
}

impl DependentLocality {
    /// Returns the stable id used in addresses.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name in the list's language.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A locality (city, town) and its dependent localities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) dependent_localities: Vec<DependentLocality>,
}

impl Locality {
    /// Returns the stable id used in addresses.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name in the list's language.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dependent localities, possibly empty.
    #[must_use]
    pub fn dependent_localities(&self) -> &[DependentLocality] {
        &self.dependent_localities
    }

    /// Finds a dependent locality by id.
    #[must_use]
    pub fn dependent_locality(&self, id: &str) -> Option<&DependentLocality> {
        self.dependent_localities.iter().find(|d| d.id == id)
    }
}

/// A top-level subdivision (state, province, prefecture) and its localities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministrativeArea {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub(crate) postal_key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) localities: Vec<Locality>,
}

impl AdministrativeArea {
    /// Returns the stable id used in addresses.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name in the list's language.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the key postal services use for this area, if it has one.
    #[must_use]
    pub fn postal_key(&self) -> Option<&str> {
        Some(self.postal_key.as_str()).filter(|k| !k.is_empty())
    }

    /// Returns the localities, possibly empty.
    #[must_use]
    pub fn localities(&self) -> &[Locality] {
        &self.localities
    }

    /// Finds a locality by id.
    #[must_use]
    pub fn locality(&self, id: &str) -> Option<&Locality> {
        self.localities.iter().find(|l| l.id == id)
    }
}

/// A compiled post code pattern.
///
/// Matching is unanchored; anchors are part of the pattern where needed.
#[derive(Clone)]
pub struct PostCodePattern(Regex);

impl PostCodePattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    /// Returns true if the pattern matches anywhere in `post_code`.
    #[must_use]
    pub fn is_match(&self, post_code: &str) -> bool {
        self.0.is_match(post_code)
    }

    /// Returns the pattern source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PostCodePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PostCodePattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for PostCodePattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for PostCodePattern {}

impl Serialize for PostCodePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PostCodePattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(de::Error::custom)
    }
}

/// Post code patterns for a country, keyed by administrative area id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostCodeRegex {
    #[serde(rename = "regex", default, skip_serializing_if = "Option::is_none")]
    pub(crate) pattern: Option<PostCodePattern>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) subdivisions: BTreeMap<String, AreaPostCodeRegex>,
}

/// Post code patterns for an administrative area, keyed by locality id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AreaPostCodeRegex {
    #[serde(rename = "regex", default, skip_serializing_if = "Option::is_none")]
    pub(crate) pattern: Option<PostCodePattern>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) subdivisions: BTreeMap<String, LocalityPostCodeRegex>,
}

/// Post code patterns for a locality, keyed by dependent locality id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalityPostCodeRegex {
    #[serde(rename = "regex", default, skip_serializing_if = "Option::is_none")]
    pub(crate) pattern: Option<PostCodePattern>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) subdivisions: BTreeMap<String, PostCodePattern>,
}

impl PostCodeRegex {
    /// Returns the country-wide pattern.
    #[must_use]
    pub fn pattern(&self) -> Option<&PostCodePattern> {
        self.pattern.as_ref()
    }

    /// Returns the patterns of an administrative area.
    #[must_use]
    pub fn administrative_area(&self, id: &str) -> Option<&AreaPostCodeRegex> {
        self.subdivisions.get(id)
    }
}

impl AreaPostCodeRegex {
    /// Returns the area-wide pattern.
    #[must_use]
    pub fn pattern(&self) -> Option<&PostCodePattern> {
        self.pattern.as_ref()
    }

    /// Returns the patterns of a locality.
    #[must_use]
    pub fn locality(&self, id: &str) -> Option<&LocalityPostCodeRegex> {
        self.subdivisions.get(id)
    }
}

impl LocalityPostCodeRegex {
    /// Returns the locality-wide pattern.
    #[must_use]
    pub fn pattern(&self) -> Option<&PostCodePattern> {
        self.pattern.as_ref()
    }

    /// Returns the pattern of a dependent locality.
    #[must_use]
    pub fn dependent_locality(&self, id: &str) -> Option<&PostCodePattern> {
        self.subdivisions.get(id)
    }
}

/// Address rules for one country.
///
/// Records returned by [`Metadata::country`] are fully resolved: anything a
/// country leaves unspecified has been filled in from the `ZZ` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryMetadata {
    pub(crate) id: String,
    pub(crate) default_language: String,
    pub(crate) format: AddressFormat,
    pub(crate) latinized_format: Option<AddressFormat>,
    pub(crate) administrative_area_name_type: FieldName,
    pub(crate) locality_name_type: FieldName,
    pub(crate) dependent_locality_name_type: FieldName,
    pub(crate) post_code_name_type: FieldName,
    pub(crate) allowed: FieldSet,
    pub(crate) required: FieldSet,
    pub(crate) upper: FieldSet,
    pub(crate) post_code_prefix: String,
    pub(crate) post_code_regex: PostCodeRegex,
    pub(crate) administrative_areas: BTreeMap<String, Vec<AdministrativeArea>>,
}

impl CountryMetadata {
    /// Returns the country code.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the language of the country's native subdivision names.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Returns the native address format.
    #[must_use]
    pub fn format(&self) -> &AddressFormat {
        &self.format
    }

    /// Returns the latinized address format, if the country has one.
    #[must_use]
    pub fn latinized_format(&self) -> Option<&AddressFormat> {
        self.latinized_format.as_ref()
    }

    /// Returns what the country calls its administrative areas.
    #[must_use]
    pub const fn administrative_area_name_type(&self) -> FieldName {
        self.administrative_area_name_type
    }

    /// Returns what the country calls its localities.
    #[must_use]
    pub const fn locality_name_type(&self) -> FieldName {
        self.locality_name_type
    }

    /// Returns what the country calls its dependent localities.
    #[must_use]
    pub const fn dependent_locality_name_type(&self) -> FieldName {
        self.dependent_locality_name_type
    }

    /// Returns what the country calls its post codes.
    #[must_use]
    pub const fn post_code_name_type(&self) -> FieldName {
        self.post_code_name_type
    }

    /// Returns the fields an address in this country may use.
    #[must_use]
    pub const fn allowed_fields(&self) -> FieldSet {
        self.allowed
    }

    /// Returns the fields an address in this country must use.
    #[must_use]
    pub const fn required_fields(&self) -> FieldSet {
        self.required
    }

    /// Returns the fields upper-cased on postal labels.
    #[must_use]
    pub const fn upper_fields(&self) -> FieldSet {
        self.upper
    }

    /// Returns the text printed before post codes, if any (`PR ` for Puerto Rico).
    #[must_use]
    pub fn post_code_prefix(&self) -> Option<&str> {
        Some(self.post_code_prefix.as_str()).filter(|p| !p.is_empty())
    }

    /// Returns the post code pattern tree.
    #[must_use]
    pub fn post_code_regex(&self) -> &PostCodeRegex {
        &self.post_code_regex
    }

    /// Returns the languages with subdivision names.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.administrative_areas.keys().map(String::as_str)
    }

    /// Returns true if the country has subdivision names in `language`.
    #[must_use]
    pub fn has_language(&self, language: &str) -> bool {
        self.administrative_areas.contains_key(language)
    }

    /// Returns the administrative areas named in `language`, possibly empty.
    #[must_use]
    pub fn administrative_areas(&self, language: &str) -> &[AdministrativeArea] {
        self.administrative_areas
            .get(language)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the administrative areas in the default language, or `None`
    /// if the country has no subdivision metadata.
    #[must_use]
    pub fn default_administrative_areas(&self) -> Option<&[AdministrativeArea]> {
        self.administrative_areas
            .get(&self.default_language)
            .map(Vec::as_slice)
    }

    /// Finds an administrative area by id in the list for `language`.
    #[must_use]
    pub fn administrative_area(&self, language: &str, id: &str) -> Option<&AdministrativeArea> {
        self.administrative_areas(language).iter().find(|a| a.id == id)
    }

    /// Returns `language` if the country has subdivision names in it, else
    /// the default language.
    #[must_use]
    pub fn normalize_language<'a>(&'a self, language: &'a str) -> &'a str {
        if self.has_language(language) {
            language
        } else {
            &self.default_language
        }
    }
}

/// An immutable table of country metadata with a `ZZ` fallback record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub(crate) countries: BTreeMap<String, CountryMetadata>,
    pub(crate) fallback: CountryMetadata,
}

static GLOBAL: OnceLock<Metadata> = OnceLock::new();

impl Metadata {
    /// Returns the built-in table, loading it on first use.
    ///
    /// # Panics
    ///
    /// Panics if the embedded table is corrupt, which only a broken build
    /// can cause.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| {
            let metadata = Self::from_json(BUILTIN_METADATA_JSON)
                .unwrap_or_else(|e| panic!("built-in address metadata is corrupt: {e}"));
            debug!(countries = metadata.countries.len(), "loaded built-in address metadata");
            metadata
        })
    }

    /// Returns the metadata for `code`, or the `ZZ` record for unknown codes.
    ///
    /// Never fails: an unknown code gets the generic rules.
    #[must_use]
    pub fn country(&self, code: &str) -> &CountryMetadata {
        self.countries.get(code).unwrap_or(&self.fallback)
    }

    /// Returns true if `code` has its own record. `ZZ` is not a country.
    #[must_use]
    pub fn has_country(&self, code: &str) -> bool {
        self.countries.contains_key(code)
    }

    /// Returns the fallback record.
    #[must_use]
    pub fn fallback(&self) -> &CountryMetadata {
        &self.fallback
    }

    /// Iterates the countries in code order, excluding `ZZ`.
    pub fn countries(&self) -> impl Iterator<Item = &CountryMetadata> {
        self.countries.values()
    }

    /// Returns `language` if `code` has subdivision names in it, else the
    /// country's default language.
    #[must_use]
    pub fn normalize_language<'a>(&'a self, code: &str, language: &'a str) -> &'a str {
        self.country(code).normalize_language(language)
    }

    /// Returns the name of an administrative area in `language`.
    ///
    /// Falls back to the default language when the country has no names
    /// in `language`. `None` if the area is unknown.
    #[must_use]
    pub fn administrative_area_name(&self, code: &str, area: &str, language: &str) -> Option<&str> {
        let country = self.country(code);
        country
            .administrative_area(country.normalize_language(language), area)
            .map(AdministrativeArea::name)
    }

    /// Returns the name of a locality in `language`.
    #[must_use]
    pub fn locality_name(
        &self,
        code: &str,
        area: &str,
        locality: &str,
        language: &str,
    ) -> Option<&str> {
        let country = self.country(code);
        country
            .administrative_area(country.normalize_language(language), area)?
            .locality(locality)
            .map(Locality::name)
    }

    /// Returns the name of a dependent locality in `language`.
    #[must_use]
    pub fn dependent_locality_name(
        &self,
        code: &str,
        area: &str,
        locality: &str,
        dependent_locality: &str,
        language: &str,
    ) -> Option<&str> {
        let country = self.country(code);
        country
            .administrative_area(country.normalize_language(language), area)?
            .locality(locality)?
            .dependent_locality(dependent_locality)
            .map(DependentLocality::name)
    }

    /// Returns the postal key of an administrative area, looked up in the
    /// default language.
    #[must_use]
    pub fn administrative_area_postal_key(&self, code: &str, area: &str) -> Option<&str> {
        let country = self.country(code);
        country
            .administrative_area(&country.default_language, area)?
            .postal_key()
    }

    /// Lists every country with its display name in `language`, ordered by
    /// `collator`.
    ///
    /// Names missing in `language` fall back to English, then to the code.
    #[must_use]
    pub fn list_countries(
        &self,
        names: &dyn RegionNamer,
        collator: &dyn Collator,
        language: &str,
    ) -> Vec<CountryListing> {
        let mut listing: Vec<CountryListing> = self
            .countries
            .keys()
            .map(|code| CountryListing {
                name: names
                    .region_name_or_english(code, language)
                    .unwrap_or_else(|| code.clone()),
                code: code.clone(),
            })
            .collect();
        listing.sort_by(|a, b| match collator.compare(language, &a.name, &b.name) {
            Ordering::Equal => a.code.cmp(&b.code),
            other => other,
        });
        listing
    }
}

/// One entry of [`Metadata::list_countries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryListing {
    /// Country code
    pub code: String,
    /// Localized display name
    pub name: String,
}
