//! Region display names and name ordering.
//!
//! The formatter and [`Metadata::list_countries`](crate::Metadata::list_countries)
//! take these as trait objects so callers can plug in a full locale
//! database. The built-in tables hold CLDR display names for English,
//! French, Chinese and every default language in the built-in metadata.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::constants::{BUILTIN_REGION_NAMES_JSON, ENGLISH};
use crate::error::MetadataError;

/// Looks up display names of regions.
pub trait RegionNamer: Send + Sync {
    /// Returns the name of `region` in `language`, or `None` if unknown.
    fn region_name(&self, region: &str, language: &str) -> Option<String>;

    /// Like [`region_name`](Self::region_name), falling back to English.
    fn region_name_or_english(&self, region: &str, language: &str) -> Option<String> {
        self.region_name(region, language).or_else(|| {
            debug!(region, language, "no region name in language, using English");
            self.region_name(region, ENGLISH)
        })
    }
}

/// Orders display names for a language.
pub trait Collator: Send + Sync {
    /// Compares two names under the sort rules of `language`.
    fn compare(&self, language: &str, a: &str, b: &str) -> Ordering;
}

/// Compares case-folded names, then raw names.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseFoldCollator;

impl Collator for CaseFoldCollator {
    fn compare(&self, _language: &str, a: &str, b: &str) -> Ordering {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    }
}

/// Region names loaded from a `{"language": {"REGION": "name"}}` table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuiltinRegionNames {
    tables: BTreeMap<String, BTreeMap<String, String>>,
}

static GLOBAL: OnceLock<BuiltinRegionNames> = OnceLock::new();

impl BuiltinRegionNames {
    /// Returns the built-in tables, loading them on first use.
    ///
    /// # Panics
    ///
    /// Panics if the embedded table is corrupt.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| {
            Self::from_json(BUILTIN_REGION_NAMES_JSON)
                .unwrap_or_else(|e| panic!("built-in region names are corrupt: {e}"))
        })
    }

    /// Loads name tables from JSON.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Decode` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        let tables: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(json)?;
        debug!(languages = tables.len(), "loaded region names");
        Ok(Self { tables })
    }

    /// Returns the languages with a table.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    fn lookup(&self, region: &str, language: &str) -> Option<&str> {
        self.tables.get(language)?.get(region).map(String::as_str)
    }
}

impl RegionNamer for BuiltinRegionNames {
    /// Tries the exact tag, then its primary subtag (`fr-CA` → `fr`).
    fn region_name(&self, region: &str, language: &str) -> Option<String> {
        self.lookup(region, language)
            .or_else(|| {
                let base = language.split(['-', '_']).next()?;
                (base != language).then(|| self.lookup(region, base)).flatten()
            })
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_base_language() {
        let names = BuiltinRegionNames::global();
        assert_eq!(names.region_name("AU", "en").as_deref(), Some("Australia"));
        assert_eq!(names.region_name("AU", "fr").as_deref(), Some("Australie"));
        assert_eq!(names.region_name("AU", "fr-CA").as_deref(), Some("Australie"));
        assert_eq!(names.region_name("CN", "zh-Hans").as_deref(), Some("中国"));
        assert_eq!(names.region_name("AU", "tvl"), None);
        assert_eq!(names.region_name("QQ", "en"), None);
    }

    #[test]
    fn english_fallback() {
        let names = BuiltinRegionNames::global();
        assert_eq!(names.region_name_or_english("TV", "tvl").as_deref(), Some("Tuvalu"));
        assert_eq!(names.region_name_or_english("QQ", "fr"), None);
    }

    #[test]
    fn script_subtags_pick_their_own_table() {
        let names = BuiltinRegionNames::global();
        assert_eq!(names.region_name("TW", "zh-Hant").as_deref(), Some("台灣"));
        assert_eq!(names.region_name("TW", "zh").as_deref(), Some("台湾"));
        assert_eq!(names.region_name("RS", "sr-Latn").as_deref(), Some("Srbija"));
        assert_eq!(names.region_name("RS", "sr").as_deref(), Some("Србија"));
        assert_eq!(names.region_name("DE", "de-AT").as_deref(), Some("Deutschland"));
    }

    #[test]
    fn every_default_language_resolves() {
        let names = BuiltinRegionNames::global();
        for country in crate::Metadata::global().countries() {
            let language = country.default_language();
            let name = names.region_name_or_english(country.id(), language);
            assert!(name.is_some(), "{} in {language}", country.id());
        }
        assert_eq!(names.region_name("JP", "ja").as_deref(), Some("日本"));
        assert_eq!(names.region_name("KR", "ko").as_deref(), Some("대한민국"));
    }

    #[test]
    fn custom_table() {
        let names = BuiltinRegionNames::from_json(r#"{"xx": {"AU": "Ostrali"}}"#).unwrap();
        assert_eq!(names.region_name("AU", "xx").as_deref(), Some("Ostrali"));
        assert_eq!(names.languages().collect::<Vec<_>>(), vec!["xx"]);
    }

    #[test]
    fn case_fold_collation() {
        let c = CaseFoldCollator;
        assert_eq!(c.compare("en", "alpha", "Beta"), Ordering::Less);
        assert_eq!(c.compare("en", "Alpha", "alpha"), Ordering::Less);
        assert_eq!(c.compare("en", "same", "same"), Ordering::Equal);
    }
}
