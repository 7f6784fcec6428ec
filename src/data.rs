//! Storage schema for metadata tables.
//!
//! Tables are JSON objects of the form `{"countries": {"AU": {...}, ...}}`.
//! Records may leave out anything they share with the `ZZ` record; loading
//! fills those gaps and checks the table for consistency.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::constants::FALLBACK_COUNTRY;
use crate::error::MetadataError;
use crate::field::{FieldName, FieldSet};
use crate::metadata::{AdministrativeArea, CountryMetadata, Metadata, PostCodeRegex};
use crate::template::AddressFormat;

#[derive(Debug, Serialize, Deserialize)]
struct Table {
    countries: BTreeMap<String, CountryRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CountryRecord {
    #[serde(skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    default_language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latinized_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    administrative_area_name_type: Option<FieldName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locality_name_type: Option<FieldName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dependent_locality_name_type: Option<FieldName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    post_code_name_type: Option<FieldName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed: Option<FieldSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<FieldSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upper: Option<FieldSet>,
    #[serde(skip_serializing_if = "String::is_empty")]
    post_code_prefix: String,
    #[serde(skip_serializing_if = "is_default")]
    post_code_regex: PostCodeRegex,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    administrative_areas: BTreeMap<String, Vec<AdministrativeArea>>,
}

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

fn parse_format(country: &str, format: &str) -> Result<AddressFormat, MetadataError> {
    AddressFormat::parse(format).map_err(|error| MetadataError::InvalidFormat {
        country: country.to_string(),
        error,
    })
}

/// Flattens a subdivision list into the set of id paths it defines.
fn id_paths(areas: &[AdministrativeArea]) -> BTreeSet<[&str; 3]> {
    let mut paths = BTreeSet::new();
    for area in areas {
        paths.insert([area.id(), "", ""]);
        for locality in area.localities() {
            paths.insert([area.id(), locality.id(), ""]);
            for dependent in locality.dependent_localities() {
                paths.insert([area.id(), locality.id(), dependent.id()]);
            }
        }
    }
    paths
}

impl CountryRecord {
    /// Resolves the record, filling gaps from `fallback` (`None` for `ZZ` itself).
    fn resolve(
        self,
        key: &str,
        fallback: Option<&CountryMetadata>,
    ) -> Result<CountryMetadata, MetadataError> {
        let id = if self.id.is_empty() { key.to_string() } else { self.id };
        if id != key {
            return Err(MetadataError::CountryIdMismatch {
                key: key.to_string(),
                id,
            });
        }

        let format = match (self.format, fallback) {
            (Some(format), _) => parse_format(&id, &format)?,
            (None, Some(fallback)) => fallback.format.clone(),
            (None, None) => return Err(MetadataError::MissingFallback),
        };
        let latinized_format = self
            .latinized_format
            .map(|f| parse_format(&id, &f))
            .transpose()?;
        if let Some(latinized) = &latinized_format {
            let native = format.fields().len();
            let latin = latinized.fields().len();
            if native != latin {
                return Err(MetadataError::LatinizedFieldMismatch {
                    country: id,
                    native,
                    latinized: latin,
                });
            }
        }

        let default_language = match (self.default_language.is_empty(), fallback) {
            (true, Some(fallback)) => fallback.default_language.clone(),
            _ => self.default_language,
        };

        if let Some(reference) = self
            .administrative_areas
            .get(&default_language)
            .or_else(|| self.administrative_areas.values().next())
        {
            let expected = id_paths(reference);
            for (language, areas) in &self.administrative_areas {
                if id_paths(areas) != expected {
                    return Err(MetadataError::SubdivisionMismatch {
                        country: id,
                        language: language.clone(),
                    });
                }
            }
        }

        let name_type = |own: Option<FieldName>, pick: fn(&CountryMetadata) -> FieldName, default| {
            own.or_else(|| fallback.map(pick)).unwrap_or(default)
        };
        let field_set = |own: Option<FieldSet>, pick: fn(&CountryMetadata) -> FieldSet| {
            own.or_else(|| fallback.map(pick)).unwrap_or_default()
        };

        Ok(CountryMetadata {
            administrative_area_name_type: name_type(
                self.administrative_area_name_type,
                CountryMetadata::administrative_area_name_type,
                FieldName::Province,
            ),
            locality_name_type: name_type(
                self.locality_name_type,
                CountryMetadata::locality_name_type,
                FieldName::City,
            ),
            dependent_locality_name_type: name_type(
                self.dependent_locality_name_type,
                CountryMetadata::dependent_locality_name_type,
                FieldName::Suburb,
            ),
            post_code_name_type: name_type(
                self.post_code_name_type,
                CountryMetadata::post_code_name_type,
                FieldName::PostalCode,
            ),
            allowed: self.allowed.unwrap_or_else(|| format.fields()),
            required: field_set(self.required, CountryMetadata::required_fields),
            upper: field_set(self.upper, CountryMetadata::upper_fields),
            id,
            default_language,
            format,
            latinized_format,
            post_code_prefix: self.post_code_prefix,
            post_code_regex: self.post_code_regex,
            administrative_areas: self.administrative_areas,
        })
    }

    fn from_metadata(country: &CountryMetadata) -> Self {
        Self {
            id: country.id.clone(),
            default_language: country.default_language.clone(),
            format: Some(country.format.to_string()),
            latinized_format: country.latinized_format.as_ref().map(ToString::to_string),
            administrative_area_name_type: Some(country.administrative_area_name_type),
            locality_name_type: Some(country.locality_name_type),
            dependent_locality_name_type: Some(country.dependent_locality_name_type),
            post_code_name_type: Some(country.post_code_name_type),
            allowed: Some(country.allowed),
            required: Some(country.required),
            upper: Some(country.upper),
            post_code_prefix: country.post_code_prefix.clone(),
            post_code_regex: country.post_code_regex.clone(),
            administrative_areas: country.administrative_areas.clone(),
        }
    }
}

impl Metadata {
    /// Loads a metadata table from JSON.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError` if the JSON is malformed (including invalid
    /// post code patterns), the `ZZ` record is missing, a format string
    /// does not parse, a latinized format uses a different number of
    /// fields than the native one, or two languages disagree on a
    /// country's subdivision ids.
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        let mut table: Table = serde_json::from_str(json)?;

        let fallback = table
            .countries
            .remove(FALLBACK_COUNTRY)
            .ok_or(MetadataError::MissingFallback)?
            .resolve(FALLBACK_COUNTRY, None)?;

        let mut countries = BTreeMap::new();
        for (code, record) in table.countries {
            let country = record.resolve(&code, Some(&fallback))?;
            trace!(country = %code, languages = country.administrative_areas.len(), "resolved country metadata");
            countries.insert(code, country);
        }

        debug!(countries = countries.len(), "loaded address metadata");
        Ok(Self {
            countries,
            fallback,
        })
    }

    /// Serializes the table to JSON with every record fully spelled out.
    ///
    /// [`Metadata::from_json`] reads the output back into an equal table.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Decode` if serialization fails.
    pub fn to_json(&self) -> Result<String, MetadataError> {
        let countries = self
            .countries
            .iter()
            .chain(std::iter::once((&self.fallback.id, &self.fallback)))
            .map(|(code, country)| (code.clone(), CountryRecord::from_metadata(country)))
            .collect();
        Ok(serde_json::to_string_pretty(&Table { countries })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    const ZZ: &str = r#""ZZ": {"default_language": "en", "format": "%N%n%O%n%A%n%C",
        "required": ["street_address", "locality"], "upper": ["locality"]}"#;

    fn table(records: &str) -> String {
        format!(r#"{{"countries": {{{ZZ}{records}}}}}"#)
    }

    #[test]
    fn minimal_table_loads() {
        let metadata = Metadata::from_json(&table(
            r#", "XA": {"default_language": "xx", "format": "%N%n%A%n%Z %C", "required": ["post_code"]}"#,
        ))
        .unwrap();
        let xa = metadata.country("XA");
        assert_eq!(xa.id(), "XA");
        assert_eq!(xa.required_fields().iter().collect::<Vec<_>>(), vec![Field::PostCode]);
        assert_eq!(xa.upper_fields().iter().collect::<Vec<_>>(), vec![Field::Locality]);
        assert_eq!(xa.locality_name_type(), FieldName::City);
        assert!(xa.allowed_fields().contains(Field::PostCode));
        assert!(!xa.allowed_fields().contains(Field::Organization));
    }

    #[test]
    fn missing_fallback_is_rejected() {
        let err = Metadata::from_json(r#"{"countries": {}}"#).unwrap_err();
        assert_eq!(err, MetadataError::MissingFallback);
    }

    #[test]
    fn bad_json_reports_position() {
        let err = Metadata::from_json("{\"countries\": ").unwrap_err();
        assert!(matches!(err, MetadataError::Decode { line: 1, .. }));
    }

    #[test]
    fn bad_regex_is_rejected() {
        let err = Metadata::from_json(&table(
            r#", "XA": {"post_code_regex": {"regex": "^(\\d{4}$"}}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, MetadataError::Decode { .. }));
    }

    #[test]
    fn bad_format_is_rejected() {
        let err = Metadata::from_json(&table(r#", "XA": {"format": "%N%q"}"#)).unwrap_err();
        assert!(matches!(err, MetadataError::InvalidFormat { ref country, .. } if country == "XA"));
    }

    #[test]
    fn latinized_field_count_must_match() {
        let err = Metadata::from_json(&table(
            r#", "XA": {"format": "%N%n%A%n%C", "latinized_format": "%N%n%A"}"#,
        ))
        .unwrap_err();
        assert_eq!(
            err,
            MetadataError::LatinizedFieldMismatch {
                country: "XA".into(),
                native: 3,
                latinized: 2,
            }
        );
    }

    #[test]
    fn subdivision_ids_must_agree_across_languages() {
        let err = Metadata::from_json(&table(
            r#", "XA": {"default_language": "xx", "administrative_areas": {
                "xx": [{"id": "A", "name": "Aa"}, {"id": "B", "name": "Bb"}],
                "en": [{"id": "A", "name": "Ay"}]}}"#,
        ))
        .unwrap_err();
        assert_eq!(
            err,
            MetadataError::SubdivisionMismatch {
                country: "XA".into(),
                language: "en".into(),
            }
        );
    }

    #[test]
    fn id_mismatch_is_rejected() {
        let err = Metadata::from_json(&table(r#", "XA": {"id": "XB"}"#)).unwrap_err();
        assert!(matches!(err, MetadataError::CountryIdMismatch { .. }));
    }

    #[test]
    fn builtin_table_round_trips() {
        let metadata = Metadata::global();
        let json = metadata.to_json().unwrap();
        let reloaded = Metadata::from_json(&json).unwrap();
        assert_eq!(&reloaded, metadata);
    }
}
