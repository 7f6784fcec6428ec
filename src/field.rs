//! Address fields, their presentational labels, and field sets.

use std::fmt;
use std::str::FromStr;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A semantic address component.
///
/// Each field has a short format key used in address format strings
/// (`%N`, `%A`, ...). The key is distinct from the field's identity; see
/// [`Field::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// The country (rendered from the country code).
    Country,
    /// Recipient name.
    Name,
    /// Organization or company.
    Organization,
    /// Street address lines.
    StreetAddress,
    /// Suburb, neighborhood or district within a locality.
    DependentLocality,
    /// City or town.
    Locality,
    /// State, province or other top-level subdivision.
    AdministrativeArea,
    /// Postal code.
    PostCode,
    /// Sorting code (CEDEX and similar).
    SortingCode,
}

impl Field {
    /// All fields in canonical order.
    pub const ALL: [Self; 9] = [
        Self::Country,
        Self::Name,
        Self::Organization,
        Self::StreetAddress,
        Self::DependentLocality,
        Self::Locality,
        Self::AdministrativeArea,
        Self::PostCode,
        Self::SortingCode,
    ];

    /// Returns the format key of this field.
    ///
    /// # Examples
    ///
    /// ```
    /// use intl_address::Field;
    ///
    /// assert_eq!(Field::PostCode.key(), "Z");
    /// assert_eq!(Field::Country.key(), "country");
    /// ```
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Name => "N",
            Self::Organization => "O",
            Self::StreetAddress => "A",
            Self::DependentLocality => "D",
            Self::Locality => "C",
            Self::AdministrativeArea => "S",
            Self::PostCode => "Z",
            Self::SortingCode => "X",
        }
    }

    /// Looks up a field by its format key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Returns the snake-case name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Name => "name",
            Self::Organization => "organization",
            Self::StreetAddress => "street_address",
            Self::DependentLocality => "dependent_locality",
            Self::Locality => "locality",
            Self::AdministrativeArea => "administrative_area",
            Self::PostCode => "post_code",
            Self::SortingCode => "sorting_code",
        }
    }

    /// Returns the CSS class used for this field in markup output.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Name => "name",
            Self::Organization => "organization",
            Self::StreetAddress => "address-line",
            Self::DependentLocality => "dependent-locality",
            Self::Locality => "locality",
            Self::AdministrativeArea => "administrative-area",
            Self::PostCode => "post-code",
            Self::SortingCode => "sorting-code",
        }
    }

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown field or field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldError {
    /// The rejected input
    pub input: String,
}

impl fmt::Display for UnknownFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown address field '{}'", self.input)
    }
}

impl std::error::Error for UnknownFieldError {}

impl FromStr for Field {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownFieldError { input: s.to_string() })
    }
}

/// What a country calls one of its subdivision or post code fields.
///
/// Purely presentational: the validator and formatter never branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    /// "Area"
    Area,
    /// "City"
    City,
    /// "County"
    County,
    /// "Department"
    Department,
    /// "District"
    District,
    /// "Do/Si" (Korea)
    DoSi,
    /// "Eircode" (Ireland)
    Eircode,
    /// "Emirate"
    Emirate,
    /// "Island"
    Island,
    /// "Neighborhood"
    Neighborhood,
    /// "Oblast"
    Oblast,
    /// "PIN code" (India)
    #[serde(rename = "pin")]
    PinCode,
    /// "Parish"
    Parish,
    /// "Post town"
    PostTown,
    /// "Postal code"
    #[serde(rename = "postal")]
    PostalCode,
    /// "Prefecture"
    Prefecture,
    /// "Province"
    Province,
    /// "State"
    State,
    /// "Suburb"
    Suburb,
    /// "Townland"
    Townland,
    /// "Village/Township"
    VillageTownship,
    /// "ZIP code"
    #[serde(rename = "zip")]
    ZipCode,
}

impl FieldName {
    const ALL: [Self; 22] = [
        Self::Area,
        Self::City,
        Self::County,
        Self::Department,
        Self::District,
        Self::DoSi,
        Self::Eircode,
        Self::Emirate,
        Self::Island,
        Self::Neighborhood,
        Self::Oblast,
        Self::PinCode,
        Self::Parish,
        Self::PostTown,
        Self::PostalCode,
        Self::Prefecture,
        Self::Province,
        Self::State,
        Self::Suburb,
        Self::Townland,
        Self::VillageTownship,
        Self::ZipCode,
    ];

    /// Returns the data key of this label (`state`, `do_si`, `zip`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::City => "city",
            Self::County => "county",
            Self::Department => "department",
            Self::District => "district",
            Self::DoSi => "do_si",
            Self::Eircode => "eircode",
            Self::Emirate => "emirate",
            Self::Island => "island",
            Self::Neighborhood => "neighborhood",
            Self::Oblast => "oblast",
            Self::PinCode => "pin",
            Self::Parish => "parish",
            Self::PostTown => "post_town",
            Self::PostalCode => "postal",
            Self::Prefecture => "prefecture",
            Self::Province => "province",
            Self::State => "state",
            Self::Suburb => "suburb",
            Self::Townland => "townland",
            Self::VillageTownship => "village_township",
            Self::ZipCode => "zip",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| UnknownFieldError { input: s.to_string() })
    }
}

/// A set of [`Field`]s with constant-time membership tests.
///
/// Iteration yields fields in canonical order regardless of insertion order.
///
/// # Examples
///
/// ```
/// use intl_address::{Field, FieldSet};
///
/// let set: FieldSet = [Field::PostCode, Field::Locality].into_iter().collect();
/// assert!(set.contains(Field::Locality));
/// assert_eq!(set.iter().collect::<Vec<_>>(), vec![Field::Locality, Field::PostCode]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldSet(u16);

impl FieldSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Adds a field to the set.
    pub fn insert(&mut self, field: Field) {
        self.0 |= field.bit();
    }

    /// Returns a copy of the set with `field` added.
    #[must_use]
    pub const fn with(self, field: Field) -> Self {
        Self(self.0 | field.bit())
    }

    /// Returns true if the set contains `field`.
    #[must_use]
    pub const fn contains(self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of fields in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the fields in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<Field> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut set = Self::new();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

impl Extend<Field> for FieldSet {
    fn extend<I: IntoIterator<Item = Field>>(&mut self, iter: I) {
        for field in iter {
            self.insert(field);
        }
    }
}

impl Serialize for FieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for FieldSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Field>::deserialize(deserializer).map(|fields| fields.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("Q"), None);
    }

    #[test]
    fn field_from_str() {
        assert_eq!("street_address".parse::<Field>().unwrap(), Field::StreetAddress);
        assert!("street".parse::<Field>().is_err());
    }

    #[test]
    fn field_name_strings() {
        assert_eq!(FieldName::DoSi.as_str(), "do_si");
        assert_eq!("pin".parse::<FieldName>().unwrap(), FieldName::PinCode);
        assert_eq!("zip".parse::<FieldName>().unwrap(), FieldName::ZipCode);
        assert_eq!(serde_json::to_string(&FieldName::PostalCode).unwrap(), "\"postal\"");
    }

    #[test]
    fn set_membership() {
        let mut set = FieldSet::new();
        assert!(set.is_empty());
        set.insert(Field::SortingCode);
        set.insert(Field::Name);
        set.insert(Field::Name);
        assert_eq!(set.len(), 2);
        assert!(set.contains(Field::Name));
        assert!(!set.contains(Field::Country));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Field::Name, Field::SortingCode]);
    }

    #[test]
    fn set_serializes_as_field_list() {
        let set = FieldSet::new().with(Field::PostCode).with(Field::StreetAddress);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["street_address","post_code"]"#);
        let back: FieldSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
