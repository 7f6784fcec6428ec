//! The address value type.

use crate::builder::AddressBuilder;
use crate::error::ValidationErrors;
use crate::field::Field;
use crate::metadata::Metadata;

/// A postal address.
///
/// Addresses are immutable; construct them with [`AddressBuilder`]. The
/// administrative area, locality and dependent locality hold subdivision
/// ids (for example `VIC` rather than `Victoria`) when the country has
/// subdivision metadata, and free text otherwise.
///
/// # Examples
///
/// ```
/// use intl_address::Address;
///
/// let address = Address::builder()
///     .country("au")
///     .street_line("525 Collins Street")
///     .locality("Melbourne")
///     .administrative_area("VIC")
///     .post_code("3000")
///     .build();
///
/// assert_eq!(address.country(), "AU");
/// assert!(address.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Address {
    pub(crate) country: String,
    pub(crate) name: String,
    pub(crate) organization: String,
    pub(crate) street_address: Vec<String>,
    pub(crate) dependent_locality: String,
    pub(crate) locality: String,
    pub(crate) administrative_area: String,
    pub(crate) post_code: String,
    pub(crate) sorting_code: String,
}

impl Address {
    /// Starts building an address.
    #[must_use]
    pub fn builder() -> AddressBuilder {
        AddressBuilder::new()
    }

    /// Returns the country code.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Returns the recipient name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the organization.
    #[must_use]
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Returns the street address lines.
    #[must_use]
    pub fn street_address(&self) -> &[String] {
        &self.street_address
    }

    /// Returns the dependent locality.
    #[must_use]
    pub fn dependent_locality(&self) -> &str {
        &self.dependent_locality
    }

    /// Returns the locality.
    #[must_use]
    pub fn locality(&self) -> &str {
        &self.locality
    }

    /// Returns the administrative area.
    #[must_use]
    pub fn administrative_area(&self) -> &str {
        &self.administrative_area
    }

    /// Returns the post code.
    #[must_use]
    pub fn post_code(&self) -> &str {
        &self.post_code
    }

    /// Returns the sorting code.
    #[must_use]
    pub fn sorting_code(&self) -> &str {
        &self.sorting_code
    }

    /// Returns the value of a single-line field.
    ///
    /// Returns `None` for [`Field::StreetAddress`], which has several lines.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Country => &self.country,
            Field::Name => &self.name,
            Field::Organization => &self.organization,
            Field::StreetAddress => return None,
            Field::DependentLocality => &self.dependent_locality,
            Field::Locality => &self.locality,
            Field::AdministrativeArea => &self.administrative_area,
            Field::PostCode => &self.post_code,
            Field::SortingCode => &self.sorting_code,
        };
        Some(value)
    }

    /// Returns true if `field` has a value, however blank.
    #[must_use]
    pub fn is_set(&self, field: Field) -> bool {
        match field {
            Field::StreetAddress => !self.street_address.is_empty(),
            other => self.get(other).is_some_and(|v| !v.is_empty()),
        }
    }

    /// Returns true if `field` is empty or whitespace only.
    ///
    /// The street address is blank when every line is.
    #[must_use]
    pub fn is_blank(&self, field: Field) -> bool {
        match field {
            Field::StreetAddress => self.street_address.iter().all(|l| l.trim().is_empty()),
            other => self.get(other).is_none_or(|v| v.trim().is_empty()),
        }
    }

    /// Returns true if no field is set.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        Field::ALL.into_iter().all(|f| !self.is_set(f))
    }

    /// Validates the address against the built-in metadata.
    ///
    /// # Errors
    ///
    /// Returns every validation failure found; see [`validate()`](crate::validate()).
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        crate::validate::validate(Metadata::global(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        assert!(Address::default().is_zero());
    }

    #[test]
    fn any_field_clears_zero() {
        let address = Address::builder().sorting_code("CEDEX 1").build();
        assert!(!address.is_zero());
        let address = Address::builder().street_line("").build();
        assert!(!address.is_zero());
    }

    #[test]
    fn blank_and_set() {
        let address = Address::builder()
            .name("  ")
            .street_address(["", " "])
            .build();
        assert!(address.is_set(Field::Name));
        assert!(address.is_blank(Field::Name));
        assert!(address.is_set(Field::StreetAddress));
        assert!(address.is_blank(Field::StreetAddress));
        assert!(address.is_blank(Field::Locality));
        assert!(!address.is_set(Field::Locality));
    }

    #[test]
    fn get_street_address_is_none() {
        let address = Address::builder().street_line("1 Main St").build();
        assert_eq!(address.get(Field::StreetAddress), None);
        assert_eq!(address.get(Field::Locality), Some(""));
    }
}
