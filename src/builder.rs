//! Builder for [`Address`] values.

use crate::address::Address;
use crate::error::InvalidAddress;
use crate::metadata::Metadata;
use crate::validate::validate;

/// A consuming builder for [`Address`].
///
/// [`build`](Self::build) returns the address unchecked;
/// [`build_valid`](Self::build_valid) also runs the validator.
///
/// # Examples
///
/// ```
/// use intl_address::{AddressBuilder, ValidationErrorKind};
///
/// let err = AddressBuilder::new()
///     .country("AU")
///     .street_line("525 Collins Street")
///     .locality("Melbourne")
///     .administrative_area("VIC")
///     .post_code("2000")
///     .build_valid()
///     .unwrap_err();
///
/// assert!(err.errors().contains(ValidationErrorKind::InvalidPostCode));
/// assert_eq!(err.address().post_code(), "2000");
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct AddressBuilder {
    address: Address,
}

impl AddressBuilder {
    /// Creates a builder for an empty address.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the country code. The code is upper-cased.
    pub fn country(mut self, code: impl AsRef<str>) -> Self {
        self.address.country = code.as_ref().to_uppercase();
        self
    }

    /// Sets the recipient name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.address.name = name.into();
        self
    }

    /// Sets the organization.
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.address.organization = organization.into();
        self
    }

    /// Replaces the street address lines.
    pub fn street_address<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.address.street_address = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one street address line.
    pub fn street_line(mut self, line: impl Into<String>) -> Self {
        self.address.street_address.push(line.into());
        self
    }

    /// Sets the dependent locality.
    pub fn dependent_locality(mut self, dependent_locality: impl Into<String>) -> Self {
        self.address.dependent_locality = dependent_locality.into();
        self
    }

    /// Sets the locality.
    pub fn locality(mut self, locality: impl Into<String>) -> Self {
        self.address.locality = locality.into();
        self
    }

    /// Sets the administrative area.
    pub fn administrative_area(mut self, administrative_area: impl Into<String>) -> Self {
        self.address.administrative_area = administrative_area.into();
        self
    }

    /// Sets the post code.
    pub fn post_code(mut self, post_code: impl Into<String>) -> Self {
        self.address.post_code = post_code.into();
        self
    }

    /// Sets the sorting code.
    pub fn sorting_code(mut self, sorting_code: impl Into<String>) -> Self {
        self.address.sorting_code = sorting_code.into();
        self
    }

    /// Builds the address without validating it.
    #[must_use]
    pub fn build(self) -> Address {
        self.address
    }

    /// Builds the address and validates it against the built-in metadata.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress`, holding both the address and every
    /// validation failure, if the address is not valid.
    pub fn build_valid(self) -> Result<Address, InvalidAddress> {
        self.build_valid_with(Metadata::global())
    }

    /// Builds the address and validates it against `metadata`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` if the address is not valid.
    pub fn build_valid_with(self, metadata: &Metadata) -> Result<Address, InvalidAddress> {
        let address = self.address;
        match validate(metadata, &address) {
            Ok(()) => Ok(address),
            Err(errors) => Err(InvalidAddress::new(address, errors)),
        }
    }
}

impl From<Address> for AddressBuilder {
    fn from(address: Address) -> Self {
        Self { address }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_is_uppercased() {
        let address = AddressBuilder::new().country("au").build();
        assert_eq!(address.country(), "AU");
    }

    #[test]
    fn street_lines_accumulate() {
        let address = AddressBuilder::new()
            .street_line("Level 1")
            .street_line("525 Collins Street")
            .build();
        assert_eq!(address.street_address(), ["Level 1", "525 Collins Street"]);

        let address = AddressBuilder::from(address).street_address(["Only"]).build();
        assert_eq!(address.street_address(), ["Only"]);
    }

    #[test]
    fn build_valid_returns_address() {
        let address = AddressBuilder::new()
            .country("AU")
            .street_line("525 Collins Street")
            .locality("Melbourne")
            .administrative_area("VIC")
            .post_code("3000")
            .build_valid()
            .unwrap();
        assert_eq!(address.locality(), "Melbourne");
    }

    #[test]
    fn build_valid_hands_back_invalid_address() {
        let err = AddressBuilder::new().country("QQ").build_valid().unwrap_err();
        let (address, errors) = err.into_parts();
        assert_eq!(address.country(), "QQ");
        assert_eq!(errors.len(), 1);
    }
}
