//! Error types for address validation, format parsing and metadata loading.

use std::fmt;

use crate::address::Address;
use crate::field::Field;

/// The kind of a [`ValidationError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// See [`ValidationError::InvalidCountryCode`]
    InvalidCountryCode,
    /// See [`ValidationError::MissingRequiredFields`]
    MissingRequiredFields,
    /// See [`ValidationError::UnsupportedFields`]
    UnsupportedFields,
    /// See [`ValidationError::InvalidAdministrativeArea`]
    InvalidAdministrativeArea,
    /// See [`ValidationError::InvalidLocality`]
    InvalidLocality,
    /// See [`ValidationError::InvalidDependentLocality`]
    InvalidDependentLocality,
    /// See [`ValidationError::InvalidPostCode`]
    InvalidPostCode,
}

/// A single reason an address failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The country code has no metadata entry
    InvalidCountryCode {
        /// The rejected country code
        country: String,
    },
    /// One or more required fields are blank
    MissingRequiredFields {
        /// Country whose rules were applied
        country: String,
        /// The missing fields, in canonical order
        fields: Vec<Field>,
    },
    /// One or more fields are set that the country does not use
    UnsupportedFields {
        /// Country whose rules were applied
        country: String,
        /// The unsupported fields, in canonical order
        fields: Vec<Field>,
    },
    /// The administrative area is not one of the country's subdivisions
    InvalidAdministrativeArea {
        /// Country whose subdivisions were searched
        country: String,
        /// The rejected administrative area
        administrative_area: String,
    },
    /// The locality is not part of the administrative area
    InvalidLocality {
        /// Country whose subdivisions were searched
        country: String,
        /// The administrative area the locality was looked up in
        administrative_area: String,
        /// The rejected locality
        locality: String,
    },
    /// The dependent locality is not part of the locality
    InvalidDependentLocality {
        /// Country whose subdivisions were searched
        country: String,
        /// The locality the dependent locality was looked up in
        locality: String,
        /// The rejected dependent locality
        dependent_locality: String,
    },
    /// The post code does not match the country or subdivision pattern
    InvalidPostCode {
        /// Country whose patterns were applied
        country: String,
        /// The rejected post code
        post_code: String,
    },
}

impl ValidationError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::InvalidCountryCode { .. } => ValidationErrorKind::InvalidCountryCode,
            Self::MissingRequiredFields { .. } => ValidationErrorKind::MissingRequiredFields,
            Self::UnsupportedFields { .. } => ValidationErrorKind::UnsupportedFields,
            Self::InvalidAdministrativeArea { .. } => {
                ValidationErrorKind::InvalidAdministrativeArea
            }
            Self::InvalidLocality { .. } => ValidationErrorKind::InvalidLocality,
            Self::InvalidDependentLocality { .. } => ValidationErrorKind::InvalidDependentLocality,
            Self::InvalidPostCode { .. } => ValidationErrorKind::InvalidPostCode,
        }
    }

    /// Returns the fields carried by a missing/unsupported fields error.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        match self {
            Self::MissingRequiredFields { fields, .. } | Self::UnsupportedFields { fields, .. } => {
                fields
            }
            _ => &[],
        }
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCountryCode { country } => write!(f, "invalid country code '{country}'"),
            Self::MissingRequiredFields { country, fields } => write!(
                f,
                "missing fields required in {country}: {}",
                join_fields(fields)
            ),
            Self::UnsupportedFields { country, fields } => write!(
                f,
                "fields not used in {country}: {}",
                join_fields(fields)
            ),
            Self::InvalidAdministrativeArea {
                country,
                administrative_area,
            } => write!(
                f,
                "invalid administrative area '{administrative_area}' for {country}"
            ),
            Self::InvalidLocality {
                country,
                administrative_area,
                locality,
            } => write!(
                f,
                "invalid locality '{locality}' in administrative area '{administrative_area}' of {country}"
            ),
            Self::InvalidDependentLocality {
                country,
                locality,
                dependent_locality,
            } => write!(
                f,
                "invalid dependent locality '{dependent_locality}' in locality '{locality}' of {country}"
            ),
            Self::InvalidPostCode { country, post_code } => {
                write!(f, "invalid post code '{post_code}' for {country}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Every validation failure found in one pass over an address.
///
/// Never empty: a successful validation returns `Ok(())` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Wraps a list of errors, returning `None` if it is empty.
    #[must_use]
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// Returns the errors as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ValidationError] {
        &self.0
    }

    /// Iterates the errors in detection order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no errors. Never true for a value
    /// returned by validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if any error has the given kind.
    #[must_use]
    pub fn contains(&self, kind: ValidationErrorKind) -> bool {
        self.0.iter().any(|e| e.kind() == kind)
    }

    /// Returns the first error of the given kind.
    #[must_use]
    pub fn find(&self, kind: ValidationErrorKind) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.kind() == kind)
    }

    /// Consumes the aggregate, returning the underlying list.
    #[must_use]
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Returned by [`AddressBuilder::build_valid`](crate::AddressBuilder::build_valid)
/// when the constructed address fails validation.
///
/// The address is handed back alongside the errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAddress {
    address: Address,
    errors: ValidationErrors,
}

impl InvalidAddress {
    pub(crate) fn new(address: Address, errors: ValidationErrors) -> Self {
        Self { address, errors }
    }

    /// Returns the address that failed validation.
    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Returns the validation failures.
    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Splits into the address and its validation failures.
    #[must_use]
    pub fn into_parts(self) -> (Address, ValidationErrors) {
        (self.address, self.errors)
    }
}

impl fmt::Display for InvalidAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid address: {}", self.errors)
    }
}

impl std::error::Error for InvalidAddress {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.errors)
    }
}

/// Errors for address format string parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    /// The format string that failed to parse
    pub format: String,
    /// The specific error that occurred
    pub kind: FormatErrorKind,
}

/// Specific format string errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// A `%` at the end of the string
    DanglingPercent {
        /// Byte offset of the `%`
        position: usize,
    },
    /// A `%` followed by something other than a known directive
    UnknownDirective {
        /// The character after the `%`
        directive: char,
        /// Byte offset of the `%`
        position: usize,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid address format '{}': ", self.format)?;
        match &self.kind {
            FormatErrorKind::DanglingPercent { position } => {
                write!(f, "dangling '%' at position {position}")
            }
            FormatErrorKind::UnknownDirective {
                directive,
                position,
            } => write!(f, "unknown directive '%{directive}' at position {position}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Errors raised while loading a metadata table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// The input is not a well-formed table
    Decode {
        /// Line of the error in the input
        line: usize,
        /// Column of the error in the input
        column: usize,
        /// Decoder message
        message: String,
    },
    /// The table has no `ZZ` fallback record
    MissingFallback,
    /// A record is keyed under a different code than its id
    CountryIdMismatch {
        /// The table key
        key: String,
        /// The record's own id
        id: String,
    },
    /// A format string failed to parse
    InvalidFormat {
        /// Country owning the format
        country: String,
        /// The parse failure
        error: FormatError,
    },
    /// The latinized format references a different number of fields
    LatinizedFieldMismatch {
        /// Country owning the formats
        country: String,
        /// Fields in the native format
        native: usize,
        /// Fields in the latinized format
        latinized: usize,
    },
    /// Two languages list different subdivision ids
    SubdivisionMismatch {
        /// Country owning the subdivisions
        country: String,
        /// Language whose list differs from the default language's
        language: String,
    },
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode {
                line,
                column,
                message,
            } => write!(f, "malformed metadata at {line}:{column}: {message}"),
            Self::MissingFallback => write!(f, "metadata has no fallback record 'ZZ'"),
            Self::CountryIdMismatch { key, id } => {
                write!(f, "metadata record keyed '{key}' has id '{id}'")
            }
            Self::InvalidFormat { country, error } => write!(f, "{country}: {error}"),
            Self::LatinizedFieldMismatch {
                country,
                native,
                latinized,
            } => write!(
                f,
                "{country}: latinized format has {latinized} fields, native format has {native}"
            ),
            Self::SubdivisionMismatch { country, language } => write!(
                f,
                "{country}: subdivisions for language '{language}' differ from the default language"
            ),
        }
    }
}

impl std::error::Error for MetadataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidFormat { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MetadataError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_fields() {
        let err = ValidationError::MissingRequiredFields {
            country: "AU".into(),
            fields: vec![Field::StreetAddress, Field::PostCode],
        };
        assert_eq!(
            err.to_string(),
            "missing fields required in AU: street_address, post_code"
        );
        assert_eq!(err.fields(), &[Field::StreetAddress, Field::PostCode]);
    }

    #[test]
    fn aggregate_rejects_empty() {
        assert!(ValidationErrors::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn aggregate_display_joins_messages() {
        let errors = ValidationErrors::from_vec(vec![
            ValidationError::InvalidCountryCode { country: "QQ".into() },
            ValidationError::InvalidPostCode {
                country: "AU".into(),
                post_code: "x".into(),
            },
        ])
        .unwrap();
        assert_eq!(
            errors.to_string(),
            "invalid country code 'QQ'; invalid post code 'x' for AU"
        );
        assert!(errors.contains(ValidationErrorKind::InvalidPostCode));
        assert!(!errors.contains(ValidationErrorKind::InvalidLocality));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn format_error_display() {
        let err = FormatError {
            format: "%N%q".into(),
            kind: FormatErrorKind::UnknownDirective {
                directive: 'q',
                position: 2,
            },
        };
        assert_eq!(
            err.to_string(),
            "invalid address format '%N%q': unknown directive '%q' at position 2"
        );
    }
}
