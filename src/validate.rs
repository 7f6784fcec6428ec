//! Address validation.

use tracing::trace;

use crate::address::Address;
use crate::error::{ValidationError, ValidationErrors};
use crate::field::{Field, FieldSet};
use crate::metadata::{AdministrativeArea, Metadata, PostCodeRegex};

/// Validates `address` against `metadata`.
///
/// Every independent check runs and contributes to the result:
///
/// 1. the country must have metadata (if not, nothing else is checked),
/// 2. required fields must be non-blank,
/// 3. set fields must be used by the country,
/// 4. subdivisions must exist in the country's default-language list,
/// 5. the post code must match the country pattern and the patterns of
///    the address's subdivisions.
///
/// Checks 4 and 5 stop at the first level that fails.
///
/// # Errors
///
/// Returns every failure found.
///
/// # Examples
///
/// ```
/// use intl_address::{validate, Address, Metadata, ValidationErrorKind};
///
/// let address = Address::builder()
///     .country("AU")
///     .street_line("525 Collins Street")
///     .locality("Melbourne")
///     .administrative_area("VIC")
///     .post_code("2000")
///     .build();
///
/// let errors = validate(Metadata::global(), &address).unwrap_err();
/// assert!(errors.contains(ValidationErrorKind::InvalidPostCode));
/// ```
pub fn validate(metadata: &Metadata, address: &Address) -> Result<(), ValidationErrors> {
    let code = address.country();
    let mut errors = Vec::new();

    if metadata.has_country(code) {
        let country = metadata.country(code);

        errors.extend(check_required_fields(address, country.required_fields()));
        errors.extend(check_allowed_fields(address, country.allowed_fields()));

        if let Some(areas) = country.default_administrative_areas() {
            errors.extend(check_subdivisions(address, areas));
        }

        if !address.is_blank(Field::PostCode) {
            errors.extend(check_post_code(address, country.post_code_regex()));
        }
    } else {
        errors.push(ValidationError::InvalidCountryCode {
            country: code.to_string(),
        });
    }

    for error in &errors {
        trace!(country = code, kind = ?error.kind(), "address validation failure");
    }

    ValidationErrors::from_vec(errors).map_or(Ok(()), Err)
}

fn check_required_fields(address: &Address, required: FieldSet) -> Option<ValidationError> {
    let missing: Vec<Field> = required
        .iter()
        .filter(|f| *f != Field::Country && address.is_blank(*f))
        .collect();

    (!missing.is_empty()).then(|| ValidationError::MissingRequiredFields {
        country: address.country().to_string(),
        fields: missing,
    })
}

fn check_allowed_fields(address: &Address, allowed: FieldSet) -> Option<ValidationError> {
    let unsupported: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|f| *f != Field::Country && address.is_set(*f) && !allowed.contains(*f))
        .collect();

    (!unsupported.is_empty()).then(|| ValidationError::UnsupportedFields {
        country: address.country().to_string(),
        fields: unsupported,
    })
}

fn check_subdivisions(address: &Address, areas: &[AdministrativeArea]) -> Option<ValidationError> {
    let area_id = address.administrative_area();
    if area_id.is_empty() {
        return None;
    }

    let Some(area) = areas.iter().find(|a| a.id() == area_id) else {
        return Some(ValidationError::InvalidAdministrativeArea {
            country: address.country().to_string(),
            administrative_area: area_id.to_string(),
        });
    };

    let locality_id = address.locality();
    if locality_id.is_empty() || area.localities().is_empty() {
        return None;
    }

    let Some(locality) = area.locality(locality_id) else {
        return Some(ValidationError::InvalidLocality {
            country: address.country().to_string(),
            administrative_area: area_id.to_string(),
            locality: locality_id.to_string(),
        });
    };

    let dependent_id = address.dependent_locality();
    if dependent_id.is_empty() || locality.dependent_localities().is_empty() {
        return None;
    }

    match locality.dependent_locality(dependent_id) {
        Some(_) => None,
        None => Some(ValidationError::InvalidDependentLocality {
            country: address.country().to_string(),
            locality: locality_id.to_string(),
            dependent_locality: dependent_id.to_string(),
        }),
    }
}

fn check_post_code(address: &Address, regex: &PostCodeRegex) -> Option<ValidationError> {
    let post_code = address.post_code();
    let invalid = || {
        Some(ValidationError::InvalidPostCode {
            country: address.country().to_string(),
            post_code: post_code.to_string(),
        })
    };

    let country_pattern = regex.pattern()?;
    if !country_pattern.is_match(post_code) {
        return invalid();
    }

    let area = regex.administrative_area(address.administrative_area())?;
    if area.pattern().is_some_and(|p| !p.is_match(post_code)) {
        return invalid();
    }

    let locality = area.locality(address.locality())?;
    if locality.pattern().is_some_and(|p| !p.is_match(post_code)) {
        return invalid();
    }

    match locality.dependent_locality(address.dependent_locality()) {
        Some(pattern) if !pattern.is_match(post_code) => invalid(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;

    fn au() -> crate::builder::AddressBuilder {
        Address::builder()
            .country("AU")
            .street_line("525 Collins Street")
            .locality("Melbourne")
            .administrative_area("VIC")
            .post_code("3000")
    }

    fn check(address: &Address) -> Result<(), ValidationErrors> {
        validate(Metadata::global(), address)
    }

    #[test]
    fn valid_australian_address() {
        assert!(check(&au().build()).is_ok());
    }

    #[test]
    fn unknown_country_stops_validation() {
        let address = au().country("QQ").build();
        let errors = check(&address).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.as_slice()[0],
            ValidationError::InvalidCountryCode { country: "QQ".into() }
        );
    }

    #[test]
    fn fallback_code_is_not_a_country() {
        let errors = check(&au().country("ZZ").build()).unwrap_err();
        assert!(errors.contains(ValidationErrorKind::InvalidCountryCode));
    }

    #[test]
    fn missing_fields_are_listed_together() {
        let address = Address::builder().country("AU").street_line("   ").build();
        let errors = check(&address).unwrap_err();
        let missing = errors.find(ValidationErrorKind::MissingRequiredFields).unwrap();
        assert_eq!(
            missing.fields(),
            &[
                Field::StreetAddress,
                Field::Locality,
                Field::AdministrativeArea,
                Field::PostCode
            ]
        );
    }

    #[test]
    fn unsupported_fields_are_listed_together() {
        let address = au().sorting_code("CEDEX").dependent_locality("Docklands").build();
        let errors = check(&address).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.as_slice()[0].fields(),
            &[Field::DependentLocality, Field::SortingCode]
        );
    }

    #[test]
    fn errors_from_independent_checks_accumulate() {
        let address = au()
            .locality("")
            .administrative_area("XYZ")
            .post_code("ABCD")
            .sorting_code("1")
            .build();
        let kinds: Vec<_> = check(&address).unwrap_err().iter().map(ValidationError::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ValidationErrorKind::MissingRequiredFields,
                ValidationErrorKind::UnsupportedFields,
                ValidationErrorKind::InvalidAdministrativeArea,
                ValidationErrorKind::InvalidPostCode,
            ]
        );
    }

    #[test]
    fn subdivision_post_code_pattern() {
        let errors = check(&au().post_code("2000").build()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(ValidationErrorKind::InvalidPostCode));
    }

    #[test]
    fn unknown_area_skips_nested_post_code_patterns() {
        let address = au().administrative_area("XYZ").post_code("2000").build();
        let errors = check(&address).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(ValidationErrorKind::InvalidAdministrativeArea));
    }

    #[test]
    fn localities_are_not_checked_without_a_list() {
        let address = au().locality("Anywhere").build();
        assert!(check(&address).is_ok());
    }

    #[test]
    fn chinese_hierarchy() {
        let base = Address::builder()
            .country("CN")
            .street_line("1 西河北路")
            .administrative_area("53")
            .locality("临沧市")
            .dependent_locality("临翔区")
            .post_code("677000");
        assert!(check(&base.clone().build()).is_ok());

        let errors = check(&base.clone().locality("北京市").build()).unwrap_err();
        assert_eq!(
            errors.as_slice(),
            &[ValidationError::InvalidLocality {
                country: "CN".into(),
                administrative_area: "53".into(),
                locality: "北京市".into(),
            }]
        );

        let errors = check(&base.dependent_locality("朝阳区").build()).unwrap_err();
        assert!(errors.contains(ValidationErrorKind::InvalidDependentLocality));
    }

    #[test]
    fn korean_nested_post_code_patterns() {
        let base = Address::builder()
            .country("KR")
            .street_line("1 Main St")
            .administrative_area("47")
            .locality("포항시")
            .dependent_locality("북구");
        assert!(check(&base.clone().post_code("37592").build()).is_ok());

        let errors = check(&base.clone().post_code("38100").build()).unwrap_err();
        assert!(errors.contains(ValidationErrorKind::InvalidPostCode));

        let errors = check(&base.dependent_locality("남구").post_code("37592").build()).unwrap_err();
        assert!(errors.contains(ValidationErrorKind::InvalidPostCode));
    }

    #[test]
    fn default_language_list_only() {
        let address = Address::builder()
            .country("CA")
            .street_line("1 Rue Principale")
            .locality("Montréal")
            .administrative_area("Québec")
            .post_code("H2X 1Y4")
            .build();
        let errors = check(&address).unwrap_err();
        assert!(errors.contains(ValidationErrorKind::InvalidAdministrativeArea));
    }
}
