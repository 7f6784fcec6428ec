//! Validation of real addresses against the built-in metadata.

use intl_address::{
    Address, AddressBuilder, Field, InvalidAddress, Metadata, ValidationError, ValidationErrorKind,
    validate,
};

fn melbourne() -> AddressBuilder {
    Address::builder()
        .name("John Smith")
        .organization("Company Pty Ltd")
        .street_line("525 Collins Street")
        .locality("Melbourne")
        .administrative_area("VIC")
        .post_code("3000")
        .country("AU")
}

fn lincang() -> AddressBuilder {
    Address::builder()
        .street_line("No.1 Jianguomenwai Avenue")
        .dependent_locality("临翔区")
        .locality("临沧市")
        .administrative_area("53")
        .post_code("677000")
        .country("CN")
}

fn pohang() -> AddressBuilder {
    Address::builder()
        .street_line("Jangnyang-ro 17beon-gil")
        .dependent_locality("북구")
        .locality("포항시")
        .administrative_area("47")
        .post_code("37592")
        .country("KR")
}

fn gangneung() -> AddressBuilder {
    Address::builder()
        .street_line("Gyeonggang-ro 2021")
        .locality("강릉시")
        .administrative_area("42")
        .post_code("25500")
        .country("KR")
}

fn milano() -> AddressBuilder {
    Address::builder()
        .street_line("Via Manzoni 12")
        .locality("Milano")
        .administrative_area("MI")
        .post_code("20121")
        .country("IT")
}

fn kinds(result: Result<Address, InvalidAddress>) -> Vec<ValidationErrorKind> {
    result
        .unwrap_err()
        .errors()
        .iter()
        .map(ValidationError::kind)
        .collect()
}

#[test]
fn valid_addresses() {
    let cases = [
        melbourne(),
        melbourne().name("").organization(""),
        Address::builder()
            .street_line("27 Rue Pasteur")
            .locality("Cabourg")
            .post_code("14390")
            .country("FR"),
        Address::builder()
            .name("PFC John Smith")
            .street_line("PSC 1234, Box 12345")
            .locality("APO")
            .administrative_area("AE")
            .post_code("09204-1234")
            .country("US"),
        lincang(),
        pohang(),
        gangneung(),
        milano(),
        Address::builder()
            .street_line("Calle de Alcalá 48")
            .locality("Madrid")
            .administrative_area("M")
            .post_code("28014")
            .country("ES"),
        Address::builder()
            .street_line("Av. Paseo de la Reforma 505")
            .dependent_locality("Cuauhtémoc")
            .locality("Ciudad de México")
            .administrative_area("CMX")
            .post_code("06500")
            .country("MX"),
        Address::builder()
            .street_line("Nariman Point")
            .locality("Mumbai")
            .administrative_area("MH")
            .post_code("400021")
            .country("IN"),
    ];
    for (i, builder) in cases.into_iter().enumerate() {
        let expected = builder.clone().build();
        let address = builder
            .build_valid()
            .unwrap_or_else(|e| panic!("case {i}: {e}"));
        assert_eq!(address, expected, "case {i}");
    }
}

#[test]
fn invalid_addresses() {
    let cases = [
        (melbourne().post_code("2000"), ValidationErrorKind::InvalidPostCode),
        (melbourne().post_code("VIC 3000"), ValidationErrorKind::InvalidPostCode),
        (melbourne().post_code("3000 VIC"), ValidationErrorKind::InvalidPostCode),
        (melbourne().post_code("VIC 3000 VIC"), ValidationErrorKind::InvalidPostCode),
        (
            melbourne().street_address(Vec::<String>::new()),
            ValidationErrorKind::MissingRequiredFields,
        ),
        (
            melbourne().dependent_locality("Toorak"),
            ValidationErrorKind::UnsupportedFields,
        ),
        (
            lincang().administrative_area("ASDF").locality("").dependent_locality(""),
            ValidationErrorKind::InvalidAdministrativeArea,
        ),
        (
            lincang().locality("").dependent_locality(""),
            ValidationErrorKind::MissingRequiredFields,
        ),
        (
            lincang().locality("ASDF").dependent_locality(""),
            ValidationErrorKind::InvalidLocality,
        ),
        (
            lincang().dependent_locality("ASDF"),
            ValidationErrorKind::InvalidDependentLocality,
        ),
        (pohang().post_code("38100"), ValidationErrorKind::InvalidPostCode),
    ];
    for (i, (builder, kind)) in cases.into_iter().enumerate() {
        let found = kinds(builder.build_valid());
        assert!(found.contains(&kind), "case {i}: expected {kind:?}, got {found:?}");
    }
}

#[test]
fn subdivisions_outside_the_lists_are_rejected() {
    let cases = [
        (
            gangneung().locality("없는시").post_code("25000"),
            ValidationErrorKind::InvalidLocality,
        ),
        (gangneung().post_code("24700"), ValidationErrorKind::InvalidPostCode),
        (
            gangneung().administrative_area("강원도"),
            ValidationErrorKind::InvalidAdministrativeArea,
        ),
        (
            milano().administrative_area("XYZ").post_code("20100"),
            ValidationErrorKind::InvalidAdministrativeArea,
        ),
        (
            milano().administrative_area("Milano"),
            ValidationErrorKind::InvalidAdministrativeArea,
        ),
    ];
    for (i, (builder, kind)) in cases.into_iter().enumerate() {
        assert_eq!(kinds(builder.build_valid()), vec![kind], "case {i}");
    }
}

#[test]
fn all_failures_are_reported_at_once() {
    let result = Address::builder()
        .country("AU")
        .sorting_code("CEDEX 1")
        .administrative_area("TAS")
        .post_code("3000")
        .build_valid();
    let err = result.unwrap_err();
    assert_eq!(
        err.errors().as_slice(),
        &[
            ValidationError::MissingRequiredFields {
                country: "AU".into(),
                fields: vec![Field::StreetAddress, Field::Locality],
            },
            ValidationError::UnsupportedFields {
                country: "AU".into(),
                fields: vec![Field::SortingCode],
            },
            ValidationError::InvalidPostCode {
                country: "AU".into(),
                post_code: "3000".into(),
            },
        ]
    );
    assert_eq!(err.address().administrative_area(), "TAS");
}

#[test]
fn error_messages_name_the_problem() {
    let err = melbourne().post_code("2000").build_valid().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("2000"), "{message}");
    assert!(message.contains("AU"), "{message}");
}

#[test]
fn unknown_and_fallback_countries_are_rejected() {
    for code in ["QQ", "ZZ", ""] {
        let errors = validate(Metadata::global(), &melbourne().country(code).build()).unwrap_err();
        assert_eq!(errors.len(), 1, "{code}");
        assert!(errors.contains(ValidationErrorKind::InvalidCountryCode));
    }
}

#[test]
fn lowercase_country_codes_are_normalized_by_the_builder() {
    assert!(melbourne().country("au").build_valid().is_ok());
}

#[test]
fn free_text_subdivisions_without_metadata() {
    let address = Address::builder()
        .street_line("27 Rue Pasteur")
        .locality("Anywhere at all")
        .post_code("14390")
        .country("FR");
    assert!(address.build_valid().is_ok());
}

#[test]
fn custom_metadata() {
    let metadata = Metadata::from_json(
        r#"{"countries": {
            "ZZ": {"default_language": "en", "format": "%N%n%A%n%C", "required": ["street_address"]},
            "XA": {"format": "%A%n%C %Z", "required": ["post_code"],
                   "post_code_regex": {"regex": "^\\d{3}$"}}}}"#,
    )
    .unwrap();

    let ok = Address::builder().country("XA").post_code("123").build_valid_with(&metadata);
    assert!(ok.is_ok());

    let err = Address::builder()
        .country("XA")
        .post_code("1234")
        .name("Not used")
        .build_valid_with(&metadata)
        .unwrap_err();
    assert_eq!(
        err.errors().iter().map(ValidationError::kind).collect::<Vec<_>>(),
        vec![ValidationErrorKind::UnsupportedFields, ValidationErrorKind::InvalidPostCode]
    );
}
