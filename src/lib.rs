//! Validation and formatting of international postal addresses.
//!
//! This crate checks addresses against per-country addressing rules and
//! renders them the way each country expects them to be written.
//!
//! # Overview
//!
//! Every country has a metadata record describing:
//!
//! - which fields an address may use and which are required,
//! - the format string used to lay the fields out,
//! - the administrative areas, localities and dependent localities it
//!   recognizes, with names in one or more languages,
//! - the post code patterns for the country and its subdivisions.
//!
//! Countries without a record fall back to the generic `ZZ` record.
//!
//! # Quick Start
//!
//! ```rust
//! use intl_address::{Address, FormatOptions, Formatter, LabelStyle};
//!
//! let address = Address::builder()
//!     .country("AU")
//!     .name("John Smith")
//!     .organization("Company Pty Ltd")
//!     .street_line("525 Collins Street")
//!     .locality("Melbourne")
//!     .administrative_area("VIC")
//!     .post_code("3000")
//!     .build_valid()
//!     .unwrap();
//!
//! let label = Formatter::new(FormatOptions::new().with_style(LabelStyle::postal_label("FR")))
//!     .format(&address, "fr");
//!
//! assert_eq!(
//!     label,
//!     "Company Pty Ltd\nJohn Smith\n525 Collins Street\nMELBOURNE VIC 3000\nAUSTRALIE - AUSTRALIA"
//! );
//! ```
//!
//! # Format Strings
//!
//! | Directive  | Field               |
//! |------------|---------------------|
//! | `%N`       | name                |
//! | `%O`       | organization        |
//! | `%A`       | street address      |
//! | `%D`       | dependent locality  |
//! | `%C`       | locality            |
//! | `%S`       | administrative area |
//! | `%Z`       | post code           |
//! | `%X`       | sorting code        |
//! | `%n`       | line break          |
//! | `%country` | country name        |
//!
//! # Zones
//!
//! [`Zone`] and [`Territory`] decide whether an address falls in a region
//! described by country, subdivisions and post code matchers. They do not
//! use the metadata tables.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod address;
mod builder;
mod constants;
mod data;
mod error;
mod field;
mod format;
#[cfg(kani)]
mod kani_impls;
mod metadata;
pub mod prelude;
mod region_names;
mod template;
mod validate;
mod zone;

pub use address::Address;
pub use builder::AddressBuilder;
pub use constants::{
    COUNTRY_DIRECTIVE, ENGLISH, FALLBACK_COUNTRY, MARKUP_LINE_BREAK, POSTAL_COUNTRY_SEPARATOR,
};
pub use error::{
    FormatError, FormatErrorKind, InvalidAddress, MetadataError, ValidationError,
    ValidationErrorKind, ValidationErrors,
};
pub use field::{Field, FieldName, FieldSet, UnknownFieldError};
pub use format::{FormatOptions, Formatter, LabelStyle, OutputMode};
pub use metadata::{
    AdministrativeArea, AreaPostCodeRegex, CountryListing, CountryMetadata, DependentLocality,
    Locality, LocalityPostCodeRegex, Metadata, PostCodePattern, PostCodeRegex,
};
pub use region_names::{BuiltinRegionNames, CaseFoldCollator, Collator, RegionNamer};
pub use template::{AddressFormat, Token};
pub use validate::validate;
pub use zone::{ExactMatcher, PostCodeMatcher, PostCodeRange, RegexMatcher, Territory, Zone};
