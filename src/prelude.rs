//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use intl_address::prelude::*;
//!
//! let address = Address::builder().country("AU").build();
//! assert!(validate(Metadata::global(), &address).is_err());
//! ```
//!
//! Post code regex tree nodes and the subdivision record types are left out;
//! import them by name when reading metadata in depth.

pub use crate::{
    // Core types
    Address, AddressFormat, Field, FieldName, FieldSet, Token,
    // Builder
    AddressBuilder,
    // Metadata
    BuiltinRegionNames, CaseFoldCollator, Collator, CountryListing, CountryMetadata, Metadata,
    RegionNamer,
    // Validation
    validate,
    // Formatting
    FormatOptions, Formatter, LabelStyle, OutputMode,
    // Zones
    ExactMatcher, PostCodeMatcher, PostCodeRange, RegexMatcher, Territory, Zone,
    // Errors
    FormatError, FormatErrorKind, InvalidAddress, MetadataError, UnknownFieldError,
    ValidationError, ValidationErrorKind, ValidationErrors,
    // Constants
    FALLBACK_COUNTRY,
};
