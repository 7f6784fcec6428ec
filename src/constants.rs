//! Constants shared by the metadata store, validator and formatter.

/// Code of the fallback record used for unknown countries.
pub const FALLBACK_COUNTRY: &str = "ZZ";

/// Language used when no translation exists for a requested language.
pub const ENGLISH: &str = "en";

/// Format directive for the country line.
pub const COUNTRY_DIRECTIVE: &str = "%country";

/// Line break emitted in markup output.
pub const MARKUP_LINE_BREAK: &str = "<br>";

/// Separator between the translated and English country names on postal labels.
pub const POSTAL_COUNTRY_SEPARATOR: &str = " - ";

/// Built-in country metadata table.
pub(crate) const BUILTIN_METADATA_JSON: &str = include_str!("../data/address_metadata.json");

/// Built-in region display names, keyed by language then region code.
pub(crate) const BUILTIN_REGION_NAMES_JSON: &str = include_str!("../data/region_names.json");
