//! Address formatting.
//!
//! A [`Formatter`] renders an [`Address`] by walking the tokens of the
//! country's [`AddressFormat`]. Fields that are empty render as nothing and
//! the resulting blank lines and double spaces are collapsed afterwards, so
//! format strings never need conditionals.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::address::Address;
use crate::constants::{ENGLISH, MARKUP_LINE_BREAK, POSTAL_COUNTRY_SEPARATOR};
use crate::field::{Field, FieldSet};
use crate::metadata::{CountryMetadata, Metadata};
use crate::region_names::{BuiltinRegionNames, RegionNamer};
use crate::template::{AddressFormat, Token};

static COLLAPSE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\p{Zs}]{2,}").unwrap());

static COLLAPSE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s|\p{Zs}|<br>){2,}").unwrap());

/// How rendered lines and fields are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputMode {
    /// Lines separated by `\n`.
    #[default]
    Plain,
    /// HTML: each field wrapped in a `<span>` named after the field, lines
    /// separated by `<br>`, values escaped.
    Markup,
}

impl OutputMode {
    const fn line_break(self) -> &'static str {
        match self {
            Self::Plain => "\n",
            Self::Markup => MARKUP_LINE_BREAK,
        }
    }
}

/// Which conventions the formatter follows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LabelStyle {
    /// Adds the country name in the requested language. Nothing is
    /// upper-cased.
    #[default]
    Default,
    /// Follows postal addressing rules for mail sent from `origin_country`.
    ///
    /// Fields the destination country wants upper-cased are upper-cased,
    /// alphabetic postal abbreviations replace administrative area names,
    /// and the country line is only added for international mail, in both
    /// the origin's language and English.
    PostalLabel {
        /// Country code the mail is sent from
        origin_country: String,
    },
}

impl LabelStyle {
    /// Shorthand for [`LabelStyle::PostalLabel`].
    #[must_use]
    pub fn postal_label(origin_country: impl Into<String>) -> Self {
        Self::PostalLabel {
            origin_country: origin_country.into(),
        }
    }
}

/// Formatter configuration.
///
/// # Examples
///
/// ```
/// use intl_address::{FormatOptions, LabelStyle, OutputMode};
///
/// let options = FormatOptions::new()
///     .with_output(OutputMode::Markup)
///     .with_latinize(true)
///     .with_style(LabelStyle::postal_label("FR"));
///
/// assert!(options.latinize);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FormatOptions {
    /// Output representation
    pub output: OutputMode,
    /// Use the country's latinized format when it has one
    pub latinize: bool,
    /// Default or postal label conventions
    pub style: LabelStyle,
}

impl FormatOptions {
    /// Plain output, native format, default style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output mode.
    #[must_use]
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Sets whether latinized formats are preferred.
    #[must_use]
    pub fn with_latinize(mut self, latinize: bool) -> Self {
        self.latinize = latinize;
        self
    }

    /// Sets the label style.
    #[must_use]
    pub fn with_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }
}

/// Renders addresses as text or HTML.
///
/// A formatter holds no mutable state; one instance can format any number
/// of addresses from any number of threads.
///
/// # Examples
///
/// ```
/// use intl_address::{Address, FormatOptions, Formatter};
///
/// let address = Address::builder()
///     .country("AU")
///     .name("John Smith")
///     .organization("Company Pty Ltd")
///     .street_line("525 Collins Street")
///     .locality("Melbourne")
///     .administrative_area("VIC")
///     .post_code("3000")
///     .build();
///
/// let formatter = Formatter::new(FormatOptions::new());
/// assert_eq!(
///     formatter.format(&address, "en"),
///     "Company Pty Ltd\nJohn Smith\n525 Collins Street\nMelbourne Victoria 3000\nAustralia"
/// );
/// ```
#[derive(Clone)]
pub struct Formatter<'a> {
    metadata: &'a Metadata,
    names: &'a dyn RegionNamer,
    options: FormatOptions,
}

impl Formatter<'static> {
    /// Creates a formatter over the built-in metadata and region names.
    #[must_use]
    pub fn new(options: FormatOptions) -> Self {
        Self::with_sources(Metadata::global(), BuiltinRegionNames::global(), options)
    }
}

impl<'a> Formatter<'a> {
    /// Creates a formatter over the given metadata and region names.
    #[must_use]
    pub fn with_sources(
        metadata: &'a Metadata,
        names: &'a dyn RegionNamer,
        options: FormatOptions,
    ) -> Self {
        Self {
            metadata,
            names,
            options,
        }
    }

    /// Returns the options this formatter was created with.
    #[must_use]
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Formats `address`.
    ///
    /// `language` selects subdivision and country names. Languages the
    /// country has no subdivision names for fall back to its default
    /// language; country names missing in a language fall back to English.
    #[must_use]
    pub fn format(&self, address: &Address, language: &str) -> String {
        let code = address.country();
        let country = self.metadata.country(code);
        let requested = language;
        let language = self.metadata.normalize_language(code, requested);
        if !requested.is_empty() && requested != language {
            debug!(
                country = code,
                requested,
                language,
                "no subdivision names in language, using default"
            );
        }
        let (format, country_at_end) = select_format(country, self.options.latinize);

        let mut data = self.resolve(address, language);
        let mut upper = FieldSet::new();

        let country_line = match &self.options.style {
            LabelStyle::Default => self.names.region_name_or_english(code, language),
            LabelStyle::PostalLabel { origin_country } => {
                upper = country.upper_fields();
                let alphabetic = |key: &&str| key.chars().any(|c| c.is_ascii_alphabetic());
                if let Some(key) = data.postal_key.filter(alphabetic) {
                    data.administrative_area = key;
                }
                self.postal_country_line(code, origin_country)
            }
        };

        let format = match country_line.filter(|line| !line.is_empty()) {
            Some(line) => {
                data.country = line;
                format.with_country_line(country_at_end)
            }
            None => format.clone(),
        };

        let raw = self.render(&format, &data, upper);
        self.tidy(&raw)
    }

    /// Collects display values for the address fields.
    fn resolve<'s>(&'s self, address: &'s Address, language: &str) -> FormatData<'s> {
        let code = address.country();
        let area = address.administrative_area();
        let locality = address.locality();
        let dependent = address.dependent_locality();

        let area_name = (!area.is_empty())
            .then(|| self.metadata.administrative_area_name(code, area, language))
            .flatten()
            .unwrap_or(area);
        let locality_name = (!locality.is_empty())
            .then(|| self.metadata.locality_name(code, area, locality, language))
            .flatten()
            .unwrap_or(locality);
        let dependent_name = (!dependent.is_empty())
            .then(|| {
                self.metadata
                    .dependent_locality_name(code, area, locality, dependent, language)
            })
            .flatten()
            .unwrap_or(dependent);

        FormatData {
            country: String::new(),
            name: address.name(),
            organization: address.organization(),
            street: address
                .street_address()
                .iter()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty())
                .collect(),
            dependent_locality: dependent_name,
            locality: locality_name,
            administrative_area: area_name,
            postal_key: self.metadata.administrative_area_postal_key(code, area),
            post_code: address.post_code(),
            sorting_code: address.sorting_code(),
        }
    }

    /// Builds the upper-cased `TRANSLATED - ENGLISH` country line for mail
    /// leaving `origin`. `None` for domestic mail or an unknown origin.
    fn postal_country_line(&self, destination: &str, origin: &str) -> Option<String> {
        let origin = origin.to_uppercase();
        if !self.metadata.has_country(&origin) || origin.eq_ignore_ascii_case(destination) {
            return None;
        }

        let origin_language = self.metadata.country(&origin).default_language();
        let english = self.names.region_name(destination, ENGLISH)?;
        let translated = self
            .names
            .region_name(destination, origin_language)
            .unwrap_or_else(|| {
                debug!(
                    origin = %origin,
                    language = origin_language,
                    "no destination name in origin language"
                );
                english.clone()
            });

        Some(if translated == english {
            english.to_uppercase()
        } else {
            format!(
                "{}{POSTAL_COUNTRY_SEPARATOR}{}",
                translated.to_uppercase(),
                english.to_uppercase()
            )
        })
    }

    fn render(&self, format: &AddressFormat, data: &FormatData<'_>, upper: FieldSet) -> String {
        let output = self.options.output;
        let mut out = String::new();

        for token in format.tokens() {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Newline => out.push_str(output.line_break()),
                Token::Field(Field::StreetAddress) => {
                    let upper = upper.contains(Field::StreetAddress);
                    for (index, line) in data.street.iter().enumerate() {
                        if index > 0 {
                            out.push_str(output.line_break());
                        }
                        let value = cased(line, upper);
                        match output {
                            OutputMode::Plain => out.push_str(&value),
                            OutputMode::Markup => push_span(
                                &mut out,
                                &format!("{}-{}", Field::StreetAddress.css_class(), index + 1),
                                &value,
                            ),
                        }
                    }
                }
                Token::Field(field) => {
                    let value = data.value(*field);
                    if value.is_empty() {
                        continue;
                    }
                    let value = cased(value, upper.contains(*field));
                    match output {
                        OutputMode::Plain => out.push_str(&value),
                        OutputMode::Markup => push_span(&mut out, field.css_class(), &value),
                    }
                }
            }
        }
        out
    }

    /// Collapses the gaps left by empty fields into single line breaks.
    fn tidy(&self, raw: &str) -> String {
        match self.options.output {
            OutputMode::Plain => COLLAPSE_WHITESPACE.replace_all(raw.trim(), "\n").into_owned(),
            OutputMode::Markup => {
                let lines = COLLAPSE_WHITESPACE.replace_all(raw.trim(), MARKUP_LINE_BREAK);
                let collapsed = COLLAPSE_BREAKS.replace_all(&lines, MARKUP_LINE_BREAK);
                trim_breaks(&collapsed).to_string()
            }
        }
    }
}

/// Picks the native or latinized format and where the country line goes.
///
/// Latinized formats and formats without a latinized variant end with the
/// country; native formats of countries that have one start with it.
fn select_format(country: &CountryMetadata, latinize: bool) -> (&AddressFormat, bool) {
    match (latinize, country.latinized_format()) {
        (true, Some(latinized)) => (latinized, true),
        (false, Some(_)) => (country.format(), false),
        (_, None) => (country.format(), true),
    }
}

fn cased(value: &str, upper: bool) -> std::borrow::Cow<'_, str> {
    if upper {
        value.to_uppercase().into()
    } else {
        value.into()
    }
}

/// Appends `value` as an escaped `<span>` with the given class.
fn push_span(out: &mut String, class: &str, value: &str) {
    out.push_str(r#"<span class=""#);
    out.push_str(class);
    out.push_str(r#"">"#);
    out.push_str(&escape_markup(value));
    out.push_str("</span>");
}

fn escape_markup(value: &str) -> std::borrow::Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return value.into();
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped.into()
}

fn trim_breaks(mut s: &str) -> &str {
    loop {
        let trimmed = s
            .trim()
            .trim_start_matches(MARKUP_LINE_BREAK)
            .trim_end_matches(MARKUP_LINE_BREAK);
        if trimmed.len() == s.len() {
            return trimmed;
        }
        s = trimmed;
    }
}

/// Display values of one address.
struct FormatData<'s> {
    country: String,
    name: &'s str,
    organization: &'s str,
    street: Vec<&'s str>,
    dependent_locality: &'s str,
    locality: &'s str,
    administrative_area: &'s str,
    postal_key: Option<&'s str>,
    post_code: &'s str,
    sorting_code: &'s str,
}

impl FormatData<'_> {
    fn value(&self, field: Field) -> &str {
        match field {
            Field::Country => &self.country,
            Field::Name => self.name,
            Field::Organization => self.organization,
            Field::DependentLocality => self.dependent_locality,
            Field::Locality => self.locality,
            Field::AdministrativeArea => self.administrative_area,
            Field::PostCode => self.post_code,
            Field::SortingCode => self.sorting_code,
            Field::StreetAddress => "",
        }
    }
}
