//! Address format strings.
//!
//! A format string is literal text interleaved with directives:
//!
//! | Directive  | Meaning             |
//! |------------|---------------------|
//! | `%N`       | name                |
//! | `%O`       | organization        |
//! | `%A`       | street address      |
//! | `%D`       | dependent locality  |
//! | `%C`       | locality            |
//! | `%S`       | administrative area |
//! | `%Z`       | post code           |
//! | `%X`       | sorting code        |
//! | `%country` | country name        |
//! | `%n`       | line break          |

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::constants::COUNTRY_DIRECTIVE;
use crate::error::{FormatError, FormatErrorKind};
use crate::field::{Field, FieldSet};

/// One element of a parsed format string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Text copied to the output as is
    Literal(String),
    /// An address field
    Field(Field),
    /// A line break
    Newline,
}

/// A parsed address format string.
///
/// # Examples
///
/// ```
/// use intl_address::{AddressFormat, Field, Token};
///
/// let format = AddressFormat::parse("%C %S %Z").unwrap();
/// assert_eq!(format.tokens()[0], Token::Field(Field::Locality));
/// assert_eq!(format.to_string(), "%C %S %Z");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressFormat {
    tokens: Vec<Token>,
    source: String,
}

impl AddressFormat {
    /// Parses a format string.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` if the string ends with a lone `%` or contains
    /// a directive other than the ones listed in the module documentation.
    pub fn parse(input: &str) -> Result<Self, FormatError> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut rest = input;

        while let Some(idx) = rest.find('%') {
            literal.push_str(&rest[..idx]);
            let position = input.len() - rest.len() + idx;
            let after = &rest[idx + 1..];

            let (token, consumed) = if after.starts_with(&COUNTRY_DIRECTIVE[1..]) {
                (Token::Field(Field::Country), COUNTRY_DIRECTIVE.len() - 1)
            } else {
                let Some(directive) = after.chars().next() else {
                    return Err(FormatError {
                        format: input.to_string(),
                        kind: FormatErrorKind::DanglingPercent { position },
                    });
                };
                let token = if directive == 'n' {
                    Token::Newline
                } else {
                    let mut buf = [0u8; 4];
                    match Field::from_key(directive.encode_utf8(&mut buf)) {
                        Some(field) => Token::Field(field),
                        None => {
                            return Err(FormatError {
                                format: input.to_string(),
                                kind: FormatErrorKind::UnknownDirective {
                                    directive,
                                    position,
                                },
                            });
                        }
                    }
                };
                (token, directive.len_utf8())
            };

            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(token);
            rest = &after[consumed..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            tokens,
            source: input.to_string(),
        })
    }

    /// Returns the parsed tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns the original format string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the set of fields the format references.
    #[must_use]
    pub fn fields(&self) -> FieldSet {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                Token::Field(f) => Some(*f),
                _ => None,
            })
            .collect()
    }

    /// Returns true if the format references `field`.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.tokens.contains(&Token::Field(field))
    }

    /// Returns a copy with a country line added.
    ///
    /// Latinized formats read top-down from the most specific field, so the
    /// country goes last; native formats put it first.
    #[must_use]
    pub fn with_country_line(&self, at_end: bool) -> Self {
        let mut tokens = Vec::with_capacity(self.tokens.len() + 2);
        let source = if at_end {
            tokens.extend(self.tokens.iter().cloned());
            tokens.push(Token::Newline);
            tokens.push(Token::Field(Field::Country));
            format!("{}%n{COUNTRY_DIRECTIVE}", self.source)
        } else {
            tokens.push(Token::Field(Field::Country));
            tokens.push(Token::Newline);
            tokens.extend(self.tokens.iter().cloned());
            format!("{COUNTRY_DIRECTIVE}%n{}", self.source)
        };
        Self { tokens, source }
    }
}

impl fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for AddressFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for AddressFormat {
    fn as_ref(&self) -> &str {
        &self.source
    }
}

impl Serialize for AddressFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for AddressFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}
