//! Email address type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Conventional address pattern: a local part of ASCII word characters,
/// `+`, `-` and `.`, an `@`, dot-separated domain labels, and an alphabetic
/// TLD. Classes are spelled out as ASCII ranges so Unicode case folding
/// cannot admit the Kelvin sign (U+212A) or the long s (U+017F).
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A[A-Za-z0-9_+\-.]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]+\z")
        .expect("Invalid regex")
});

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty or only whitespace.
    #[error("can't be blank")]
    Blank,
    /// The input string is too long.
    #[error("is too long (maximum is {max} characters)")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not look like an email address.
    #[error("is invalid")]
    Malformed,
}

/// A normalized email address.
///
/// Parsing validates the address against a conventional pattern and stores
/// it lower-cased, so two addresses that differ only in case compare equal.
///
/// ## Constraints
///
/// - Not blank
/// - Length: at most 254 characters (RFC 5321 limit)
/// - Local part of ASCII word characters, `+`, `-` and `.`
/// - Domain of `[a-z0-9-]` labels separated by single dots, ending in a
///   letters-only TLD
///
/// ## Examples
///
/// ```
/// use sample_app_core::Email;
///
/// // Valid emails
/// assert!(Email::parse("user@example.com").is_ok());
/// assert!(Email::parse("a+b@baz.cn").is_ok());
///
/// // Stored lower-cased
/// assert_eq!(Email::parse("EXAMPLE@example.INfo").unwrap().as_str(), "example@example.info");
///
/// // Invalid emails
/// assert!(Email::parse(" ").is_err());              // blank
/// assert!(Email::parse("user_at_foo.org").is_err()); // missing @
/// assert!(Email::parse("foo@bar..com").is_err());    // empty domain label
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string, lower-casing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty or only whitespace
    /// - Is longer than 254 characters
    /// - Does not match the address pattern
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.trim().is_empty() {
            return Err(EmailError::Blank);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !EMAIL_RE.is_match(s) {
            return Err(EmailError::Malformed);
        }

        Ok(Self(s.to_lowercase()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Email {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Email {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Email {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wellformed_addresses() {
        for address in ["user@foo.COM", "A_US-ER@f.b.org", "frst.lst@foo.jp", "a+b@baz.cn"] {
            assert!(Email::parse(address).is_ok(), "{address} should be valid");
        }
    }

    #[test]
    fn test_parse_malformed_addresses() {
        for address in [
            "user@foo,com",
            "user_at_foo.org",
            "example.user@foo.",
            "foo@bar_baz.com",
            "foo@bar+baz.com",
            "foo@bar..com",
            "jürgen@foo.com",
            "user@foo.\u{212A}",
            "a@b.\u{17F}",
        ] {
            assert_eq!(
                Email::parse(address),
                Err(EmailError::Malformed),
                "{address} should be invalid"
            );
        }
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(Email::parse(""), Err(EmailError::Blank));
        assert_eq!(Email::parse(" "), Err(EmailError::Blank));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_downcases() {
        let email = Email::parse("EXAMPLE@example.INfo").unwrap();
        assert_eq!(email.as_str(), "example@example.info");
    }

    #[test]
    fn test_case_variants_are_equal() {
        assert_eq!(
            Email::parse("USER@EXAMPLE.COM").unwrap(),
            Email::parse("user@example.com").unwrap()
        );
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let parsed: Email = serde_json::from_str("\"Mixed@Example.com\"").unwrap();
        assert_eq!(parsed.as_str(), "mixed@example.com");
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"mixed@example.com\"");

        assert!(serde_json::from_str::<Email>("\"not-an-email\"").is_err());
    }
}
