//! User display name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`UserName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// The input string is empty or only whitespace.
    #[error("can't be blank")]
    Blank,
    /// The input string is too long.
    #[error("is too long (maximum is {max} characters)")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A user's display name.
///
/// Must not be blank and may hold at most [`UserName::MAX_LENGTH`]
/// characters. The value is stored exactly as given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Maximum length of a name, in characters.
    pub const MAX_LENGTH: usize = 256;

    /// Parse a `UserName` from a string.
    ///
    /// # Errors
    ///
    /// Returns `UserNameError::Blank` for empty or whitespace-only input and
    /// `UserNameError::TooLong` when the input exceeds 256 characters.
    pub fn parse(s: &str) -> Result<Self, UserNameError> {
        if s.trim().is_empty() {
            return Err(UserNameError::Blank);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(UserNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(UserName::parse("Example Name").is_ok());
        assert!(UserName::parse(&"a".repeat(256)).is_ok());
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(UserName::parse(""), Err(UserNameError::Blank));
        assert_eq!(UserName::parse("   "), Err(UserNameError::Blank));
    }

    #[test]
    fn test_parse_too_long() {
        assert_eq!(
            UserName::parse(&"a".repeat(257)),
            Err(UserNameError::TooLong { max: 256 })
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert!(UserName::parse(&"é".repeat(256)).is_ok());
    }
}
