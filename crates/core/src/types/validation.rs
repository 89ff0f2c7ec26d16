//! Per-field validation errors.
//!
//! Collects every failed rule for a record instead of stopping at the first,
//! so callers can report all problems with a form at once.

use std::collections::BTreeMap;

use serde::Serialize;

/// Validation failures keyed by attribute name.
///
/// An empty set means the record is valid.
///
/// ```
/// use sample_app_core::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("name", "can't be blank");
/// errors.add("password_confirmation", "doesn't match Password");
///
/// assert!(!errors.is_empty());
/// assert_eq!(
///     errors.full_messages(),
///     vec![
///         "Name can't be blank".to_string(),
///         "Password confirmation doesn't match Password".to_string(),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Create an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed rule for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Returns `true` when no rule failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when `field` has at least one error.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for `field`, empty if none.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Iterate over fields that have errors, in name order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Messages prefixed with the humanized field name,
    /// e.g. `"Email is invalid"`.
    #[must_use]
    pub fn full_messages(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(field, messages)| {
                let attribute = humanize(field);
                messages
                    .iter()
                    .map(move |message| format!("{attribute} {message}"))
            })
            .collect()
    }

    /// Fold another set of errors into this one.
    pub fn merge(&mut self, other: Self) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the error set itself if any rule failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// `password_confirmation` -> `Password confirmation`.
fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let errors = ValidationErrors::new();
        assert!(errors.is_empty());
        assert!(errors.full_messages().is_empty());
        assert_eq!(errors.into_result(), Ok(()));
    }

    #[test]
    fn test_add_groups_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add("password", "can't be blank");
        errors.add("password", "is too short (minimum is 6 characters)");
        errors.add("email", "is invalid");

        assert_eq!(errors.get("password").len(), 2);
        assert!(errors.contains("email"));
        assert!(!errors.contains("name"));
        assert!(errors.get("name").is_empty());
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email", "password"]);
    }

    #[test]
    fn test_merge() {
        let mut a = ValidationErrors::new();
        a.add("email", "is invalid");
        let mut b = ValidationErrors::new();
        b.add("email", "has already been taken");
        a.merge(b);
        assert_eq!(a.get("email").len(), 2);
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("name"), "Name");
        assert_eq!(humanize("password_confirmation"), "Password confirmation");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_display_joins_full_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "is invalid");
        errors.add("name", "can't be blank");
        assert_eq!(errors.to_string(), "Email is invalid, Name can't be blank");
    }
}
