//! Micropost domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sample_app_core::{MicropostId, UserId, ValidationErrors};

/// Maximum micropost length, in characters.
pub const MAX_CONTENT_LENGTH: usize = 140;

/// A short post belonging to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Micropost {
    pub id: MicropostId,
    pub content: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content submitted for a new micropost.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MicropostForm {
    pub content: String,
}

impl MicropostForm {
    /// Check content presence and length.
    ///
    /// # Errors
    ///
    /// Returns the failed rules keyed by `content`.
    pub fn validate(&self) -> Result<&str, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.content.trim().is_empty() {
            errors.add("content", "can't be blank");
        } else if self.content.chars().count() > MAX_CONTENT_LENGTH {
            errors.add(
                "content",
                format!("is too long (maximum is {MAX_CONTENT_LENGTH} characters)"),
            );
        }

        errors.into_result().map(|()| self.content.as_str())
    }
}

/// Row to insert into `microposts`.
///
/// `created_at` defaults to the database clock when `None`.
#[derive(Debug, Clone)]
pub struct NewMicropost {
    pub user_id: UserId,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewMicropost {
    #[must_use]
    pub fn new(user_id: UserId, content: impl Into<String>) -> Self {
        Self {
            user_id,
            content: content.into(),
            created_at: None,
        }
    }

    /// Backdate the post, e.g. when seeding or importing.
    #[must_use]
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_content() {
        let form = MicropostForm {
            content: "Lorem ipsum".to_string(),
        };
        assert_eq!(form.validate().unwrap(), "Lorem ipsum");
    }

    #[test]
    fn test_blank_content() {
        let form = MicropostForm {
            content: "  ".to_string(),
        };
        assert!(form.validate().unwrap_err().contains("content"));
    }

    #[test]
    fn test_missing_content_is_blank() {
        let form: MicropostForm = serde_json::from_str("{}").unwrap();
        assert_eq!(
            form.validate().unwrap_err().get("content"),
            ["can't be blank".to_string()]
        );
    }

    #[test]
    fn test_content_too_long() {
        let form = MicropostForm {
            content: "a".repeat(141),
        };
        assert!(form.validate().is_err());

        let form = MicropostForm {
            content: "a".repeat(140),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_new_micropost_backdated() {
        let at = Utc::now() - chrono::Duration::days(30);
        let post = NewMicropost::new(UserId::new(1), "old").created_at(at);
        assert_eq!(post.created_at, Some(at));
    }
}
