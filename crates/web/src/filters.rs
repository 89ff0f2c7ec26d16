//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use crate::helpers;

/// Expands a page title into the full `<title>` text.
///
/// Usage in templates: `{{ page_title|full_title }}`
#[askama::filter_fn]
pub fn full_title(page_title: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(helpers::full_title(&page_title.to_string()))
}
