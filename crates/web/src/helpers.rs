//! View helpers.

/// Site title shown on every page.
pub const BASE_TITLE: &str = "Ruby on Rails Tutorial Sample App";

/// Full `<title>` for a page.
///
/// The base title alone for an empty `page_title`, otherwise
/// `"<page_title> | <base title>"`.
///
/// ```
/// use sample_app_web::helpers::full_title;
///
/// assert_eq!(full_title(""), "Ruby on Rails Tutorial Sample App");
/// assert_eq!(full_title("Help"), "Help | Ruby on Rails Tutorial Sample App");
/// ```
#[must_use]
pub fn full_title(page_title: &str) -> String {
    if page_title.is_empty() {
        BASE_TITLE.to_string()
    } else {
        format!("{page_title} | {BASE_TITLE}")
    }
}
