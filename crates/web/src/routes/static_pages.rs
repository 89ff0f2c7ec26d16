//! Static page route handlers.
//!
//! Every page passes its title through the `full_title` filter in
//! `layout.html`; the home page uses an empty title.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::db::Page;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{Micropost, UserProfile};
use crate::services::UserService;
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "static_pages/home.html")]
pub struct HomeTemplate {
    pub page_title: &'static str,
    pub current_user: Option<UserProfile>,
    pub micropost_count: i64,
    pub feed: Vec<Micropost>,
}

/// Help page template.
#[derive(Template, WebTemplate)]
#[template(path = "static_pages/help.html")]
pub struct HelpTemplate {
    pub page_title: &'static str,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "static_pages/about.html")]
pub struct AboutTemplate {
    pub page_title: &'static str,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "static_pages/contact.html")]
pub struct ContactTemplate {
    pub page_title: &'static str,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the home page.
///
/// Signed-in users also see the first page of their feed.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse> {
    let Some(user) = user else {
        return Ok(HomeTemplate {
            page_title: "",
            current_user: None,
            micropost_count: 0,
            feed: Vec::new(),
        });
    };

    let users = UserService::new(state.pool());
    let micropost_count = users.micropost_count(user.id).await?;
    let feed = users.feed(user.id, Page::default()).await?;

    Ok(HomeTemplate {
        page_title: "",
        current_user: Some(UserProfile::from(&user)),
        micropost_count,
        feed,
    })
}

/// Display the help page.
pub async fn help() -> impl IntoResponse {
    HelpTemplate { page_title: "Help" }
}

/// Display the about page.
pub async fn about() -> impl IntoResponse {
    AboutTemplate {
        page_title: "About Us",
    }
}

/// Display the contact page.
pub async fn contact() -> impl IntoResponse {
    ContactTemplate {
        page_title: "Contact",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::BASE_TITLE;

    #[test]
    fn test_home_title_is_base_title() {
        let html = HomeTemplate {
            page_title: "",
            current_user: None,
            micropost_count: 0,
            feed: Vec::new(),
        }
        .render()
        .unwrap_or_default();
        assert!(html.contains(&format!("<title>{BASE_TITLE}</title>")));
        assert!(!html.contains("| Home"));
    }

    #[test]
    fn test_help_title() {
        let html = HelpTemplate { page_title: "Help" }.render().unwrap_or_default();
        assert!(html.contains(&format!("<title>Help | {BASE_TITLE}</title>")));
        assert!(html.contains("<h1>Help</h1>"));
    }

    #[test]
    fn test_about_title() {
        let html = AboutTemplate {
            page_title: "About Us",
        }
        .render()
        .unwrap_or_default();
        assert!(html.contains(&format!("<title>About Us | {BASE_TITLE}</title>")));
        assert!(html.contains("<h1>About Us</h1>"));
    }

    #[test]
    fn test_contact_title() {
        let html = ContactTemplate {
            page_title: "Contact",
        }
        .render()
        .unwrap_or_default();
        assert!(html.contains(&format!("<title>Contact | {BASE_TITLE}</title>")));
        assert!(html.contains("<h1>Contact</h1>"));
    }
}
