//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! sample-cli user create -n "Example User" -e example@railstutorial.org -p foobar --admin
//! sample-cli user toggle-admin -e example@railstutorial.org
//! ```

use thiserror::Error;

use sample_app_core::UserId;
use sample_app_web::models::UserForm;
use sample_app_web::services::{UserError, UserService};

use super::{ConnectError, connect};

/// Errors that can occur during user commands.
#[derive(Debug, Error)]
pub enum UserCommandError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// No user has this email.
    #[error("No user with email: {0}")]
    NotFound(String),

    /// The user was rejected or the database failed.
    #[error("{0}")]
    User(#[from] UserError),
}

/// Create a user, optionally as an admin.
///
/// # Errors
///
/// Returns an error if validation fails (each message is logged) or the
/// database is unreachable.
pub async fn create(
    name: &str,
    email: &str,
    password: &str,
    admin: bool,
) -> Result<UserId, UserCommandError> {
    let pool = connect().await?;
    let users = UserService::new(&pool);

    let user = match users.register(&UserForm::new(name, email, password)).await {
        Ok(user) => user,
        Err(UserError::Invalid(errors)) => {
            for message in errors.full_messages() {
                tracing::error!("  - {message}");
            }
            return Err(UserError::Invalid(errors).into());
        }
        Err(e) => return Err(e.into()),
    };

    if admin {
        users.set_admin(user.id, true).await?;
    }

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Admin: {}",
        user.id,
        user.email,
        admin
    );

    Ok(user.id)
}

/// Flip the admin flag of the user registered under `email`.
///
/// Returns the new value of the flag.
///
/// # Errors
///
/// Returns `UserCommandError::NotFound` if nobody has that email.
pub async fn toggle_admin(email: &str) -> Result<bool, UserCommandError> {
    let pool = connect().await?;
    let users = UserService::new(&pool);

    let mut user = users
        .find_by_email(email)
        .await?
        .ok_or_else(|| UserCommandError::NotFound(email.to_owned()))?;

    user.toggle_admin();
    users.set_admin(user.id, user.admin).await?;

    tracing::info!(user_id = %user.id, admin = user.admin, "Admin flag toggled");

    Ok(user.admin)
}
