//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password hashing, sign-in and remember tokens
//! - `users` - Sign-up, profile updates, admin rights, deletion, feeds
//! - `microposts` - Posting and deleting microposts

pub mod auth;
pub mod microposts;
pub mod users;

pub use auth::{AuthError, AuthService};
pub use microposts::{MicropostError, MicropostService};
pub use users::{UserError, UserService};
