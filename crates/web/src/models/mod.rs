//! Domain models.
//!
//! Validated domain types, separate from database row types.

pub mod micropost;
pub mod session;
pub mod user;

pub use micropost::{Micropost, MicropostForm, NewMicropost};
pub use session::session_keys;
pub use user::{User, UserForm, UserProfile, ValidatedUser};
