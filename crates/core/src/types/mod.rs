//! Core types for the sample app.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod name;
pub mod validation;

pub use email::{Email, EmailError};
pub use id::*;
pub use name::{UserName, UserNameError};
pub use validation::ValidationErrors;
