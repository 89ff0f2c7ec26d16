//! Sample App Core - Shared types library.
//!
//! This crate provides common types used across all sample app components:
//! - `web` - The microblogging web application
//! - `cli` - Command-line tools for migrations, user management and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and validation rules - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, names and
//!   per-field validation errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
