//! Session-related types.

/// Session keys for authentication data.
pub mod session_keys {
    /// Raw remember token of the signed-in user. Only its digest is stored
    /// in the `users` table.
    pub const REMEMBER_TOKEN: &str = "remember_token";
}
