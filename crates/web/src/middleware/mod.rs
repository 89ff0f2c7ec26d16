//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. Rate limiting on sign-in (governor)
//!
//! Authentication is enforced per handler through the extractors in [`auth`].

pub mod auth;
pub mod rate_limit;
pub mod session;

pub use auth::{
    OptionalAuth, RequireAdmin, RequireAuth, clear_remember_token, set_remember_token,
};
pub use rate_limit::auth_rate_limiter;
pub use session::create_session_layer;
