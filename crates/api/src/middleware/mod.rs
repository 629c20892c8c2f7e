//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the requesting owner from a JWT Bearer token.

pub mod auth;
