//! Bearer-token primitives.
//!
//! Tokens are issued by an external identity provider sharing the HMAC
//! secret; this service only validates them to learn who is asking.

pub mod jwt;
