//! Domain logic for the time tracker.
//!
//! Everything here is pure: no database handles and no HTTP types, so the
//! persistence and API crates can both lean on it.

pub mod error;
pub mod record;
pub mod report;
pub mod slug;
pub mod timezone;
pub mod types;
