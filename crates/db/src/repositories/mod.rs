//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod location_repo;
pub mod project_repo;
pub mod record_repo;

pub use category_repo::CategoryRepo;
pub use location_repo::LocationRepo;
pub use project_repo::ProjectRepo;
pub use record_repo::RecordRepo;
