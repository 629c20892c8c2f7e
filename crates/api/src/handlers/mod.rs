pub mod category;
pub mod location;
pub mod project;
pub mod record;
pub mod timezone;
