pub mod models;

pub use models::{Site, SiteLookup};
