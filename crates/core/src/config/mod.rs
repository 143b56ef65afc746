//! Configuration loading and schema definitions
//!
//! The declarative build description, read from TOML.

mod loader;
mod schema;

pub use loader::{Config, CONFIG_CANDIDATES};
pub use schema::*;
