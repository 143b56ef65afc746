//! Core utilities for the fineer build configuration tools
//!
//! This crate provides functionality shared by the loader and the CLI:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML build description with schema defaults
//! - **Validation**: Field-level checks that report every failure at once
//! - **Process execution**: Running external toolchains
//!
//! # Example
//!
//! ```rust
//! use fineer_core::config::Config;
//!
//! let config = Config::parse("[android]\nnamespace = \"com.example.app\"\n").unwrap();
//! assert_eq!(config.schema.android.namespace.as_deref(), Some("com.example.app"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod process;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::validation::{ValidationResult, Validator};
}
