//! CLI utilities for fineer tools
//!
//! Provides shared terminal output:
//! - Status messages
//! - Aligned key/value listings
//! - Duration and count formatting

#![warn(missing_docs)]

pub mod output;
