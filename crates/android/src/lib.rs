//! Android build configuration for fineer
//!
//! This crate resolves the declarative build description of a Flutter
//! Android project into a build plan:
//! - Application identity and SDK version policy
//! - Java/Kotlin language levels
//! - Signing configuration references
//! - Build output directory remapping
//! - Gradle wrapper hand-off

#![warn(missing_docs)]

pub mod gradle;
pub mod identity;
pub mod language;
pub mod layout;
pub mod plan;
pub mod plugins;
pub mod sdk;
pub mod signing;
pub mod subprojects;

pub use plan::{AmbientValues, BuildConfigurationLoader, BuildPlan};
