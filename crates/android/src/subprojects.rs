//! Per-subproject settings applied after collection
//!
//! Subproject settings are collected first and then post-processed in one
//! explicit pass, so each setting is applied exactly once regardless of the
//! order in which plugins were registered.

use crate::language::JavaVersion;
use fineer_core::error::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Resolved settings for one subproject
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubprojectConfig {
    /// Subproject name, also its directory under the output root
    pub name: String,
    /// Whether the Kotlin Android plugin is applied
    pub kotlin_android: bool,
    /// JVM target of Kotlin compilation, set by [`apply_jvm_target`]
    pub jvm_target: Option<JavaVersion>,
    /// Build directory of this subproject
    pub output_dir: PathBuf,
}

impl SubprojectConfig {
    /// Settings before post-processing; `jvm_target` is unset
    pub fn new(name: impl Into<String>, kotlin_android: bool, output_dir: PathBuf) -> Self {
        Self {
            name: name.into(),
            kotlin_android,
            jvm_target: None,
            output_dir,
        }
    }
}

/// Set the Kotlin JVM target on every Kotlin Android subproject.
///
/// Returns how many subprojects were updated.
pub fn apply_jvm_target(subprojects: &mut [SubprojectConfig], target: JavaVersion) -> usize {
    let mut updated = 0;
    for subproject in subprojects.iter_mut().filter(|s| s.kotlin_android) {
        if subproject.jvm_target != Some(target) {
            tracing::debug!(subproject = %subproject.name, jvm_target = %target, "Setting Kotlin JVM target");
            subproject.jvm_target = Some(target);
            updated += 1;
        }
    }
    updated
}

/// Order in which subprojects are evaluated.
///
/// With an anchor, the anchor comes first and every other subproject follows
/// in declaration order. Without one, declaration order is kept. A name
/// may be declared only once.
pub fn evaluation_order<S: AsRef<str>>(subprojects: &[S], anchor: Option<&str>) -> Result<Vec<String>> {
    let names: Vec<String> = subprojects.iter().map(|s| s.as_ref().to_string()).collect();

    let mut seen = HashSet::new();
    if let Some(duplicate) = names.iter().find(|n| !seen.insert(n.as_str())) {
        return Err(Error::config(format!("Duplicate subproject: {}", duplicate))
            .with_context(format!("Subprojects: {}", names.join(", "))));
    }

    let Some(anchor) = anchor else {
        return Ok(names);
    };

    if !names.iter().any(|n| n == anchor) {
        return Err(Error::config(format!(
            "Evaluation anchor {:?} is not a subproject",
            anchor
        ))
        .with_context(format!("Subprojects: {}", names.join(", "))));
    }

    let mut order = Vec::with_capacity(names.len());
    order.push(anchor.to_string());
    order.extend(names.into_iter().filter(|n| n != anchor));
    Ok(order)
}
