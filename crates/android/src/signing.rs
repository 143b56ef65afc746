//! Signing configuration references
//!
//! The build description only names signing configurations; the
//! credentials stay with the toolchain. Resolution checks that a name points
//! at a configuration that exists at build time.

use fineer_core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Name of the signing configuration the Android toolchain always provides
pub const DEBUG_SIGNING_CONFIG: &str = "debug";

/// A named pointer to a signing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningReference {
    /// Name of the signing configuration
    pub name: String,
}

/// Signing configurations known at build time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningConfigSet {
    names: BTreeSet<String>,
}

impl SigningConfigSet {
    /// Set containing exactly the given names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Set containing the given names plus the toolchain's `debug` config
    pub fn with_default_debug<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new(names);
        set.names.insert(DEBUG_SIGNING_CONFIG.to_string());
        set
    }

    /// Whether `name` is a known signing configuration
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Known names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }
}

/// Resolve `name` against the set of known signing configurations
pub fn resolve_signing_config(name: &str, known: &SigningConfigSet) -> Result<SigningReference> {
    if known.contains(name) {
        Ok(SigningReference {
            name: name.to_string(),
        })
    } else {
        Err(Error::signing_config_not_found(name, &known.names()))
    }
}
