//! Application identity (namespace and application id)

use fineer_core::error::{Error, Result};
use fineer_core::validation::Validator;
use serde::{Deserialize, Serialize};

/// Dotted Java package name, at least two segments
const PACKAGE_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$";

/// Namespace of the generated code and the id the app is published under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationIdentity {
    namespace: String,
    application_id: String,
}

impl ApplicationIdentity {
    /// Package used for generated sources (`R`, `BuildConfig`)
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Identifier the artifact is installed and published under
    pub fn application_id(&self) -> &str {
        &self.application_id
    }
}

/// Resolve the identity, failing on missing or malformed values
pub fn resolve_identity(
    namespace: Option<&str>,
    application_id: Option<&str>,
) -> Result<ApplicationIdentity> {
    let namespace = require("android.namespace", namespace)?;
    let application_id = require("android.default_config.application_id", application_id)?;

    Validator::new()
        .pattern("android.namespace", namespace, PACKAGE_PATTERN, "a dotted package name")
        .pattern(
            "android.default_config.application_id",
            application_id,
            PACKAGE_PATTERN,
            "a dotted package name",
        )
        .validate()
        .to_result()?;

    Ok(ApplicationIdentity {
        namespace: namespace.to_string(),
        application_id: application_id.to_string(),
    })
}

fn require<'a>(key: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::missing_field(key)),
    }
}
