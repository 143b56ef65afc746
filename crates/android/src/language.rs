//! Java/Kotlin language compatibility levels

use fineer_core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A JVM language and bytecode level, stored as its major version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JavaVersion(u8);

impl JavaVersion {
    /// Java 8, written `1.8`
    pub const VERSION_1_8: JavaVersion = JavaVersion(8);
    /// Java 11
    pub const VERSION_11: JavaVersion = JavaVersion(11);
    /// Java 17
    pub const VERSION_17: JavaVersion = JavaVersion(17);

    /// Major version number (`8` for `1.8`)
    pub fn major(&self) -> u8 {
        self.0
    }

    /// Parse the forms accepted by the toolchains: `11`, `1.8`,
    /// `VERSION_11`, `VERSION_1_8`, `JavaVersion.VERSION_17`.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let bare = trimmed.strip_prefix("JavaVersion.").unwrap_or(trimmed);
        let bare = bare.strip_prefix("VERSION_").unwrap_or(bare).replace('_', ".");
        let bare = bare.strip_prefix("1.").unwrap_or(bare.as_str());

        match bare.parse::<u8>() {
            Ok(major) if major > 0 => Ok(JavaVersion(major)),
            _ => Err(Error::config(format!("Invalid Java version: {:?}", value))
                .with_suggestion("Use a level such as \"1.8\", \"11\" or \"17\"")),
        }
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 <= 8 {
            write!(f, "1.{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for JavaVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        JavaVersion::parse(s)
    }
}

impl Serialize for JavaVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JavaVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        JavaVersion::parse(&s).map_err(|e| serde::de::Error::custom(e.message))
    }
}

/// Java source/target compatibility and the Kotlin JVM target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCompatibility {
    /// `compile_options.source_compatibility`
    pub source_level: JavaVersion,
    /// `compile_options.target_compatibility`
    pub target_level: JavaVersion,
    /// `kotlin_options.jvm_target`
    pub jvm_target: JavaVersion,
}

/// Resolve and cross-check the three levels.
///
/// Java cannot compile sources newer than the bytecode it emits, and the
/// Kotlin Android plugin refuses to build when Kotlin and Java target
/// different bytecode levels.
pub fn resolve_language_compatibility(
    source: Option<&str>,
    target: Option<&str>,
    jvm_target: Option<&str>,
) -> Result<LanguageCompatibility> {
    let source_level = JavaVersion::parse(
        source.ok_or_else(|| Error::missing_field("android.compile_options.source_compatibility"))?,
    )?;
    let target_level = JavaVersion::parse(
        target.ok_or_else(|| Error::missing_field("android.compile_options.target_compatibility"))?,
    )?;
    let jvm_target = JavaVersion::parse(
        jvm_target.ok_or_else(|| Error::missing_field("android.kotlin_options.jvm_target"))?,
    )?;

    if source_level > target_level {
        return Err(Error::config(format!(
            "source_compatibility ({}) is newer than target_compatibility ({})",
            source_level, target_level
        )));
    }

    if jvm_target != target_level {
        return Err(Error::config(format!(
            "Inconsistent JVM target: Java targets {} but Kotlin targets {}",
            target_level, jvm_target
        ))
        .with_suggestion("Set kotlin_options.jvm_target to the same level as target_compatibility"));
    }

    Ok(LanguageCompatibility {
        source_level,
        target_level,
        jvm_target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fineer_core::ErrorCode;

    #[test]
    fn test_parse_forms() {
        assert_eq!(JavaVersion::parse("11").unwrap(), JavaVersion::VERSION_11);
        assert_eq!(JavaVersion::parse("VERSION_11").unwrap(), JavaVersion::VERSION_11);
        assert_eq!(JavaVersion::parse("JavaVersion.VERSION_17").unwrap(), JavaVersion::VERSION_17);
        assert_eq!(JavaVersion::parse("1.8").unwrap(), JavaVersion::VERSION_1_8);
        assert_eq!(JavaVersion::parse("VERSION_1_8").unwrap(), JavaVersion::VERSION_1_8);
        assert_eq!(JavaVersion::parse("8").unwrap(), JavaVersion::VERSION_1_8);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(JavaVersion::parse("eleven").is_err());
        assert!(JavaVersion::parse("0").is_err());
        assert!(JavaVersion::parse("").is_err());
    }

    #[test]
    fn test_display_gradle_form() {
        assert_eq!(JavaVersion::VERSION_1_8.to_string(), "1.8");
        assert_eq!(JavaVersion::VERSION_11.to_string(), "11");
    }

    #[test]
    fn test_observed_levels_resolve() {
        let compat =
            resolve_language_compatibility(Some("11"), Some("VERSION_11"), Some("11")).unwrap();
        assert_eq!(compat.source_level, compat.target_level);
        assert_eq!(compat.target_level, compat.jvm_target);
    }

    #[test]
    fn test_older_source_allowed() {
        let compat = resolve_language_compatibility(Some("1.8"), Some("11"), Some("11")).unwrap();
        assert_eq!(compat.source_level, JavaVersion::VERSION_1_8);
    }

    #[test]
    fn test_source_newer_than_target() {
        let err = resolve_language_compatibility(Some("17"), Some("11"), Some("11")).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_inconsistent_jvm_target() {
        let err = resolve_language_compatibility(Some("11"), Some("11"), Some("17")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.message.contains("Kotlin targets 17"));
    }

    #[test]
    fn test_missing_jvm_target() {
        let err = resolve_language_compatibility(Some("11"), Some("11"), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingField);
    }

    #[test]
    fn test_serde_uses_gradle_form() {
        let json = serde_json::to_string(&JavaVersion::VERSION_1_8).unwrap();
        assert_eq!(json, "\"1.8\"");
        let parsed: JavaVersion = serde_json::from_str("\"VERSION_11\"").unwrap();
        assert_eq!(parsed, JavaVersion::VERSION_11);
    }
}
