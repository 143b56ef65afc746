//! SDK version policy
//!
//! A policy can only be obtained through [`SdkVersionPolicy::new`], so every
//! value in circulation satisfies `min_sdk <= target_sdk <= compile_sdk`.

use fineer_core::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Lower bound for any API level
pub const MIN_API_LEVEL: u32 = 1;

/// Minimum, target and compile SDK levels of the application module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SdkVersionPolicy {
    min_sdk: u32,
    target_sdk: u32,
    compile_sdk: u32,
}

impl SdkVersionPolicy {
    /// Build a policy, enforcing the level ordering
    pub fn new(min_sdk: u32, target_sdk: u32, compile_sdk: u32) -> Result<Self> {
        for (key, level) in [
            ("min_sdk", min_sdk),
            ("target_sdk", target_sdk),
            ("compile_sdk", compile_sdk),
        ] {
            if level < MIN_API_LEVEL {
                return Err(Error::config(format!("{} must be at least {}", key, MIN_API_LEVEL)));
            }
        }

        if min_sdk > target_sdk {
            return Err(Error::config(format!(
                "min_sdk ({}) is greater than target_sdk ({})",
                min_sdk, target_sdk
            ))
            .with_suggestion("Lower min_sdk or raise target_sdk"));
        }

        if target_sdk > compile_sdk {
            return Err(Error::config(format!(
                "target_sdk ({}) is greater than compile_sdk ({})",
                target_sdk, compile_sdk
            ))
            .with_suggestion("Raise compile_sdk to at least target_sdk"));
        }

        Ok(Self {
            min_sdk,
            target_sdk,
            compile_sdk,
        })
    }

    /// Lowest API level the app installs on
    pub fn min_sdk(&self) -> u32 {
        self.min_sdk
    }

    /// API level the app is tested against
    pub fn target_sdk(&self) -> u32 {
        self.target_sdk
    }

    /// API level the app is compiled against
    pub fn compile_sdk(&self) -> u32 {
        self.compile_sdk
    }
}

impl<'de> Deserialize<'de> for SdkVersionPolicy {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            min_sdk: u32,
            target_sdk: u32,
            compile_sdk: u32,
        }

        let raw = Raw::deserialize(deserializer)?;
        SdkVersionPolicy::new(raw.min_sdk, raw.target_sdk, raw.compile_sdk)
            .map_err(|e| serde::de::Error::custom(e.message))
    }
}

/// Resolve the policy from optional configuration values
pub fn resolve_sdk_policy(
    min_sdk: Option<u32>,
    target_sdk: Option<u32>,
    compile_sdk: Option<u32>,
) -> Result<SdkVersionPolicy> {
    let min_sdk = min_sdk.ok_or_else(|| Error::missing_field("android.default_config.min_sdk"))?;
    let target_sdk =
        target_sdk.ok_or_else(|| Error::missing_field("android.default_config.target_sdk"))?;
    let compile_sdk = compile_sdk.ok_or_else(|| Error::missing_field("android.compile_sdk"))?;

    SdkVersionPolicy::new(min_sdk, target_sdk, compile_sdk)
}
