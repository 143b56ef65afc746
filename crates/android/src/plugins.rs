//! Plugin application order and artifact repositories

use fineer_core::error::{Error, Result};
use fineer_core::validation::Validator;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Android application plugin id
pub const ANDROID_APPLICATION_PLUGIN: &str = "com.android.application";
/// Flutter Gradle plugin id
pub const FLUTTER_PLUGIN: &str = "dev.flutter.flutter-gradle-plugin";

/// Ids the Kotlin Android plugin is known by
static KOTLIN_ANDROID_PLUGINS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["kotlin-android", "org.jetbrains.kotlin.android"].into_iter().collect());

/// Repository shorthands understood by the toolchain
pub const KNOWN_REPOSITORIES: &[&str] = &["google", "maven-central"];

/// Check that the framework plugin is applied after the Android application
/// and Kotlin Android plugins, and that no plugin is applied twice.
pub fn check_plugin_order<S: AsRef<str>>(plugins: &[S]) -> Result<()> {
    let ids: Vec<&str> = plugins.iter().map(|p| p.as_ref()).collect();

    let mut seen = HashSet::new();
    for id in &ids {
        if !seen.insert(*id) {
            return Err(Error::config(format!("Plugin applied twice: {}", id)));
        }
    }

    let flutter = ids
        .iter()
        .position(|id| *id == FLUTTER_PLUGIN)
        .ok_or_else(|| Error::config(format!("Required plugin missing: {}", FLUTTER_PLUGIN)))?;
    let android = ids
        .iter()
        .position(|id| *id == ANDROID_APPLICATION_PLUGIN)
        .ok_or_else(|| {
            Error::config(format!("Required plugin missing: {}", ANDROID_APPLICATION_PLUGIN))
        })?;
    let kotlin = ids
        .iter()
        .position(|id| KOTLIN_ANDROID_PLUGINS.contains(*id))
        .ok_or_else(|| Error::config("Required plugin missing: kotlin-android"))?;

    if flutter < android || flutter < kotlin {
        return Err(Error::config(format!(
            "{} must be applied after the Android and Kotlin plugins",
            FLUTTER_PLUGIN
        ))
        .with_context(format!("Plugin order: {}", ids.join(", "))));
    }

    Ok(())
}

/// Whether the plugin list applies the Kotlin Android plugin
pub fn applies_kotlin_android<S: AsRef<str>>(plugins: &[S]) -> bool {
    plugins
        .iter()
        .any(|p| KOTLIN_ANDROID_PLUGINS.contains(p.as_ref()))
}

/// Accept repository shorthands and `https://` URLs
pub fn check_repositories<S: AsRef<str>>(repositories: &[S]) -> Result<()> {
    repositories
        .iter()
        .enumerate()
        .fold(Validator::new(), |validator, (i, repo)| {
            let repo = repo.as_ref();
            validator.custom(&format!("project.repositories[{}]", i), || {
                if KNOWN_REPOSITORIES.contains(&repo) || repo.starts_with("https://") {
                    None
                } else {
                    Some(format!(
                        "Unknown repository {:?}; use one of {} or an https:// URL",
                        repo,
                        KNOWN_REPOSITORIES.join(", ")
                    ))
                }
            })
        })
        .validate()
        .to_result()
}
