//! Configuration schema definitions
//!
//! Mirrors the declarative build description: project structure, output
//! layout, the Android block and the framework block. Required values are
//! `Option`s here so that their absence is reported by dotted key name
//! instead of a generic deserialization failure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigSchema {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub android: AndroidConfig,

    /// Signing configurations declared in addition to the toolchain's own
    #[serde(default)]
    pub signing_configs: BTreeMap<String, SigningConfigEntry>,

    #[serde(default)]
    pub flutter: FlutterConfig,
}

/// Root project structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Root project name
    #[serde(default = "default_project_name")]
    pub name: String,

    /// Subprojects participating in the build
    #[serde(default = "default_subprojects")]
    pub subprojects: Vec<String>,

    /// Subproject every other subproject is evaluated after
    #[serde(default)]
    pub evaluation_anchor: Option<String>,

    /// Subprojects that apply the Kotlin Android plugin. `None` means all of
    /// them when the application applies it, none otherwise.
    #[serde(default)]
    pub kotlin_subprojects: Option<Vec<String>>,

    /// Artifact repositories shared by all projects
    #[serde(default = "default_repositories")]
    pub repositories: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            subprojects: default_subprojects(),
            evaluation_anchor: None,
            kotlin_subprojects: None,
            repositories: default_repositories(),
        }
    }
}

fn default_project_name() -> String {
    "android".to_string()
}

fn default_subprojects() -> Vec<String> {
    vec!["app".to_string()]
}

fn default_repositories() -> Vec<String> {
    vec!["google".to_string(), "maven-central".to_string()]
}

/// Build output directory layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Build directory the toolchain would use without remapping
    #[serde(default = "default_build_dir")]
    pub default_build_dir: String,

    /// Override, resolved relative to `default_build_dir`
    #[serde(default)]
    pub build_dir: Option<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_build_dir: default_build_dir(),
            build_dir: None,
        }
    }
}

fn default_build_dir() -> String {
    "build".to_string()
}

/// The `android { ... }` block of the application module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AndroidConfig {
    pub namespace: Option<String>,

    pub compile_sdk: Option<u32>,

    /// Plugin ids in application order
    #[serde(default = "default_plugins")]
    pub plugins: Vec<String>,

    #[serde(default)]
    pub default_config: DefaultConfig,

    #[serde(default)]
    pub compile_options: CompileOptions,

    #[serde(default)]
    pub kotlin_options: KotlinOptions,

    #[serde(default)]
    pub build_types: BTreeMap<String, BuildTypeConfig>,
}

impl Default for AndroidConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            compile_sdk: None,
            plugins: default_plugins(),
            default_config: DefaultConfig::default(),
            compile_options: CompileOptions::default(),
            kotlin_options: KotlinOptions::default(),
            build_types: BTreeMap::new(),
        }
    }
}

fn default_plugins() -> Vec<String> {
    vec![
        "com.android.application".to_string(),
        "kotlin-android".to_string(),
        "dev.flutter.flutter-gradle-plugin".to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DefaultConfig {
    pub application_id: Option<String>,
    pub min_sdk: Option<u32>,
    pub target_sdk: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CompileOptions {
    pub source_compatibility: Option<String>,
    pub target_compatibility: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct KotlinOptions {
    pub jvm_target: Option<String>,
}

/// A build type such as `debug` or `release`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BuildTypeConfig {
    /// Name of the signing configuration used for this build type
    #[serde(default)]
    pub signing_config: Option<String>,

    #[serde(default)]
    pub minify: bool,
}

/// A declared signing configuration. The credentials themselves are
/// consumed by the toolchain; only the name matters for resolution.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SigningConfigEntry {
    #[serde(default)]
    pub store_file: Option<String>,

    #[serde(default)]
    pub key_alias: Option<String>,
}

/// The `flutter { ... }` block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlutterConfig {
    /// Framework project root, relative to the application module
    #[serde(default = "default_flutter_source")]
    pub source: String,

    /// Whether the toolchain's implicit `debug` signing config is available
    #[serde(default = "default_true")]
    pub implicit_debug_signing: bool,
}

impl Default for FlutterConfig {
    fn default() -> Self {
        Self {
            source: default_flutter_source(),
            implicit_debug_signing: true,
        }
    }
}

fn default_flutter_source() -> String {
    "../..".to_string()
}

fn default_true() -> bool {
    true
}
