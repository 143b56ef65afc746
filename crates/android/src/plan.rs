//! Build configuration loader
//!
//! Turns a parsed [`ConfigSchema`] into a [`BuildPlan`] in a single pass.
//! Each resolution step is exposed on its own so callers can check one
//! concern without resolving the rest. The first failing step ends
//! resolution.

use crate::identity::{self, ApplicationIdentity};
use crate::language::{self, LanguageCompatibility};
use crate::layout::{self, BuildOutputLayout};
use crate::plugins;
use crate::sdk::{self, SdkVersionPolicy};
use crate::signing::{self, SigningConfigSet, SigningReference};
use crate::subprojects::{self, SubprojectConfig};
use fineer_core::config::ConfigSchema;
use fineer_core::error::{Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Values supplied by the framework plugin, passed through untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbientValues {
    /// `flutter.versionCode`
    pub version_code: Option<String>,
    /// `flutter.versionName`
    pub version_name: Option<String>,
}

impl AmbientValues {
    /// Wrap the values as given
    pub fn new(version_code: Option<String>, version_name: Option<String>) -> Self {
        Self {
            version_code,
            version_name,
        }
    }
}

/// A build type with its signing configuration resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBuildType {
    /// Build type name
    pub name: String,
    /// Signing configuration, if the build type names one
    pub signing: Option<SigningReference>,
    /// Whether code shrinking is enabled
    pub minify: bool,
}

/// Everything the external toolchain needs for one build invocation
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    /// Root project name
    pub project_name: String,
    /// Namespace and application id
    pub identity: ApplicationIdentity,
    /// Validated SDK levels
    pub sdk: SdkVersionPolicy,
    /// Java and Kotlin language levels
    pub language: LanguageCompatibility,
    /// Framework-supplied version values
    pub ambient: AmbientValues,
    /// Declared build types, sorted by name
    pub build_types: Vec<ResolvedBuildType>,
    /// Output directory of every subproject
    pub output_layout: BuildOutputLayout,
    /// Subprojects in evaluation order
    pub subprojects: Vec<SubprojectConfig>,
    /// Artifact repositories shared by all projects
    pub repositories: Vec<String>,
    /// Plugin ids in application order
    pub plugins: Vec<String>,
    /// Framework project root, relative to the application module
    pub flutter_source: PathBuf,
}

impl BuildPlan {
    /// Look up a resolved build type by name
    pub fn build_type(&self, name: &str) -> Option<&ResolvedBuildType> {
        self.build_types.iter().find(|b| b.name == name)
    }
}

/// Resolves a build description into a [`BuildPlan`]
#[derive(Debug, Clone)]
pub struct BuildConfigurationLoader {
    schema: ConfigSchema,
    ambient: AmbientValues,
    base_dir: PathBuf,
}

impl BuildConfigurationLoader {
    /// Ambient values are taken here rather than read from the environment
    /// so that resolution depends on its inputs only.
    pub fn new(schema: ConfigSchema, ambient: AmbientValues) -> Self {
        Self {
            schema,
            ambient,
            base_dir: PathBuf::new(),
        }
    }

    /// Directory relative output paths are resolved against
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// The configuration being resolved
    pub fn schema(&self) -> &ConfigSchema {
        &self.schema
    }

    /// Namespace and application id
    pub fn resolve_identity(&self) -> Result<ApplicationIdentity> {
        let android = &self.schema.android;
        identity::resolve_identity(
            android.namespace.as_deref(),
            android.default_config.application_id.as_deref(),
        )
    }

    /// Minimum, target and compile SDK levels
    pub fn resolve_sdk_policy(&self) -> Result<SdkVersionPolicy> {
        let android = &self.schema.android;
        sdk::resolve_sdk_policy(
            android.default_config.min_sdk,
            android.default_config.target_sdk,
            android.compile_sdk,
        )
    }

    /// Java and Kotlin language levels
    pub fn resolve_language_compatibility(&self) -> Result<LanguageCompatibility> {
        let android = &self.schema.android;
        language::resolve_language_compatibility(
            android.compile_options.source_compatibility.as_deref(),
            android.compile_options.target_compatibility.as_deref(),
            android.kotlin_options.jvm_target.as_deref(),
        )
    }

    /// Root output directory after remapping
    pub fn output_root(&self) -> PathBuf {
        let layout = &self.schema.layout;
        self.base_dir.join(layout::resolve_build_root(
            Path::new(&layout.default_build_dir),
            layout.build_dir.as_deref(),
        ))
    }

    /// Output directory of every declared subproject
    pub fn resolve_output_layout(&self) -> Result<BuildOutputLayout> {
        layout::resolve_output_layout(&self.output_root(), &self.schema.project.subprojects)
    }

    /// Signing configurations available at build time
    pub fn signing_config_set(&self) -> SigningConfigSet {
        let declared = self.schema.signing_configs.keys().cloned();
        if self.schema.flutter.implicit_debug_signing {
            SigningConfigSet::with_default_debug(declared)
        } else {
            SigningConfigSet::new(declared)
        }
    }

    /// Resolve one signing configuration by name
    pub fn resolve_signing_config(&self, name: &str) -> Result<SigningReference> {
        signing::resolve_signing_config(name, &self.signing_config_set())
    }

    /// Declared build types with their signing configurations
    pub fn resolve_build_types(&self) -> Result<Vec<ResolvedBuildType>> {
        let known = self.signing_config_set();
        self.schema
            .android
            .build_types
            .iter()
            .map(|(name, build_type)| {
                let signing = build_type
                    .signing_config
                    .as_deref()
                    .map(|s| signing::resolve_signing_config(s, &known))
                    .transpose()
                    .context(format!("In build type {:?}", name))?;
                Ok(ResolvedBuildType {
                    name: name.clone(),
                    signing,
                    minify: build_type.minify,
                })
            })
            .collect()
    }

    /// Collect subprojects in evaluation order and apply the Kotlin JVM
    /// target to them in one pass.
    pub fn resolve_subprojects(
        &self,
        layout: &BuildOutputLayout,
        language: &LanguageCompatibility,
    ) -> Result<Vec<SubprojectConfig>> {
        let project = &self.schema.project;
        let order =
            subprojects::evaluation_order(&project.subprojects, project.evaluation_anchor.as_deref())?;

        let applies_kotlin = plugins::applies_kotlin_android(&self.schema.android.plugins);
        let mut configs: Vec<SubprojectConfig> = order
            .into_iter()
            .map(|name| {
                let kotlin = match &project.kotlin_subprojects {
                    Some(list) => list.contains(&name),
                    None => applies_kotlin,
                };
                let output_dir = layout
                    .get(&name)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| layout.root().join(&name));
                SubprojectConfig::new(name, kotlin, output_dir)
            })
            .collect();

        let updated = subprojects::apply_jvm_target(&mut configs, language.jvm_target);
        debug!(updated, jvm_target = %language.jvm_target, "Applied Kotlin JVM target");

        Ok(configs)
    }

    /// Resolve the complete plan
    pub fn resolve(&self) -> Result<BuildPlan> {
        let identity = self.resolve_identity()?;
        let sdk = self.resolve_sdk_policy()?;
        let language = self.resolve_language_compatibility()?;

        plugins::check_plugin_order(&self.schema.android.plugins)?;
        plugins::check_repositories(&self.schema.project.repositories)?;

        let build_types = self.resolve_build_types()?;
        let output_layout = self.resolve_output_layout()?;
        let subprojects = self.resolve_subprojects(&output_layout, &language)?;

        info!(
            application_id = identity.application_id(),
            min_sdk = sdk.min_sdk(),
            target_sdk = sdk.target_sdk(),
            compile_sdk = sdk.compile_sdk(),
            output_root = %output_layout.root().display(),
            "Resolved build plan"
        );

        Ok(BuildPlan {
            project_name: self.schema.project.name.clone(),
            identity,
            sdk,
            language,
            ambient: self.ambient.clone(),
            build_types,
            output_layout,
            subprojects,
            repositories: self.schema.project.repositories.clone(),
            plugins: self.schema.android.plugins.clone(),
            flutter_source: PathBuf::from(&self.schema.flutter.source),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::JavaVersion;
    use fineer_core::config::Config;
    use fineer_core::ErrorCode;

    const OBSERVED: &str = r#"
[project]
subprojects = ["app", "path_provider_android"]
evaluation_anchor = "app"

[layout]
build_dir = "../../build"

[android]
namespace = "com.example.fineer"
compile_sdk = 35

[android.default_config]
application_id = "com.example.fineer"
min_sdk = 23
target_sdk = 35

[android.compile_options]
source_compatibility = "VERSION_11"
target_compatibility = "VERSION_11"

[android.kotlin_options]
jvm_target = "11"

[android.build_types.release]
signing_config = "debug"
"#;

    fn loader(text: &str) -> BuildConfigurationLoader {
        let schema = Config::parse(text).unwrap().schema;
        BuildConfigurationLoader::new(
            schema,
            AmbientValues::new(Some("7".to_string()), Some("1.2.0".to_string())),
        )
    }

    #[test]
    fn test_resolve_observed_configuration() {
        let plan = loader(OBSERVED).resolve().unwrap();

        assert_eq!(plan.identity.namespace(), "com.example.fineer");
        assert_eq!(plan.sdk.min_sdk(), 23);
        assert_eq!(plan.language.jvm_target, JavaVersion::VERSION_11);
        assert_eq!(plan.ambient.version_code.as_deref(), Some("7"));
        assert_eq!(plan.ambient.version_name.as_deref(), Some("1.2.0"));
        assert_eq!(plan.output_layout.root(), Path::new("build/../../build"));
        assert_eq!(
            plan.output_layout.get("app"),
            Some(Path::new("build/../../build/app"))
        );
        assert_eq!(
            plan.build_type("release").unwrap().signing,
            Some(SigningReference {
                name: "debug".to_string()
            })
        );
        assert_eq!(plan.flutter_source, PathBuf::from("../.."));
    }

    #[test]
    fn test_subprojects_follow_anchor_and_share_jvm_target() {
        let plan = loader(OBSERVED).resolve().unwrap();
        let names: Vec<&str> = plan.subprojects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["app", "path_provider_android"]);
        assert!(plan
            .subprojects
            .iter()
            .all(|s| s.jvm_target == Some(JavaVersion::VERSION_11)));
        assert_eq!(
            plan.subprojects[1].output_dir,
            PathBuf::from("build/../../build/path_provider_android")
        );
    }

    #[test]
    fn test_kotlin_subprojects_restrict_jvm_target() {
        let text = OBSERVED.replace(
            "evaluation_anchor = \"app\"",
            "evaluation_anchor = \"app\"\nkotlin_subprojects = [\"app\"]",
        );
        let plan = loader(&text).resolve().unwrap();
        assert_eq!(plan.subprojects[1].jvm_target, None);
    }

    #[test]
    fn test_kotlin_default_follows_plugins() {
        let text = OBSERVED.replace(
            "compile_sdk = 35",
            "compile_sdk = 35\nplugins = [\"com.android.application\", \"dev.flutter.flutter-gradle-plugin\"]",
        );
        let loader = loader(&text);
        let layout = loader.resolve_output_layout().unwrap();
        let language = loader.resolve_language_compatibility().unwrap();

        let subprojects = loader.resolve_subprojects(&layout, &language).unwrap();
        assert_eq!(subprojects.len(), 2);
        assert!(subprojects.iter().all(|s| !s.kotlin_android && s.jvm_target.is_none()));
    }

    #[test]
    fn test_duplicate_subprojects_rejected() {
        let text = OBSERVED.replace(
            "subprojects = [\"app\", \"path_provider_android\"]",
            "subprojects = [\"app\", \"path_provider_android\", \"app\"]",
        );
        let err = loader(&text).resolve().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.message.contains("Duplicate subproject: app"));
    }

    #[test]
    fn test_sdk_ordering_violation() {
        let text = OBSERVED.replace("min_sdk = 23", "min_sdk = 35").replace("target_sdk = 35", "target_sdk = 23");
        let err = loader(&text).resolve().unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.message.contains("min_sdk"));
    }

    #[test]
    fn test_missing_namespace() {
        let text = OBSERVED.replace("namespace = \"com.example.fineer\"\n", "");
        let err = loader(&text).resolve_identity().unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingField);
    }

    #[test]
    fn test_unknown_signing_config() {
        let text = OBSERVED.replace("signing_config = \"debug\"", "signing_config = \"upload\"");
        let err = loader(&text).resolve().unwrap_err();
        assert_eq!(err.code, ErrorCode::SigningConfigNotFound);
        assert!(err.context.unwrap().contains("release"));
    }

    #[test]
    fn test_declared_signing_config() {
        let text = format!(
            "{}\n[signing_configs.upload]\nstore_file = \"upload.jks\"\n",
            OBSERVED.replace("signing_config = \"debug\"", "signing_config = \"upload\"")
        );
        let plan = loader(&text).resolve().unwrap();
        assert_eq!(plan.build_type("release").unwrap().signing.as_ref().unwrap().name, "upload");
    }

    #[test]
    fn test_implicit_debug_can_be_disabled() {
        let text = format!("{}\n[flutter]\nimplicit_debug_signing = false\n", OBSERVED);
        let loader = loader(&text);
        assert_eq!(
            loader.resolve_signing_config("debug").unwrap_err().code,
            ErrorCode::SigningConfigNotFound
        );
    }

    #[test]
    fn test_base_dir_prefixes_output_root() {
        let loader = loader(OBSERVED).with_base_dir("/work/android");
        assert_eq!(loader.output_root(), PathBuf::from("/work/android/build/../../build"));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let loader = loader(OBSERVED);
        let first = serde_json::to_string(&loader.resolve().unwrap()).unwrap();
        let second = serde_json::to_string(&loader.resolve().unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
