//! Gradle build system integration
//!
//! Translates a resolved [`BuildPlan`] into a Gradle wrapper invocation.

use crate::plan::BuildPlan;
use fineer_core::error::{Error, ErrorCode, Result};
use fineer_core::process::{run_command_in_dir, CommandResult};
use std::fmt;
use std::path::Path;

/// Artifact kind produced by a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Installable APK
    Apk,
    /// App bundle (AAB)
    Bundle,
}

/// Build variant requested by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Build type name, e.g. `debug` or `release`
    pub build_type: String,
    /// Artifact kind to produce
    pub artifact: Artifact,
}

impl Variant {
    /// Variant for a build type and artifact kind
    pub fn new(build_type: impl Into<String>, artifact: Artifact) -> Self {
        Self {
            build_type: build_type.into(),
            artifact,
        }
    }

    /// Gradle task for this variant, e.g. `assembleRelease` or `bundleDebug`
    pub fn task(&self) -> String {
        let verb = match self.artifact {
            Artifact::Apk => "assemble",
            Artifact::Bundle => "bundle",
        };
        let mut chars = self.build_type.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        format!("{}{}", verb, capitalized)
    }
}

/// Command line handed to the Gradle wrapper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradleInvocation {
    /// Tasks to run, in order
    pub tasks: Vec<String>,
    /// Project properties passed as `-Pkey=value`
    pub properties: Vec<(String, String)>,
}

impl GradleInvocation {
    /// Build the invocation for `variant`. The build type must exist in the
    /// plan unless it is `debug`, which the toolchain always defines.
    ///
    /// The wrapper runs inside `project_dir`, so the build directory is
    /// passed relative to it.
    pub fn from_plan(plan: &BuildPlan, variant: &Variant, project_dir: &Path) -> Result<Self> {
        if variant.build_type != "debug" && plan.build_type(&variant.build_type).is_none() {
            return Err(Error::new(
                ErrorCode::ConfigValidationError,
                format!("Unknown build type: {}", variant.build_type),
            ));
        }

        let mut properties = vec![(
            "buildDir".to_string(),
            build_dir_for(plan.output_layout.root(), project_dir)
                .display()
                .to_string(),
        )];
        if let Some(code) = &plan.ambient.version_code {
            properties.push(("flutter.versionCode".to_string(), code.clone()));
        }
        if let Some(name) = &plan.ambient.version_name {
            properties.push(("flutter.versionName".to_string(), name.clone()));
        }

        Ok(Self {
            tasks: vec![variant.task()],
            properties,
        })
    }

    /// The `clean` task
    pub fn clean() -> Self {
        Self {
            tasks: vec!["clean".to_string()],
            properties: Vec::new(),
        }
    }

    /// Arguments passed to the wrapper
    pub fn args(&self) -> Vec<String> {
        self.properties
            .iter()
            .map(|(k, v)| format!("-P{}={}", k, v))
            .chain(self.tasks.iter().cloned())
            .collect()
    }
}

impl fmt::Display for GradleInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", wrapper(), self.args().join(" "))
    }
}

/// `root` as seen from `project_dir`. Roots outside the project directory
/// are passed through unchanged.
fn build_dir_for<'a>(root: &'a Path, project_dir: &Path) -> &'a Path {
    root.strip_prefix(project_dir).unwrap_or(root)
}

fn wrapper() -> &'static str {
    if cfg!(windows) {
        "gradlew.bat"
    } else {
        "./gradlew"
    }
}

/// Run an invocation with the project's Gradle wrapper
pub fn run(project_dir: &Path, invocation: &GradleInvocation) -> Result<CommandResult> {
    let wrapper_path = project_dir.join(wrapper().trim_start_matches("./"));
    if !wrapper_path.is_file() {
        return Err(Error::command_not_found(wrapper())
            .with_context(format!("Looked in {}", project_dir.display()))
            .with_suggestion("Run from the Android project root or generate the wrapper"));
    }

    let program = std::path::absolute(&wrapper_path)?;
    let result = run_command_in_dir(
        &program.to_string_lossy(),
        &invocation.args(),
        project_dir,
        &[],
    )?;
    if !result.success {
        return Err(Error::new(
            ErrorCode::GradleError,
            format!("Gradle exited with code {}", result.exit_code),
        )
        .with_context(result.combined_output().trim().to_string()));
    }
    Ok(result)
}
