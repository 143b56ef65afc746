use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONFIG: &str = r#"
[project]
subprojects = ["app"]
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
source_compatibility = "11"
target_compatibility = "11"

[android.kotlin_options]
jvm_target = "11"

[android.build_types.release]
signing_config = "debug"
"#;

fn write_config(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("fineer-build.toml");
    std::fs::write(&path, text).unwrap();
    path
}

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("fineer-build").unwrap();
    cmd.env_remove("FLUTTER_VERSION_CODE")
        .env_remove("FLUTTER_VERSION_NAME")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn check_accepts_observed_configuration() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), CONFIG);

    cmd()
        .args(["--no-color", "check", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Build configuration is valid (1 subproject"));
}

#[test]
fn check_rejects_sdk_ordering() {
    let dir = TempDir::new().unwrap();
    let text = CONFIG
        .replace("min_sdk = 23", "min_sdk = 35")
        .replace("target_sdk = 35", "target_sdk = 23");
    let config = write_config(dir.path(), &text);

    cmd()
        .args(["--no-color", "check", "--config"])
        .arg(&config)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("min_sdk (35) is greater than target_sdk (23)"));
}

#[test]
fn unknown_signing_config_exits_with_signing_code() {
    let dir = TempDir::new().unwrap();
    let text = CONFIG.replace("signing_config = \"debug\"", "signing_config = \"upload\"");
    let config = write_config(dir.path(), &text);

    cmd()
        .args(["--no-color", "check", "--config"])
        .arg(&config)
        .assert()
        .code(6)
        .stderr(predicate::str::contains("Signing config not found: upload"));
}

#[test]
fn missing_config_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["--no-color", "check", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .code(3);
}

#[test]
fn plan_json_passes_ambient_values_through() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), CONFIG);

    let output = cmd()
        .args(["--json", "plan", "--version-code", "42", "--config"])
        .arg(&config)
        .env("FLUTTER_VERSION_NAME", "2.0.1")
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["ambient"]["version_code"], "42");
    assert_eq!(plan["ambient"]["version_name"], "2.0.1");
    assert_eq!(plan["sdk"]["min_sdk"], 23);
    assert_eq!(plan["language"]["jvm_target"], "11");
    assert_eq!(plan["subprojects"][0]["jvm_target"], "11");
}

#[test]
fn layout_without_config() {
    cmd()
        .args(["layout", "--root", "build/../../build", "app"])
        .assert()
        .success()
        .stdout("app\tbuild/../../build/app\n");
}

#[test]
fn clean_removes_output_root() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        &CONFIG.replace("build_dir = \"../../build\"", "build_dir = \"out\""),
    );
    let root = dir.path().join("build/out");
    std::fs::create_dir_all(root.join("app")).unwrap();

    cmd()
        .args(["--no-color", "clean", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    assert!(!root.exists());
}

#[test]
fn build_dry_run_prints_gradle_command() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), CONFIG);

    cmd()
        .args(["build", "--release", "--bundle", "--dry-run", "--version-code", "9", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("-Pflutter.versionCode=9"))
        .stdout(predicate::str::contains("bundleRelease"));
}

#[test]
fn demo_configuration_is_valid() {
    let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/fineer-build.toml");

    cmd()
        .args(["--no-color", "check", "--config"])
        .arg(&demo)
        .assert()
        .success();
}

#[cfg(unix)]
#[test]
fn build_from_subdirectory_config_targets_output_root() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let android = dir.path().join("android");
    std::fs::create_dir_all(&android).unwrap();
    write_config(&android, CONFIG);

    // Stand-in wrapper: records where `buildDir` points from its own directory.
    let gradlew = android.join("gradlew");
    std::fs::write(
        &gradlew,
        r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    -PbuildDir=*) dir="${arg#-PbuildDir=}" ;;
  esac
done
mkdir -p "$dir" && cd "$dir" && pwd -P > "$FINEER_SEEN_BUILD_DIR"
"#,
    )
    .unwrap();
    std::fs::set_permissions(&gradlew, std::fs::Permissions::from_mode(0o755)).unwrap();

    let seen = dir.path().join("seen-build-dir");
    cmd()
        .current_dir(dir.path())
        .args(["--no-color", "build", "--config", "android/fineer-build.toml"])
        .env("FINEER_SEEN_BUILD_DIR", &seen)
        .assert()
        .success();

    let expected = dir.path().join("build").canonicalize().unwrap();
    let recorded = std::fs::read_to_string(&seen).unwrap();
    assert_eq!(Path::new(recorded.trim()), expected);
}
