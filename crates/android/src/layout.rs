//! Build output directory remapping
//!
//! Artifacts are redirected from each project's default build directory to
//! a shared root, with one child directory per subproject.

use fineer_core::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Mapping from subproject name to its output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutputLayout {
    root: PathBuf,
    entries: BTreeMap<String, PathBuf>,
}

impl BuildOutputLayout {
    /// Root output directory every entry lives under
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Output directory of a subproject
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    /// Number of subprojects in the layout
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the layout has no subprojects
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subproject names and output directories, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }
}

/// Compose the root output directory from the toolchain default and an
/// optional override. The override is relative to the default and is not
/// normalised: `build` + `../../build` gives `build/../../build`.
pub fn resolve_build_root(default_build_dir: &Path, build_dir: Option<&str>) -> PathBuf {
    match build_dir {
        Some(dir) => default_build_dir.join(dir),
        None => default_build_dir.to_path_buf(),
    }
}

/// Map every subproject to `root/name`
pub fn resolve_output_layout<S: AsRef<str>>(
    root: &Path,
    subprojects: &[S],
) -> Result<BuildOutputLayout> {
    let mut entries = BTreeMap::new();

    for name in subprojects {
        let name = name.as_ref();
        check_subproject_name(root, name)?;
        entries.insert(name.to_string(), root.join(name));
    }

    Ok(BuildOutputLayout {
        root: root.to_path_buf(),
        entries,
    })
}

/// A subproject name must be a single path component
fn check_subproject_name(root: &Path, name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');

    if invalid {
        return Err(Error::path_resolution(
            root.join(name),
            format!("Invalid subproject name for output directory: {:?}", name),
        )
        .with_suggestion("Subproject names must be a single directory name"));
    }
    Ok(())
}

/// Create the root output directory before handing off to the toolchain
pub fn prepare_output_root(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root).map_err(|e| {
        Error::path_resolution(root, "Failed to create output directory").with_source(e)
    })?;

    let metadata = std::fs::metadata(root).map_err(|e| {
        Error::path_resolution(root, "Failed to inspect output directory").with_source(e)
    })?;
    if metadata.permissions().readonly() {
        return Err(Error::path_resolution(root, "Output directory is not writable"));
    }

    tracing::debug!(root = %root.display(), "Output root ready");
    Ok(())
}

/// The `clean` task: delete the root output directory.
///
/// Returns whether anything was removed.
pub fn clean(root: &Path) -> Result<bool> {
    if !root.exists() {
        return Ok(false);
    }

    std::fs::remove_dir_all(root).map_err(|e| {
        Error::path_resolution(root, "Failed to delete output directory").with_source(e)
    })?;

    tracing::info!(root = %root.display(), "Removed build output");
    Ok(true)
}
