//! `recipes.toml` package manifests and their discovery on disk.
use super::{Declaration, PackageId, PackageManifest, Universe};
use crate::errors::DepGraphError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const MANIFEST_FILE_NAME: &str = "recipes.toml";

#[derive(Debug, Deserialize)]
struct ManifestFile {
    package: PackageSection,
    #[serde(default)]
    modules: BTreeMap<String, Declaration>,
    #[serde(default)]
    recipes: BTreeMap<String, Declaration>,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    name: String,
}

/// Parse manifest text. `file` is only used for error reporting.
///
/// # Errors
/// Returns `DepGraphError::Manifest` if `data` is not a valid manifest.
pub fn parse_manifest(data: &str, file: &Path) -> Result<PackageManifest, DepGraphError> {
    let raw: ManifestFile = toml::from_str(data)
        .map_err(|source| DepGraphError::Manifest { file: file.to_path_buf(), source })?;
    Ok(PackageManifest {
        name: PackageId(raw.package.name),
        modules: raw.modules,
        recipes: raw.recipes,
        path: Some(file.to_path_buf()),
    })
}

/// Read and parse a single manifest file.
///
/// # Errors
/// Returns `DepGraphError::Io` if the file cannot be read, or
/// `DepGraphError::Manifest` if it cannot be parsed.
pub fn load_manifest(path: &Path) -> Result<PackageManifest, DepGraphError> {
    let data = std::fs::read_to_string(path)?;
    parse_manifest(&data, path)
}

/// Find every `recipes.toml` under `root`, sorted by path.
///
/// `.gitignore`/`.ignore` files are honored with parent traversal, even
/// outside a git checkout. Global git excludes are off so results do not
/// depend on the user's machine.
#[must_use]
pub fn manifest_files(root: &Path) -> Vec<PathBuf> {
    let mut walker = ignore::WalkBuilder::new(root);
    walker
        .follow_links(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false)
        .require_git(false)
        .ignore(true)
        .parents(true);
    let mut out: Vec<PathBuf> = walker
        .build()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!(root = %root.display(), error = %err, "skipping unreadable path during discovery");
                None
            }
        })
        .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
        .filter(|e| e.file_name() == MANIFEST_FILE_NAME)
        .map(ignore::DirEntry::into_path)
        .collect();
    out.sort();
    out
}

/// Load every manifest under `root` into a [`Universe`].
///
/// # Errors
/// Propagates manifest read/parse failures and package/module conflicts.
pub fn discover(root: &Path) -> Result<Universe, DepGraphError> {
    let mut universe = Universe::new();
    for file in manifest_files(root) {
        let manifest = load_manifest(&file)?;
        debug!(
            file = %file.display(),
            package = %manifest.name,
            modules = manifest.modules.len(),
            recipes = manifest.recipes.len(),
            "loaded manifest"
        );
        universe.add_package(manifest)?;
    }
    Ok(universe)
}

/// Name of the package whose manifest sits directly in `root`, if any.
///
/// # Errors
/// Returns an error if the manifest exists but cannot be read or parsed.
pub fn package_at(root: &Path) -> Result<Option<PackageId>, DepGraphError> {
    let path = root.join(MANIFEST_FILE_NAME);
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(load_manifest(&path)?.name))
}
