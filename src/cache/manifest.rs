//! Package manifest discovery.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StencilError};

/// File name of a package manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// The two manifest fields the cache reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    /// Package name.
    #[serde(default)]
    pub name: Option<String>,
    /// Entry file, relative to the manifest's directory.
    #[serde(default)]
    pub main: Option<String>,
}

impl PackageManifest {
    /// Read the manifest inside `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| StencilError::ManifestInvalid {
            path,
            message: e.to_string(),
        })
    }
}

/// Nearest directory at or above `start` that contains a manifest.
pub fn find_package_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Absolute path of the entry file declared by the package enclosing `start`.
///
/// `None` when there is no enclosing manifest or it declares no entry file.
pub fn entry_file(start: &Path) -> Result<Option<PathBuf>> {
    let Some(dir) = find_package_dir(start) else {
        return Ok(None);
    };

    let manifest = PackageManifest::load(&dir)?;
    let Some(main) = manifest.main.filter(|m| !m.trim().is_empty()) else {
        return Ok(None);
    };

    // Manifests may use either separator. An absolute `main` replaces `dir`.
    let main = PathBuf::from(main.replace('\\', "/"));
    let entry = std::path::absolute(dir.join(main))?;
    Ok(Some(entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, body: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), body).unwrap();
    }

    #[test]
    fn load_reads_name_and_main() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), r#"{"name": "pkg", "main": "lib/index.js"}"#);

        let manifest = PackageManifest::load(temp.path()).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("pkg"));
        assert_eq!(manifest.main.as_deref(), Some("lib/index.js"));
    }

    #[test]
    fn find_walks_upward() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), r#"{"name": "pkg"}"#);
        let nested = temp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_package_dir(&nested), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn find_prefers_nearest() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), r#"{"name": "outer"}"#);
        let inner = temp.path().join("inner");
        write_manifest(&inner, r#"{"name": "inner"}"#);

        assert_eq!(find_package_dir(&inner), Some(inner.clone()));
    }

    #[test]
    fn entry_file_resolves_main() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), r#"{"name": "pkg", "main": "bin/run"}"#);

        let entry = entry_file(temp.path()).unwrap().unwrap();
        assert!(entry.is_absolute());
        assert_eq!(entry, temp.path().join("bin").join("run"));
    }

    #[test]
    fn entry_file_keeps_absolute_main() {
        let temp = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let target = elsewhere.path().join("run.sh");
        write_manifest(
            temp.path(),
            &serde_json::json!({"name": "pkg", "main": target.to_string_lossy()}).to_string(),
        );

        let entry = entry_file(temp.path()).unwrap().unwrap();
        assert_eq!(entry, target);
    }

    #[test]
    fn entry_file_accepts_backslashes() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), r#"{"name": "pkg", "main": "bin\\run"}"#);

        let entry = entry_file(temp.path()).unwrap().unwrap();
        assert_eq!(entry, temp.path().join("bin").join("run"));
    }

    #[test]
    fn entry_file_without_main_is_none() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), r#"{"name": "pkg"}"#);

        assert!(entry_file(temp.path()).unwrap().is_none());
    }

    #[test]
    fn entry_file_with_blank_main_is_none() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), r#"{"name": "pkg", "main": "  "}"#);

        assert!(entry_file(temp.path()).unwrap().is_none());
    }

    #[test]
    fn entry_file_invalid_manifest_errors() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), "{ not json");

        let err = entry_file(temp.path()).unwrap_err();
        assert!(matches!(err, StencilError::ManifestInvalid { .. }));
    }
}
