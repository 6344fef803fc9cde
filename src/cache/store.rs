//! On-disk layout of the artifact store.
//!
//! Each installed version of an artifact lives in its own directory named
//! `_{escaped name}@{version}@{name}` under the store directory. Entries are
//! never rewritten: a new version gets a new directory.

use std::path::{Path, PathBuf};

/// Version sentinel meaning "whatever is newest in the registry".
pub const LATEST: &str = "latest";

/// Replace path separators in an artifact name so it fits in one path segment.
pub fn sanitize_name(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

/// Directory holding `name` at `version` inside `store_dir`.
///
/// Pure: equal inputs always produce equal paths.
pub fn cache_entry_path(store_dir: &Path, name: &str, version: &str) -> PathBuf {
    store_dir.join(format!("_{}@{}@{}", sanitize_name(name), version, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_every_separator() {
        assert_eq!(sanitize_name("@scope/pkg"), "@scope_pkg");
        assert_eq!(sanitize_name("a/b/c"), "a_b_c");
        assert_eq!(sanitize_name("a\\b"), "a_b");
        assert_eq!(sanitize_name("plain"), "plain");
    }

    #[test]
    fn entry_path_layout() {
        let path = cache_entry_path(Path::new("/store"), "@stencil/command-init", "1.2.0");
        assert_eq!(
            path,
            Path::new("/store/_@stencil_command-init@1.2.0@@stencil/command-init")
        );
    }

    #[test]
    fn entry_path_is_deterministic() {
        let store = Path::new("/store");
        assert_eq!(
            cache_entry_path(store, "pkg", "1.0.0"),
            cache_entry_path(store, "pkg", "1.0.0")
        );
    }

    #[test]
    fn different_versions_have_different_paths() {
        let store = Path::new("/store");
        for (a, b) in [("1.0.0", "1.0.1"), ("1.0.0", "2.0.0"), ("1.0.0-beta", "1.0.0")] {
            assert_ne!(
                cache_entry_path(store, "pkg", a),
                cache_entry_path(store, "pkg", b)
            );
        }
    }

    #[test]
    fn different_names_have_different_paths() {
        let store = Path::new("/store");
        assert_ne!(
            cache_entry_path(store, "a/b", "1.0.0"),
            cache_entry_path(store, "a_b", "1.0.0")
        );
    }
}
