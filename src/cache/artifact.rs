//! Versioned artifacts backed by the store.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StencilError};
use crate::registry::VersionResolver;

use super::installer::{InstallRequest, Installer};
use super::manifest;
use super::store::{cache_entry_path, LATEST};

/// Identifies one installable unit.
///
/// With `store_dir` set the artifact is managed by the cache. Without it the
/// artifact is expected to already be materialized at `target_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    /// Artifact name, unique within a registry.
    pub name: String,
    /// Semantic version or [`LATEST`].
    pub version: String,
    /// Directory the artifact should end up usable from.
    pub target_path: PathBuf,
    /// Shared store directory, absent in local mode.
    pub store_dir: Option<PathBuf>,
}

impl ArtifactRef {
    /// A cache-managed artifact.
    pub fn cached(
        name: impl Into<String>,
        version: impl Into<String>,
        target_path: impl Into<PathBuf>,
        store_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            target_path: target_path.into(),
            store_dir: Some(store_dir.into()),
        }
    }

    /// An artifact read directly from `target_path`.
    pub fn local(
        name: impl Into<String>,
        version: impl Into<String>,
        target_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            target_path: target_path.into(),
            store_dir: None,
        }
    }
}

/// An artifact together with the collaborators needed to materialize it.
pub struct Artifact<'a> {
    reference: ArtifactRef,
    resolver: &'a VersionResolver,
    installer: &'a dyn Installer,
}

impl<'a> Artifact<'a> {
    /// Bind a reference to a resolver and an installer.
    pub fn new(
        reference: ArtifactRef,
        resolver: &'a VersionResolver,
        installer: &'a dyn Installer,
    ) -> Self {
        Self {
            reference,
            resolver,
            installer,
        }
    }

    /// Artifact name.
    pub fn name(&self) -> &str {
        &self.reference.name
    }

    /// Current in-memory version, possibly still [`LATEST`].
    pub fn version(&self) -> &str {
        &self.reference.version
    }

    /// The underlying reference.
    pub fn reference(&self) -> &ArtifactRef {
        &self.reference
    }

    /// Whether the artifact is managed by the cache.
    pub fn is_cached(&self) -> bool {
        self.reference.store_dir.is_some()
    }

    /// Store entry for the current version, if cached.
    pub fn cache_entry_path(&self) -> Option<PathBuf> {
        self.reference
            .store_dir
            .as_deref()
            .map(|store| cache_entry_path(store, &self.reference.name, &self.reference.version))
    }

    /// Create the store and pin [`LATEST`] to a concrete version.
    pub fn prepare(&mut self) -> Result<()> {
        if let Some(store) = &self.reference.store_dir {
            fs::create_dir_all(store)?;
        }

        if self.reference.version == LATEST {
            let resolved = self.resolve_latest()?;
            tracing::debug!("Resolved {}@{} to {}", self.name(), LATEST, resolved);
            self.reference.version = resolved;
        }

        Ok(())
    }

    /// Whether the current version is present on disk.
    pub fn exists(&mut self) -> Result<bool> {
        if self.is_cached() {
            self.prepare()?;
            Ok(self
                .cache_entry_path()
                .is_some_and(|entry| entry.exists()))
        } else {
            Ok(self.reference.target_path.exists())
        }
    }

    /// Install the current version.
    pub fn install(&mut self) -> Result<()> {
        self.ensure_managed()?;
        self.prepare()?;
        let version = self.reference.version.clone();
        self.install_version(&version)
    }

    /// Install the newest published version unless it is already present.
    ///
    /// The in-memory version only moves after a successful install, so
    /// repeated calls with nothing new published leave it untouched.
    pub fn update(&mut self) -> Result<()> {
        self.ensure_managed()?;
        self.prepare()?;

        let latest = self.resolve_latest()?;
        let Some(store) = self.reference.store_dir.as_deref() else {
            return Ok(());
        };
        let latest_path = cache_entry_path(store, &self.reference.name, &latest);

        if latest_path.exists() {
            tracing::debug!("{}@{} is already current", self.name(), latest);
            return Ok(());
        }

        self.install_version(&latest)?;
        self.reference.version = latest;
        Ok(())
    }

    /// Absolute path of the artifact's entry file.
    ///
    /// `None` means there is nothing to execute.
    pub fn entry_file_path(&self) -> Result<Option<PathBuf>> {
        let start = self
            .cache_entry_path()
            .unwrap_or_else(|| self.reference.target_path.clone());
        manifest::entry_file(&start)
    }

    fn resolve_latest(&self) -> Result<String> {
        self.resolver
            .latest_version(&self.reference.name, None)?
            .ok_or_else(|| StencilError::NoPublishedVersion {
                name: self.reference.name.clone(),
            })
    }

    fn ensure_managed(&self) -> Result<()> {
        if self.is_cached() {
            return Ok(());
        }
        Err(StencilError::InstallFailed {
            name: self.reference.name.clone(),
            version: self.reference.version.clone(),
            message: format!(
                "{} is not managed by a cache",
                self.reference.target_path.display()
            ),
        })
    }

    fn install_version(&self, version: &str) -> Result<()> {
        let request = InstallRequest {
            root: &self.reference.target_path,
            store_dir: self.reference.store_dir.as_deref(),
            registry: self.resolver.registry(),
            name: &self.reference.name,
            version,
        };

        tracing::debug!("Installing {}@{}", self.reference.name, version);
        self.installer
            .install(&request)
            .map_err(|e| StencilError::InstallFailed {
                name: self.reference.name.clone(),
                version: version.to_string(),
                message: format!("{:#}", e),
            })
    }
}

/// Location of the store inside a cache home.
pub fn store_layout(cache_home: &Path) -> (PathBuf, PathBuf) {
    let target = cache_home.join("dependencies");
    let store = target.join("node_modules");
    (target, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::manifest::MANIFEST_FILE;
    use crate::registry::StaticRegistry;
    use std::cell::RefCell;
    use tempfile::TempDir;

    const NAME: &str = "@stencil/command-init";

    /// Installer that materializes the store entry with a manifest.
    #[derive(Default)]
    struct FakeInstaller {
        installed: RefCell<Vec<String>>,
    }

    impl Installer for FakeInstaller {
        fn install(&self, request: &InstallRequest<'_>) -> anyhow::Result<()> {
            let store = request.store_dir.unwrap_or(request.root);
            let entry = cache_entry_path(store, request.name, request.version);
            fs::create_dir_all(&entry)?;
            fs::write(
                entry.join(MANIFEST_FILE),
                format!(r#"{{"name": "{}", "main": "bin/entry"}}"#, request.name),
            )?;
            self.installed
                .borrow_mut()
                .push(request.version.to_string());
            Ok(())
        }
    }

    struct BrokenInstaller;

    impl Installer for BrokenInstaller {
        fn install(&self, _request: &InstallRequest<'_>) -> anyhow::Result<()> {
            anyhow::bail!("registry refused the tarball")
        }
    }

    fn resolver(versions: &[&str]) -> VersionResolver {
        let registry = StaticRegistry::new();
        for v in versions {
            registry.publish(NAME, v);
        }
        VersionResolver::new(Box::new(registry), "https://registry.test")
    }

    fn cached_ref(temp: &TempDir, version: &str) -> ArtifactRef {
        let (target, store) = store_layout(temp.path());
        ArtifactRef::cached(NAME, version, target, store)
    }

    #[test]
    fn prepare_creates_store_and_pins_latest() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&["1.0.0", "1.2.0", "1.1.0"]);
        let installer = FakeInstaller::default();
        let mut artifact = Artifact::new(cached_ref(&temp, LATEST), &resolver, &installer);

        artifact.prepare().unwrap();

        assert_eq!(artifact.version(), "1.2.0");
        assert!(store_layout(temp.path()).1.is_dir());
    }

    #[test]
    fn prepare_keeps_explicit_version() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&["2.0.0"]);
        let installer = FakeInstaller::default();
        let mut artifact = Artifact::new(cached_ref(&temp, "1.0.0"), &resolver, &installer);

        artifact.prepare().unwrap();
        assert_eq!(artifact.version(), "1.0.0");
    }

    #[test]
    fn prepare_without_versions_fails() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&[]);
        let installer = FakeInstaller::default();
        let mut artifact = Artifact::new(cached_ref(&temp, LATEST), &resolver, &installer);

        let err = artifact.prepare().unwrap_err();
        assert!(matches!(err, StencilError::NoPublishedVersion { .. }));
    }

    #[test]
    fn exists_only_after_install() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&["1.0.0"]);
        let installer = FakeInstaller::default();
        let mut artifact = Artifact::new(cached_ref(&temp, LATEST), &resolver, &installer);

        assert!(!artifact.exists().unwrap());
        artifact.install().unwrap();
        assert!(artifact.exists().unwrap());
        assert_eq!(*installer.installed.borrow(), vec!["1.0.0"]);
    }

    #[test]
    fn install_failure_is_install_failed() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&["1.0.0"]);
        let mut artifact = Artifact::new(cached_ref(&temp, LATEST), &resolver, &BrokenInstaller);

        let err = artifact.install().unwrap_err();
        match err {
            StencilError::InstallFailed {
                version, message, ..
            } => {
                assert_eq!(version, "1.0.0");
                assert!(message.contains("refused"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn update_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&["1.0.0"]);
        let installer = FakeInstaller::default();
        let mut artifact = Artifact::new(cached_ref(&temp, LATEST), &resolver, &installer);
        artifact.install().unwrap();

        artifact.update().unwrap();
        artifact.update().unwrap();

        assert_eq!(artifact.version(), "1.0.0");
        assert_eq!(installer.installed.borrow().len(), 1);
    }

    #[test]
    fn update_is_noop_when_latest_entry_present() {
        let temp = TempDir::new().unwrap();
        let registry = StaticRegistry::new();
        registry.publish(NAME, "1.0.0");
        let resolver = VersionResolver::new(Box::new(registry), "https://registry.test");
        let installer = FakeInstaller::default();

        let mut first = Artifact::new(cached_ref(&temp, LATEST), &resolver, &installer);
        first.install().unwrap();
        let old_entry = first.cache_entry_path().unwrap();

        let (target, store) = store_layout(temp.path());
        let mut pinned = Artifact::new(
            ArtifactRef::cached(NAME, "0.9.0", target, store),
            &resolver,
            &installer,
        );
        pinned.update().unwrap();
        assert_eq!(pinned.version(), "0.9.0");
        assert_eq!(installer.installed.borrow().len(), 1);
        assert!(old_entry.exists());
    }

    #[test]
    fn update_moves_version_after_install() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&["1.0.0", "1.1.0"]);
        let installer = FakeInstaller::default();
        let mut artifact = Artifact::new(cached_ref(&temp, "1.0.0"), &resolver, &installer);
        artifact.install().unwrap();
        let old_entry = artifact.cache_entry_path().unwrap();

        artifact.update().unwrap();

        assert_eq!(artifact.version(), "1.1.0");
        assert_eq!(*installer.installed.borrow(), vec!["1.0.0", "1.1.0"]);
        assert!(old_entry.exists());
        assert!(artifact.cache_entry_path().unwrap().exists());
    }

    #[test]
    fn failed_update_keeps_version() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&["1.0.0", "1.1.0"]);
        let mut artifact = Artifact::new(cached_ref(&temp, "1.0.0"), &resolver, &BrokenInstaller);

        assert!(artifact.update().is_err());
        assert_eq!(artifact.version(), "1.0.0");
    }

    #[test]
    fn local_mode_checks_target_path() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&[]);
        let installer = FakeInstaller::default();

        let mut present = Artifact::new(
            ArtifactRef::local(NAME, LATEST, temp.path()),
            &resolver,
            &installer,
        );
        assert!(present.exists().unwrap());
        assert_eq!(present.version(), LATEST);

        let mut absent = Artifact::new(
            ArtifactRef::local(NAME, LATEST, temp.path().join("missing")),
            &resolver,
            &installer,
        );
        assert!(!absent.exists().unwrap());
    }

    #[test]
    fn local_mode_refuses_install_and_update() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&["1.0.0"]);
        let installer = FakeInstaller::default();
        let mut artifact = Artifact::new(
            ArtifactRef::local(NAME, LATEST, temp.path()),
            &resolver,
            &installer,
        );

        assert!(matches!(
            artifact.install().unwrap_err(),
            StencilError::InstallFailed { .. }
        ));
        assert!(matches!(
            artifact.update().unwrap_err(),
            StencilError::InstallFailed { .. }
        ));
        assert!(installer.installed.borrow().is_empty());
    }

    #[test]
    fn entry_file_from_cache_entry() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&["1.0.0"]);
        let installer = FakeInstaller::default();
        let mut artifact = Artifact::new(cached_ref(&temp, LATEST), &resolver, &installer);
        artifact.install().unwrap();

        let entry = artifact.entry_file_path().unwrap().unwrap();
        let expected = artifact.cache_entry_path().unwrap().join("bin").join("entry");
        assert_eq!(entry, expected);
    }

    #[test]
    fn entry_file_from_local_target() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(MANIFEST_FILE),
            r#"{"name": "local", "main": "run.sh"}"#,
        )
        .unwrap();
        let resolver = resolver(&[]);
        let installer = FakeInstaller::default();
        let artifact = Artifact::new(
            ArtifactRef::local(NAME, LATEST, temp.path()),
            &resolver,
            &installer,
        );

        assert_eq!(
            artifact.entry_file_path().unwrap(),
            Some(temp.path().join("run.sh"))
        );
    }
}
