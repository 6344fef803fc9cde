//! Latest-version queries.

use semver::{Version, VersionReq};

use crate::error::{Result, StencilError};

use super::VersionSource;

/// Answers "which version is newest" questions on top of a [`VersionSource`].
///
/// Comparison is semantic, never lexical. Published strings that are not
/// valid semver are ignored.
pub struct VersionResolver {
    source: Box<dyn VersionSource>,
    registry: String,
}

impl VersionResolver {
    /// Create a resolver that queries `registry` unless told otherwise.
    pub fn new(source: Box<dyn VersionSource>, registry: impl Into<String>) -> Self {
        Self {
            source,
            registry: registry.into(),
        }
    }

    /// The registry queried when a call does not name one.
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// Greatest published version of `name`, if any.
    pub fn latest_version(&self, name: &str, registry: Option<&str>) -> Result<Option<String>> {
        let versions = self.published(name, registry)?;
        Ok(greatest(versions, |_| true))
    }

    /// Greatest published version of `name` strictly greater than `baseline`.
    pub fn latest_version_satisfying(
        &self,
        baseline: &str,
        name: &str,
        registry: Option<&str>,
    ) -> Result<Option<String>> {
        let req = VersionReq::parse(&format!(">{}", baseline)).map_err(|e| {
            StencilError::InvalidArguments {
                message: format!("invalid baseline version '{}': {}", baseline, e),
            }
        })?;

        let versions = self.published(name, registry)?;
        Ok(greatest(versions, |v| req.matches(v)))
    }

    fn published(&self, name: &str, registry: Option<&str>) -> Result<Vec<String>> {
        let registry = registry.unwrap_or(&self.registry);
        self.source.versions(name, registry)
    }
}

/// Pick the greatest parseable version accepted by `keep`.
fn greatest(versions: Vec<String>, keep: impl Fn(&Version) -> bool) -> Option<String> {
    versions
        .into_iter()
        .filter_map(|raw| match Version::parse(&raw) {
            Ok(parsed) => Some((parsed, raw)),
            Err(_) => {
                tracing::debug!("Ignoring non-semver version '{}'", raw);
                None
            }
        })
        .filter(|(parsed, _)| keep(parsed))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, raw)| raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StaticRegistry;

    fn resolver_with(name: &str, versions: &[&str]) -> VersionResolver {
        let registry = StaticRegistry::new();
        for v in versions {
            registry.publish(name, v);
        }
        VersionResolver::new(Box::new(registry), "https://registry.test")
    }

    struct FailingSource;

    impl VersionSource for FailingSource {
        fn versions(&self, name: &str, _registry: &str) -> Result<Vec<String>> {
            Err(StencilError::RegistryUnavailable {
                name: name.to_string(),
                message: "connection refused".into(),
            })
        }
    }

    #[test]
    fn latest_version_sorts_semantically() {
        let resolver = resolver_with("pkg", &["1.0.0", "1.2.0", "1.1.0"]);
        assert_eq!(
            resolver.latest_version("pkg", None).unwrap().as_deref(),
            Some("1.2.0")
        );
    }

    #[test]
    fn latest_version_is_not_lexical() {
        let resolver = resolver_with("pkg", &["1.9.0", "1.10.0", "1.2.0"]);
        assert_eq!(
            resolver.latest_version("pkg", None).unwrap().as_deref(),
            Some("1.10.0")
        );
    }

    #[test]
    fn latest_version_none_when_unpublished() {
        let resolver = resolver_with("pkg", &[]);
        assert_eq!(resolver.latest_version("pkg", None).unwrap(), None);
    }

    #[test]
    fn latest_version_skips_invalid_strings() {
        let resolver = resolver_with("pkg", &["garbage", "0.3.0"]);
        assert_eq!(
            resolver.latest_version("pkg", None).unwrap().as_deref(),
            Some("0.3.0")
        );
    }

    #[test]
    fn satisfying_picks_greatest_above_baseline() {
        let resolver = resolver_with("pkg", &["1.0.0", "1.0.1", "0.9.0"]);
        assert_eq!(
            resolver
                .latest_version_satisfying("1.0.0", "pkg", None)
                .unwrap()
                .as_deref(),
            Some("1.0.1")
        );
    }

    #[test]
    fn satisfying_none_when_nothing_newer() {
        let resolver = resolver_with("pkg", &["1.0.0", "0.9.0"]);
        assert_eq!(
            resolver
                .latest_version_satisfying("1.0.0", "pkg", None)
                .unwrap(),
            None
        );
    }

    #[test]
    fn satisfying_rejects_invalid_baseline() {
        let resolver = resolver_with("pkg", &["1.0.0"]);
        let err = resolver
            .latest_version_satisfying("not-a-version", "pkg", None)
            .unwrap_err();
        assert!(matches!(err, StencilError::InvalidArguments { .. }));
    }

    #[test]
    fn registry_errors_propagate() {
        let resolver = VersionResolver::new(Box::new(FailingSource), "https://registry.test");
        let err = resolver.latest_version("pkg", None).unwrap_err();
        assert!(matches!(err, StencilError::RegistryUnavailable { .. }));
    }

    #[test]
    fn registry_defaults_to_configured() {
        let resolver = resolver_with("pkg", &[]);
        assert_eq!(resolver.registry(), "https://registry.test");
    }
}
