//! Version lookups against a package registry.
//!
//! The registry itself is an external collaborator: all the core needs is
//! "list the published versions of X", expressed as the [`VersionSource`]
//! trait. [`HttpRegistry`] speaks the npm-compatible document protocol and
//! [`StaticRegistry`] serves a fixed in-memory catalogue.
//!
//! [`VersionResolver`] builds the two queries the rest of the crate uses on
//! top of a source: the latest version, and the latest version strictly
//! greater than a baseline.
//!
//! # Example
//!
//! ```
//! use stencil::registry::{StaticRegistry, VersionResolver};
//!
//! let registry = StaticRegistry::new();
//! registry.publish("@stencil/command-init", "1.0.0");
//! registry.publish("@stencil/command-init", "1.2.0");
//! registry.publish("@stencil/command-init", "1.1.0");
//!
//! let resolver = VersionResolver::new(Box::new(registry), "https://registry.test");
//! let latest = resolver.latest_version("@stencil/command-init", None).unwrap();
//! assert_eq!(latest.as_deref(), Some("1.2.0"));
//! ```

pub mod http;
pub mod resolver;

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::Result;

pub use http::HttpRegistry;
pub use resolver::VersionResolver;

/// Registry mirror used unless configured otherwise.
pub const MIRROR_REGISTRY: &str = "https://registry.npmmirror.com";

/// The upstream public registry.
pub const ORIGINAL_REGISTRY: &str = "https://registry.npmjs.org";

/// Get the default registry address.
///
/// Returns the upstream registry when `original` is set, the mirror otherwise.
pub fn default_registry(original: bool) -> &'static str {
    if original {
        ORIGINAL_REGISTRY
    } else {
        MIRROR_REGISTRY
    }
}

/// Something that can list the published versions of a package.
pub trait VersionSource {
    /// List every published version of `name` in `registry`.
    ///
    /// An unknown package yields an empty list. Transport and protocol
    /// failures yield [`StencilError::RegistryUnavailable`](crate::StencilError::RegistryUnavailable).
    fn versions(&self, name: &str, registry: &str) -> Result<Vec<String>>;
}

/// In-memory version source.
///
/// Ignores the registry address. Versions can be published after
/// construction, which lets callers simulate a new release.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    packages: RefCell<BTreeMap<String, Vec<String>>>,
}

impl StaticRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a published version.
    pub fn publish(&self, name: &str, version: &str) {
        self.packages
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push(version.to_string());
    }
}

impl VersionSource for StaticRegistry {
    fn versions(&self, name: &str, _registry: &str) -> Result<Vec<String>> {
        Ok(self
            .packages
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default())
    }
}
