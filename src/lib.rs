//! Finds named resources in embedded bundles, search roots, next to the
//! executable, or in the working directory.
//!
//! ```no_run
//! use resource_locator::{EmbeddedSource, ResourceLocator};
//!
//! let locator = ResourceLocator::builder()
//!     .bundle(EmbeddedSource::new("app").with_entry("motd.txt", &b"hello"[..]))
//!     .search_root("assets")
//!     .build();
//!
//! let motd = locator.resolve_as_text("motd.txt");
//! let on_disk = locator.resolve_as_file("logo.svg");
//! ```

pub mod config;
pub mod file_system;
pub mod locator;
pub mod source;

use once_cell::sync::Lazy;
use std::path::PathBuf;
use url::Url;

pub use config::LocatorConfig;
pub use locator::{ResourceLocator, ResourceLocatorBuilder};
pub use source::{
    add_system_root, clear_global, register_global_bundle, DirectorySource, EmbeddedSource,
    ExecutableDirSource, GlobalBundles, LookupSource, ResourceStream, SystemRoots,
};

static DEFAULT_LOCATOR: Lazy<ResourceLocator> = Lazy::new(ResourceLocator::new);

/// Reads a resource into a `String` using the default locator.
pub fn resolve_as_text(name: &str) -> Option<String> {
    DEFAULT_LOCATOR.resolve_as_text(name)
}

/// Reads a resource's raw bytes using the default locator.
pub fn resolve_as_bytes(name: &str) -> Option<Vec<u8>> {
    DEFAULT_LOCATOR.resolve_as_bytes(name)
}

/// Opens a resource for reading using the default locator.
pub fn resolve_as_stream(name: &str) -> Option<ResourceStream> {
    DEFAULT_LOCATOR.resolve_as_stream(name)
}

/// Where the default locator finds a resource: a `file://` or `embedded:` URL.
pub fn resolve_as_location(name: &str) -> Option<Url> {
    DEFAULT_LOCATOR.resolve_as_location(name)
}

/// The resource as a loose file, or `None` if it only exists in a bundle.
pub fn resolve_as_file(name: &str) -> Option<PathBuf> {
    DEFAULT_LOCATOR.resolve_as_file(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_locator_sees_global_registrations() -> Result<()> {
        register_global_bundle(
            EmbeddedSource::new("defaults").with_entry("default_locator_test/motd.txt", &b"welcome"[..]),
        )?;

        assert_eq!(resolve_as_text("default_locator_test/motd.txt").as_deref(), Some("welcome"));
        assert_eq!(resolve_as_bytes("default_locator_test/motd.txt"), Some(b"welcome".to_vec()));
        assert!(resolve_as_stream("default_locator_test/motd.txt").is_some());
        assert!(resolve_as_location("default_locator_test/motd.txt").is_some());
        assert_eq!(resolve_as_file("default_locator_test/motd.txt"), None);

        assert_eq!(resolve_as_text("default_locator_test/absent.txt"), None);
        Ok(())
    }
}
