use anyhow::Result;
use std::io::Read;
use url::Url;

pub mod directory;
pub mod embedded;
pub mod executable;
pub mod global;

pub use directory::DirectorySource;
pub use embedded::EmbeddedSource;
pub use executable::ExecutableDirSource;
pub use global::{add_system_root, clear_global, register_global_bundle, GlobalBundles, SystemRoots};

/// An open, readable resource. The caller owns it and releases it on drop.
pub type ResourceStream = Box<dyn Read + Send>;

/// One place a resource name can be resolved against.
///
/// Both methods return `Ok(None)` for "not here" and reserve `Err` for
/// genuine failures (unreadable file, malformed URL, poisoned registry).
/// Callers treat an `Err` from one source as fatal for the whole lookup.
pub trait LookupSource: Send + Sync {
    /// Short human-readable identifier used in logs.
    fn label(&self) -> &str;

    fn open(&self, name: &str) -> Result<Option<ResourceStream>>;

    fn locate(&self, name: &str) -> Result<Option<Url>>;
}
