use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use url::Url;

use super::{DirectorySource, EmbeddedSource, LookupSource, ResourceStream};

#[derive(Default)]
struct GlobalResources {
    bundles: Vec<Arc<EmbeddedSource>>,
    roots: Vec<Arc<DirectorySource>>,
}

static GLOBAL_RESOURCES: Lazy<Mutex<GlobalResources>> =
    Lazy::new(|| Mutex::new(GlobalResources::default()));

fn lock_global() -> Result<MutexGuard<'static, GlobalResources>> {
    GLOBAL_RESOURCES
        .lock()
        .map_err(|_| anyhow!("Failed to acquire global resource registry lock"))
}

/// Makes an embedded bundle visible to every locator that consults the
/// process-wide sources.
pub fn register_global_bundle(bundle: EmbeddedSource) -> Result<()> {
    tracing::debug!(target: "resource_locator::global", bundle = bundle.label(), "Registering global bundle.");
    lock_global()?.bundles.push(Arc::new(bundle));
    Ok(())
}

/// Adds a directory to the process-wide search roots.
pub fn add_system_root(root: impl Into<PathBuf>) -> Result<()> {
    let source = DirectorySource::new(root);
    tracing::debug!(target: "resource_locator::global", root = %source.root().display(), "Adding system root.");
    lock_global()?.roots.push(Arc::new(source));
    Ok(())
}

/// Drops every registered bundle and root.
pub fn clear_global() -> Result<()> {
    let mut global = lock_global()?;
    global.bundles.clear();
    global.roots.clear();
    Ok(())
}

/// Snapshot the list so the lock is not held across file I/O.
fn snapshot<S: Clone>(select: impl FnOnce(&GlobalResources) -> &Vec<S>) -> Result<Vec<S>> {
    let global = lock_global()?;
    Ok(select(&global).clone())
}

fn first_hit<S, T>(
    sources: &[Arc<S>],
    mut attempt: impl FnMut(&S) -> Result<Option<T>>,
) -> Result<Option<T>> {
    for source in sources {
        if let Some(found) = attempt(source.as_ref())? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Process-wide embedded bundles, in registration order.
#[derive(Default)]
pub struct GlobalBundles;

impl LookupSource for GlobalBundles {
    fn label(&self) -> &str {
        "global-bundles"
    }

    fn open(&self, name: &str) -> Result<Option<ResourceStream>> {
        first_hit(&snapshot(|g| &g.bundles)?, |bundle| bundle.open(name))
    }

    fn locate(&self, name: &str) -> Result<Option<Url>> {
        first_hit(&snapshot(|g| &g.bundles)?, |bundle| bundle.locate(name))
    }
}

/// Process-wide directory roots, in registration order.
#[derive(Default)]
pub struct SystemRoots;

impl LookupSource for SystemRoots {
    fn label(&self) -> &str {
        "system-roots"
    }

    fn open(&self, name: &str) -> Result<Option<ResourceStream>> {
        first_hit(&snapshot(|g| &g.roots)?, |root| root.open(name))
    }

    fn locate(&self, name: &str) -> Result<Option<Url>> {
        first_hit(&snapshot(|g| &g.roots)?, |root| root.locate(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use serial_test::serial;
    use std::fs;

    // The registry is shared by the whole test binary; every test touching it
    // is serialized and uses names nobody else registers.

    #[test]
    #[serial]
    fn test_global_bundles() -> Result<()> {
        assert!(GlobalBundles.open("global_bundle_test/a.txt")?.is_none());

        register_global_bundle(EmbeddedSource::new("first").with_entry("global_bundle_test/a.txt", &b"first"[..]))?;
        register_global_bundle(EmbeddedSource::new("second").with_entry("global_bundle_test/a.txt", &b"second"[..]))?;

        let url = GlobalBundles
            .locate("global_bundle_test/a.txt")?
            .context("registered entry should locate")?;
        assert_eq!(url.path(), "/first/global_bundle_test/a.txt");
        Ok(())
    }

    #[test]
    #[serial]
    fn test_system_roots() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        fs::write(temp_dir.path().join("system_root_probe.txt"), "sys")?;

        assert!(SystemRoots.open("system_root_probe.txt")?.is_none());
        add_system_root(temp_dir.path())?;
        assert!(SystemRoots.open("system_root_probe.txt")?.is_some());
        Ok(())
    }

    #[test]
    #[serial]
    fn test_clear_global() -> Result<()> {
        register_global_bundle(EmbeddedSource::new("cleared").with_entry("clear_global_test.txt", &b"x"[..]))?;
        assert!(GlobalBundles.open("clear_global_test.txt")?.is_some());

        clear_global()?;
        assert!(GlobalBundles.open("clear_global_test.txt")?.is_none());
        Ok(())
    }
}
