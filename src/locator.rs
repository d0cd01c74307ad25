use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use url::Url;

use crate::file_system::{file_url, url_to_file_path, working_dir_candidates};
use crate::source::{
    DirectorySource, EmbeddedSource, ExecutableDirSource, GlobalBundles, LookupSource,
    ResourceStream, SystemRoots,
};

/// What a successful lookup produces. Stream and location resolution share
/// the whole search and differ only in their `Terminal`.
trait Terminal {
    type Output;

    fn at_source(&self, source: &dyn LookupSource, name: &str) -> Result<Option<Self::Output>>;

    fn at_file(&self, path: &Path) -> Result<Self::Output>;
}

struct OpenStream;

impl Terminal for OpenStream {
    type Output = ResourceStream;

    fn at_source(&self, source: &dyn LookupSource, name: &str) -> Result<Option<ResourceStream>> {
        source.open(name)
    }

    fn at_file(&self, path: &Path) -> Result<ResourceStream> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(Box::new(file))
    }
}

struct Locate;

impl Terminal for Locate {
    type Output = Url;

    fn at_source(&self, source: &dyn LookupSource, name: &str) -> Result<Option<Url>> {
        source.locate(name)
    }

    fn at_file(&self, path: &Path) -> Result<Url> {
        file_url(path)
    }
}

/// Finds named resources across an ordered list of lookup sources.
///
/// Every name is tried twice against the full list: as given, then with a
/// single `/` prepended. If both passes miss, the working directory and the
/// literal path are checked for a regular file.
pub struct ResourceLocator {
    sources: Vec<Box<dyn LookupSource>>,
    working_dir_fallback: bool,
}

impl ResourceLocator {
    /// Global sources, the executable directory and the working-directory
    /// fallback. No locator-owned bundles or roots.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ResourceLocatorBuilder {
        ResourceLocatorBuilder::default()
    }

    /// Labels of the sources in the order they are consulted.
    pub fn sources(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.label()).collect()
    }

    /// Name variants tried against the sources, in order.
    pub fn candidates(name: &str) -> [String; 2] {
        [name.to_string(), format!("/{}", name)]
    }

    fn search<T: Terminal>(&self, name: &str, terminal: &T) -> Result<Option<T::Output>> {
        for candidate in Self::candidates(name) {
            for source in &self.sources {
                if let Some(found) = terminal.at_source(source.as_ref(), &candidate)? {
                    tracing::debug!(
                        target: "resource_locator::locator",
                        name = %name,
                        candidate = %candidate,
                        source = source.label(),
                        "Resource found."
                    );
                    return Ok(Some(found));
                }
            }
        }

        if self.working_dir_fallback {
            for path in working_dir_candidates(name)? {
                if path.is_file() {
                    tracing::debug!(
                        target: "resource_locator::locator",
                        name = %name,
                        path = %path.display(),
                        "Resource found on the filesystem fallback."
                    );
                    return terminal.at_file(&path).map(Some);
                }
            }
        }

        tracing::debug!(target: "resource_locator::locator", name = %name, "Resource not found.");
        Ok(None)
    }

    /// Runs a lookup, logging and swallowing any failure.
    fn boundary<T>(name: &str, lookup: impl FnOnce() -> Result<Option<T>>) -> Option<T> {
        lookup().unwrap_or_else(|e| {
            tracing::error!(
                target: "resource_locator::locator",
                name = %name,
                error = ?e,
                "Exception finding resource file."
            );
            None
        })
    }

    pub fn resolve_as_stream(&self, name: &str) -> Option<ResourceStream> {
        Self::boundary(name, || self.search(name, &OpenStream))
    }

    pub fn resolve_as_location(&self, name: &str) -> Option<Url> {
        Self::boundary(name, || self.search(name, &Locate))
    }

    pub fn resolve_as_bytes(&self, name: &str) -> Option<Vec<u8>> {
        Self::boundary(name, || {
            let Some(mut stream) = self.search(name, &OpenStream)? else {
                return Ok(None);
            };
            let mut bytes = Vec::new();
            stream
                .read_to_end(&mut bytes)
                .with_context(|| format!("Failed to read resource '{}'", name))?;
            Ok(Some(bytes))
        })
    }

    /// Full contents decoded as UTF-8. Invalid UTF-8 counts as not found.
    pub fn resolve_as_text(&self, name: &str) -> Option<String> {
        Self::boundary(name, || {
            let Some(mut stream) = self.search(name, &OpenStream)? else {
                return Ok(None);
            };
            let mut text = String::new();
            stream
                .read_to_string(&mut text)
                .with_context(|| format!("Failed to read resource '{}' as UTF-8 text", name))?;
            Ok(Some(text))
        })
    }

    /// The resource as a loose file on disk.
    ///
    /// Returns `None` when the resource exists only inside a bundle, since
    /// that cannot be handed out as a filesystem path.
    pub fn resolve_as_file(&self, name: &str) -> Option<PathBuf> {
        let url = self.resolve_as_location(name)?;

        let Some(path) = url_to_file_path(&url) else {
            tracing::debug!(target: "resource_locator::locator", name = %name, url = %url, "Resource is not a loose file.");
            return None;
        };

        if !path.is_file() {
            tracing::debug!(target: "resource_locator::locator", name = %name, path = %path.display(), "Resource location is not a regular file.");
            return None;
        }
        Some(path)
    }
}

impl Default for ResourceLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles a [`ResourceLocator`] in the standard source order.
pub struct ResourceLocatorBuilder {
    bundles: Vec<EmbeddedSource>,
    search_roots: Vec<PathBuf>,
    extra_sources: Vec<Box<dyn LookupSource>>,
    global_sources: bool,
    executable_dir: bool,
    working_dir_fallback: bool,
}

impl Default for ResourceLocatorBuilder {
    fn default() -> Self {
        Self {
            bundles: Vec::new(),
            search_roots: Vec::new(),
            extra_sources: Vec::new(),
            global_sources: true,
            executable_dir: true,
            working_dir_fallback: true,
        }
    }
}

impl ResourceLocatorBuilder {
    pub fn bundle(mut self, bundle: EmbeddedSource) -> Self {
        self.bundles.push(bundle);
        self
    }

    pub fn search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_roots.push(root.into());
        self
    }

    /// Appends a custom source after the locator's own roots and before the
    /// executable directory.
    pub fn source(mut self, source: impl LookupSource + 'static) -> Self {
        self.extra_sources.push(Box::new(source));
        self
    }

    pub fn global_sources(mut self, enabled: bool) -> Self {
        self.global_sources = enabled;
        self
    }

    pub fn executable_dir(mut self, enabled: bool) -> Self {
        self.executable_dir = enabled;
        self
    }

    pub fn working_dir_fallback(mut self, enabled: bool) -> Self {
        self.working_dir_fallback = enabled;
        self
    }

    pub fn build(self) -> ResourceLocator {
        let mut sources: Vec<Box<dyn LookupSource>> = Vec::new();

        if self.global_sources {
            sources.push(Box::new(GlobalBundles));
            sources.push(Box::new(SystemRoots));
        }
        for bundle in self.bundles {
            sources.push(Box::new(bundle));
        }
        for root in self.search_roots {
            sources.push(Box::new(DirectorySource::new(root)));
        }
        sources.extend(self.extra_sources);
        if self.executable_dir {
            sources.push(Box::new(ExecutableDirSource::new()));
            sources.push(Box::new(ExecutableDirSource::subdir("resources")));
        }

        ResourceLocator {
            sources,
            working_dir_fallback: self.working_dir_fallback,
        }
    }
}
