use anyhow::{anyhow, Context, Result};
use include_dir::Dir;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Cursor;
use url::Url;

use super::{LookupSource, ResourceStream};

pub const EMBEDDED_SCHEME: &str = "embedded";

enum Contents {
    Compiled(&'static Dir<'static>),
    Registered(BTreeMap<String, Cow<'static, [u8]>>),
}

/// Resources that live inside the binary rather than on disk.
///
/// Keys are matched exactly: an entry registered as `"data/x.bin"` is not
/// found by `"/data/x.bin"`, and vice versa. Directories compiled in with
/// `include_dir!` never carry a leading separator.
pub struct EmbeddedSource {
    label: String,
    contents: Contents,
}

impl EmbeddedSource {
    /// Wraps a directory compiled in with `include_dir!`.
    pub fn from_dir(label: impl Into<String>, dir: &'static Dir<'static>) -> Self {
        Self {
            label: label.into(),
            contents: Contents::Compiled(dir),
        }
    }

    /// Starts an empty in-memory bundle; fill it with [`EmbeddedSource::with_entry`].
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            contents: Contents::Registered(BTreeMap::new()),
        }
    }

    pub fn with_entry(mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.insert(name, bytes);
        self
    }

    /// Adds an entry. Compiled bundles are converted to an in-memory copy first.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) {
        if let Contents::Compiled(dir) = self.contents {
            let mut entries = BTreeMap::new();
            collect_files(dir, &mut entries);
            self.contents = Contents::Registered(entries);
        }
        if let Contents::Registered(entries) = &mut self.contents {
            entries.insert(name.into(), bytes.into());
        }
    }

    fn get(&self, name: &str) -> Option<&[u8]> {
        match &self.contents {
            Contents::Compiled(dir) => dir.get_file(name).map(|file| file.contents()),
            Contents::Registered(entries) => entries.get(name).map(|bytes| &bytes[..]),
        }
    }

    /// `embedded:///<label>/<name>`. The label is a single percent-encoded
    /// segment, so any label yields a valid URL.
    fn url_for(&self, name: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}:///", EMBEDDED_SCHEME))
            .context("Failed to build embedded resource URL")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Embedded resource URL cannot carry a path"))?
            .push(&self.label)
            .extend(name.split('/'));
        Ok(url)
    }
}

fn collect_files(dir: &'static Dir<'static>, entries: &mut BTreeMap<String, Cow<'static, [u8]>>) {
    for file in dir.files() {
        entries.insert(
            file.path().to_string_lossy().replace('\\', "/"),
            Cow::Borrowed(file.contents()),
        );
    }
    for sub_dir in dir.dirs() {
        collect_files(sub_dir, entries);
    }
}

impl LookupSource for EmbeddedSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn open(&self, name: &str) -> Result<Option<ResourceStream>> {
        Ok(self.get(name).map(|bytes| {
            // Owned copy keeps the stream 'static for registered bundles too.
            Box::new(Cursor::new(bytes.to_vec())) as ResourceStream
        }))
    }

    fn locate(&self, name: &str) -> Result<Option<Url>> {
        if self.get(name).is_none() {
            return Ok(None);
        }
        self.url_for(name).map(Some)
    }
}
