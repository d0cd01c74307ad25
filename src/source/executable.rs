use anyhow::Result;
use std::path::PathBuf;
use url::Url;

use super::{DirectorySource, LookupSource, ResourceStream};
use crate::file_system::executable_dir;

/// Resolves names next to the running binary, or in a subdirectory of it.
///
/// The executable path is looked up on every call so that a source built
/// before the binary is relocated still points at the right place.
pub struct ExecutableDirSource {
    label: String,
    subdir: Option<PathBuf>,
}

impl ExecutableDirSource {
    pub fn new() -> Self {
        Self {
            label: "exe".to_string(),
            subdir: None,
        }
    }

    /// `<exe dir>/<subdir>`, e.g. the conventional `resources/` folder.
    pub fn subdir(subdir: impl Into<PathBuf>) -> Self {
        let subdir = subdir.into();
        Self {
            label: format!("exe:{}", subdir.display()),
            subdir: Some(subdir),
        }
    }

    fn directory(&self) -> Result<DirectorySource> {
        let exe_dir = executable_dir()?;
        Ok(DirectorySource::new(match &self.subdir {
            Some(subdir) => exe_dir.join(subdir),
            None => exe_dir,
        }))
    }
}

impl Default for ExecutableDirSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupSource for ExecutableDirSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn open(&self, name: &str) -> Result<Option<ResourceStream>> {
        self.directory()?.open(name)
    }

    fn locate(&self, name: &str) -> Result<Option<Url>> {
        self.directory()?.locate(name)
    }
}
