use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

use super::{LookupSource, ResourceStream};
use crate::file_system::{file_url, join_under_root};

/// A loose directory that resource names are resolved beneath.
pub struct DirectorySource {
    label: String,
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            label: format!("dir:{}", root.display()),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn find(&self, name: &str) -> Option<PathBuf> {
        join_under_root(&self.root, name).filter(|candidate| candidate.is_file())
    }
}

impl LookupSource for DirectorySource {
    fn label(&self) -> &str {
        &self.label
    }

    fn open(&self, name: &str) -> Result<Option<ResourceStream>> {
        let Some(path) = self.find(name) else {
            return Ok(None);
        };
        let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(Some(Box::new(file)))
    }

    fn locate(&self, name: &str) -> Result<Option<Url>> {
        self.find(name).map(|path| file_url(&path)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;

    #[test]
    fn test_directory_source() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        fs::create_dir_all(temp_dir.path().join("conf"))?;
        fs::write(temp_dir.path().join("conf").join("app.toml"), "answer = 42\n")?;

        let source = DirectorySource::new(temp_dir.path());

        // Test 1: relative name
        let mut stream = source.open("conf/app.toml")?.context("relative name should resolve")?;
        let mut text = String::new();
        stream.read_to_string(&mut text)?;
        assert_eq!(text, "answer = 42\n");

        // Test 2: leading separator is rooted at the source root
        assert!(source.open("/conf/app.toml")?.is_some());

        // Test 3: directories are not resources
        assert!(source.open("conf")?.is_none());
        assert!(source.locate("conf")?.is_none());

        // Test 4: location is a file URL to the canonical path
        let url = source.locate("conf/app.toml")?.context("should locate")?;
        assert_eq!(url.to_file_path().ok(), Some(dunce::canonicalize(temp_dir.path().join("conf/app.toml"))?));
        Ok(())
    }

    #[test]
    fn test_directory_source_does_not_escape_root() -> Result<()> {
        let outer = tempfile::tempdir()?;
        fs::write(outer.path().join("secret.txt"), "nope")?;
        let inner = outer.path().join("root");
        fs::create_dir_all(&inner)?;

        let source = DirectorySource::new(&inner);
        assert!(source.open("../secret.txt")?.is_none());
        assert!(source.locate("../secret.txt")?.is_none());
        Ok(())
    }
}
