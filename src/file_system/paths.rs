use anyhow::{anyhow, Context, Result};
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Directory containing the running executable.
pub fn executable_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("Failed to get current executable path")?;
    let exe_dir = exe_path
        .parent()
        .ok_or_else(|| anyhow!("Executable has no parent directory"))?;
    Ok(exe_dir.to_path_buf())
}

/// Maps a resource name onto a path beneath `root`.
///
/// Leading separators are stripped, so `"/a/b.txt"` and `"a/b.txt"` land on the
/// same file. Returns `None` for names that are empty or would leave the root
/// (`..`, drive prefixes).
pub fn join_under_root(root: &Path, name: &str) -> Option<PathBuf> {
    let relative = Path::new(name.trim_start_matches(['/', '\\']));

    let mut candidate = root.to_path_buf();
    let mut pushed = false;
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                candidate.push(part);
                pushed = true;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    pushed.then_some(candidate)
}

/// Final-fallback paths for `name`: first relative to the working directory,
/// then the name taken literally.
pub fn working_dir_candidates(name: &str) -> Result<Vec<PathBuf>> {
    let cwd = std::env::current_dir().context("Failed to read current working directory")?;
    Ok(vec![cwd.join(name), PathBuf::from(name)])
}

/// `file://` URL for an existing loose file.
pub fn file_url(path: &Path) -> Result<Url> {
    let canonical = dunce::canonicalize(path)
        .with_context(|| format!("Failed to canonicalize {}", path.display()))?;
    Url::from_file_path(&canonical)
        .map_err(|_| anyhow!("Failed to convert path {} to URL", canonical.display()))
}

/// Interprets a location as a filesystem path.
///
/// Only `file:` URLs qualify. Percent-encoding is decoded by the conversion;
/// when the URL cannot be expressed as a local path (e.g. it carries a host)
/// the raw path text is used instead.
pub fn url_to_file_path(url: &Url) -> Option<PathBuf> {
    if url.scheme() != "file" {
        return None;
    }
    Some(
        url.to_file_path()
            .unwrap_or_else(|_| PathBuf::from(url.path())),
    )
}
