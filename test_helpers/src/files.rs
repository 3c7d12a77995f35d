//! Temporary environment files.

use std::fs;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A temporary directory for writing `NAME=value` files.
///
/// The directory and its files are removed on drop.
///
/// # Examples
///
/// ```
/// use layered_cli_test_helpers::files::EnvFiles;
///
/// # fn main() -> anyhow::Result<()> {
/// let files = EnvFiles::new()?;
/// let path = files.write("app.env", "PORT=8080\n")?;
/// assert_eq!(std::fs::read_to_string(&path)?, "PORT=8080\n");
/// assert!(path.starts_with(files.root()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EnvFiles {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl EnvFiles {
    /// Creates an empty temporary directory.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be created or its path is not UTF-8.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create env file directory")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow::anyhow!("non UTF-8 temp path: {}", path.display()))?;
        Ok(Self { _dir: dir, root })
    }

    /// Directory holding the files.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Writes `contents` to `name` inside the directory.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }

    /// Path inside the directory that does not exist.
    #[must_use]
    pub fn missing(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}
