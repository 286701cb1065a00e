use std::{
    fs::{self, File},
    io::{Cursor, Read},
    path::{Path, PathBuf},
};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::error::{GoldError, Result};

/// Directory holding gold files, relative to the working directory of the test run.
pub const DEFAULT_DIR: &str = "testdata";

/// Maps logical gold file names onto a directory and does byte-exact I/O.
///
/// Names are joined onto the directory as given. A name with `..` segments
/// resolves outside of it; subdirectory names such as `sub/name.txt` are
/// the intended way to group fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceStore {
    dir: PathBuf,
}

impl Default for ReferenceStore {
    fn default() -> Self {
        Self::new(DEFAULT_DIR)
    }
}

impl ReferenceStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn resolve_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.dir.join(name)
    }

    #[instrument(skip_all, fields(name = %name.as_ref().display()))]
    pub fn read_bytes(&self, name: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = self.resolve_path(name);
        let mut file = File::open(&path).map_err(|error| GoldError::io(&path, error))?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|error| GoldError::io(&path, error))?;
        debug!(path = %path.display(), bytes = content.len(), "gold file read");
        Ok(content)
    }

    /// Reads a gold file as text. Invalid UTF-8 is replaced, never rejected.
    pub fn read_string(&self, name: impl AsRef<Path>) -> Result<String> {
        let content = self.read_bytes(name)?;
        Ok(match String::from_utf8(content) {
            Ok(text) => text,
            Err(error) => String::from_utf8_lossy(error.as_bytes()).into_owned(),
        })
    }

    pub fn reader(&self, name: impl AsRef<Path>) -> Result<Cursor<Vec<u8>>> {
        self.read_bytes(name).map(Cursor::new)
    }

    /// Creates or truncates the gold file. The parent directory must exist.
    #[instrument(skip_all, fields(name = %name.as_ref().display(), bytes = content.len()))]
    pub fn write_bytes(&self, name: impl AsRef<Path>, content: &[u8]) -> Result<()> {
        let path = self.resolve_path(name);
        fs::write(&path, content).map_err(|error| GoldError::io(&path, error))?;
        debug!(path = %path.display(), "gold file written");
        Ok(())
    }

    pub fn write_string(&self, name: impl AsRef<Path>, content: &str) -> Result<()> {
        self.write_bytes(name, content.as_bytes())
    }

    pub fn write_reader(&self, name: impl AsRef<Path>, mut content: impl Read) -> Result<()> {
        let mut buffer = Vec::new();
        content
            .read_to_end(&mut buffer)
            .map_err(|source| GoldError::ReadInput { source })?;
        self.write_bytes(name, &buffer)
    }

    /// Lists the logical names of every file under the gold directory, sorted.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Err(GoldError::io(
                &self.dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "gold directory not found"),
            ));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.dir).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(?error, "ignoring unreadable entry while listing gold files");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.dir) else {
                continue;
            };
            let name = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            names.push(name);
        }

        names.sort();
        debug!(count = names.len(), "gold files listed");
        Ok(names)
    }
}
