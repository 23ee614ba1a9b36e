//! Filesystem infrastructure — implements `HostFs` over the real filesystem.

use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::HostFs;

/// Production filesystem implementation of `HostFs`.
pub struct LocalFs;

impl HostFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    /// Writes to a temporary file in the same directory, then renames it over
    /// `path`, so readers never observe a half-written config.
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating directory {}", dir.display()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("creating temporary file in {}", dir.display()))?;
        tmp.write_all(content.as_bytes())
            .with_context(|| format!("writing file {}", path.display()))?;
        tmp.persist(path)
            .with_context(|| format!("replacing file {}", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading file {}", path.display()))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other.with_context(|| format!("removing file {}", path.display())),
        }
    }

    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        self.remove_file(link)?;
        #[cfg(unix)]
        std::os::unix::fs::symlink(target, link)
            .with_context(|| format!("linking {} -> {}", link.display(), target.display()))?;
        #[cfg(not(unix))]
        std::fs::copy(target, link)
            .map(|_| ())
            .with_context(|| format!("copying {} -> {}", target.display(), link.display()))?;
        Ok(())
    }

    fn set_permissions(&self, path: &Path, _mode: u32) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(_mode))
                .with_context(|| format!("setting permissions on {}", path.display()))?;
        }
        Ok(())
    }
}
