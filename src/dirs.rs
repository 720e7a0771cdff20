use std::fs::{self, DirBuilder};
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

use anyhow::{bail, Result};

/// Creates `path` and its missing parents. Existing directories are left as they are.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    create_dir(path, 0o755)
}

/// Like [`ensure_dir_exists`], but a newly created directory is owner-only.
/// Used for key material.
pub fn ensure_private_dir(path: &Path) -> Result<()> {
    create_dir(path, 0o700)
}

fn create_dir(path: &Path, mode: u32) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => bail!("'{}' exists but is not a directory", path.display()),
        Err(_) => {}
    }
    DirBuilder::new().recursive(true).mode(mode).create(path)?;
    Ok(())
}
