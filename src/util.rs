//! Small filesystem helpers shared by configuration loading and the build.

use anyhow::{anyhow, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Opens `path`, naming the `kind` of file in the error.
pub fn open(path: &Path, kind: &str) -> Result<File> {
    File::open(path).map_err(|e| anyhow!("Opening {} file `{}`: {}", kind, path.display(), e))
}

/// Removes `dir` and everything below it. A missing directory is fine.
pub fn rmdir(dir: &Path) -> io::Result<()> {
    match std::fs::remove_dir_all(dir) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        result => result,
    }
}

/// Recursively copies the contents of `src` into `dst`. A missing `src` copies
/// nothing.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<usize> {
    if !src.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        // strip_prefix can't fail: every entry lives below `src`
        let target = dst.join(entry.path().strip_prefix(src)?);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
