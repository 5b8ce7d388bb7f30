//! Filesystem checks that stand in for any in-memory state across runs.
//!
//! Every check re-reads the directory. The tool assumes a single writer: two
//! runs against the same directories at the same time are not supported.
use std::{
    fs::DirBuilder,
    path::{Path, PathBuf},
};

use crate::error::EvalError;

fn read_dir(directory: &Path) -> Result<std::fs::ReadDir, EvalError> {
    std::fs::read_dir(directory).map_err(|source| EvalError::DirectoryRead {
        path: directory.to_owned(),
        source,
    })
}

/// Returns true if `directory` has an immediate entry named exactly `name`.
pub fn contains(name: &str, directory: &Path) -> Result<bool, EvalError> {
    for entry in read_dir(directory)? {
        let entry = entry.map_err(|source| EvalError::DirectoryRead {
            path: directory.to_owned(),
            source,
        })?;
        if entry.file_name() == name {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Plain files directly inside `directory` whose name ends with `suffix`, sorted by name.
pub fn files_with_suffix(directory: &Path, suffix: &str) -> Result<Vec<PathBuf>, EvalError> {
    let mut files = Vec::new();
    for entry in read_dir(directory)? {
        let entry = entry.map_err(|source| EvalError::DirectoryRead {
            path: directory.to_owned(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(suffix) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Create every missing directory, world read/write/executable (subject to umask).
pub fn ensure_directories(directories: &[&Path]) -> Result<(), EvalError> {
    for dir in directories {
        if dir.is_dir() {
            continue;
        }
        log::info!("Creating directory {}", dir.display());
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        std::os::unix::fs::DirBuilderExt::mode(&mut builder, 0o777);
        builder
            .create(dir)
            .map_err(|source| EvalError::DirectoryCreate {
                path: dir.to_path_buf(),
                source,
            })?;
    }
    Ok(())
}
