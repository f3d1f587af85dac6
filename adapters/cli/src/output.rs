use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// File name used when writing a single environment.
pub(crate) const DEFAULT_FILE_NAME: &str = "env.txt";

/// Writes encoded environment text into `directory`, creating it if needed.
pub(crate) fn write_environment(
    directory: &Path,
    file_name: &str,
    text: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(directory)
        .with_context(|| format!("failed to create directory {}", directory.display()))?;

    let path = directory.join(file_name);
    fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// File name for the `index`-th environment of a batch.
pub(crate) fn batch_file_name(index: usize) -> String {
    format!("env_{index}.txt")
}
