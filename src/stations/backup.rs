use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};

use crate::prelude::*;

/// `<stem>_backup_<YYYYmmdd_HHMMSS>.<ext>` next to the original file.
pub fn backup_path(path: &Path, now: NaiveDateTime) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let timestamp = now.format("%Y%m%d_%H%M%S");
    let file_name = match path.extension() {
        Some(extension) => format!("{stem}_backup_{timestamp}.{}", extension.to_string_lossy()),
        None => format!("{stem}_backup_{timestamp}"),
    };
    path.with_file_name(file_name)
}

/// Copy the existing file aside before it gets overwritten.
///
/// Returns the backup path, or [`None`] when there is nothing to back up.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn back_up(path: &Path) -> Result<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }
    let backup_path = backup_path(path, Local::now().naive_local());
    fs::copy(path, &backup_path)
        .with_context(|| format!("failed to back up `{}`", path.display()))?;
    info!(backup_path = %backup_path.display(), "backed up");
    Ok(Some(backup_path))
}
