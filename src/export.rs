//! Dossier file export
//!
//! Writes a rendered dossier under its conventional file name. The file is
//! written to a `.tmp` sibling first and renamed into place.

use crate::dossier::{dossier_file_name, format_dossier};
use crate::error::AppError;
use crate::store::{Record, RecordId};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Render and write the dossier for a record into `dir`, returning its path
pub fn write_dossier(
    dir: &Path,
    record: &Record,
    id: RecordId,
    now: DateTime<Utc>,
) -> Result<PathBuf, AppError> {
    fs::create_dir_all(dir).map_err(|e| {
        AppError::ExportFailed(format!("Cannot create {}: {}", dir.display(), e))
    })?;

    let path = dir.join(dossier_file_name(record, id));
    let tmp_path = path.with_extension("txt.tmp");

    if let Err(e) = fs::write(&tmp_path, format_dossier(record, id, now))
        .and_then(|()| fs::rename(&tmp_path, &path))
    {
        let _ = fs::remove_file(&tmp_path);
        return Err(AppError::ExportFailed(format!(
            "Cannot write {}: {}",
            path.display(),
            e
        )));
    }

    info!("Exported dossier for record {} to {}", id, path.display());
    Ok(path)
}
