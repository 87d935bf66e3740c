//! Export tool implementation
//!
//! Implements the `export(id, dir)` tool

use crate::export::write_dossier;
use crate::store::{RecordId, RecordStore};
use crate::error::AppError;
use crate::tools::show::lookup;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct ExportOutput {
    pub id: RecordId,
    pub path: PathBuf,
}

impl ExportOutput {
    pub fn to_text(&self) -> String {
        format!("Dossier written to {}", self.path.display())
    }
}

/// Execute export tool (shared implementation for session and CLI)
pub fn execute_export(
    store: &RecordStore,
    id: RecordId,
    dir: &Path,
    now: DateTime<Utc>,
) -> Result<ExportOutput, AppError> {
    let record = lookup(store, id)?;
    let path = write_dossier(dir, record, id, now)?;
    Ok(ExportOutput { id, path })
}
