//! CSV export of the current user list.
//!
//! [`to_csv`] is the pure transform; [`export_to_dir`] adds the dated file
//! name and writes the payload to disk.
//!
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};

use crate::reconcile::UserList;

const HEADER: &str = "ID,Name,Email";

#[derive(Debug)]
pub enum ExportError {
    NothingToExport,
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::NothingToExport => write!(f, "No users to export"),
            ExportError::Io { path, source } => {
                write!(f, "could not write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io { source, .. } => Some(source),
            ExportError::NothingToExport => None,
        }
    }
}

/// Wrap a field in double quotes, doubling any embedded quote.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Render the list as CSV: header row, then `id,"name","email"` per user.
/// Rows are `\n`-separated with no trailing newline.
pub fn to_csv(users: &UserList) -> Result<String, ExportError> {
    if users.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    let mut lines = Vec::with_capacity(users.len() + 1);
    lines.push(HEADER.to_string());
    for u in users.as_slice() {
        lines.push(format!("{},{},{}", u.id, quote(&u.name), quote(&u.email)));
    }
    Ok(lines.join("\n"))
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("users_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Write the export for `date` into `dir`. Returns the written path.
pub fn export_on(users: &UserList, dir: &Path, date: NaiveDate) -> Result<PathBuf, ExportError> {
    let payload = to_csv(users)?;
    let path = dir.join(export_file_name(date));
    std::fs::write(&path, payload.as_bytes()).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = users.len(), "exported users");
    Ok(path)
}

/// Write the export into `dir`, named after today's UTC date.
pub fn export_to_dir(users: &UserList, dir: &Path) -> Result<PathBuf, ExportError> {
    export_on(users, dir, Utc::now().date_naive())
}
