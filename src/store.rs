use std::{
    ffi::OsString,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, TimeZone};
use serde_json::Value;

use crate::error::ApiResult;
use crate::models::Document;

pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `{path}.backup_{YYYYMMDD_HHMMSS}`
pub fn backup_path_for<Tz: TimeZone>(path: &Path, at: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".backup_{}", at.format(BACKUP_TIMESTAMP_FORMAT)));
    PathBuf::from(name)
}

/// Copy `path` to a timestamped sibling, keeping its modification time.
/// Returns `None` when there is nothing to back up.
pub fn backup(path: &Path) -> io::Result<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }

    let backup_path = backup_path_for(path, &chrono::Local::now());
    fs::copy(path, &backup_path)?;

    let modified = fs::metadata(path)?.modified()?;
    File::options().write(true).open(&backup_path)?.set_modified(modified)?;

    tracing::info!(source = %path.display(), backup = %backup_path.display(), "backup written");
    Ok(Some(backup_path))
}

/// Read and classify an on-disk document.
pub fn load_document(path: &Path) -> ApiResult<Document> {
    let text = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    Document::decode(value)
}

/// Two-space indented JSON, non-ASCII kept literal, newline terminated.
pub fn render(value: &Value) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

pub fn write_document(path: &Path, value: &Value) -> io::Result<()> {
    let text = render(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, text)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}
