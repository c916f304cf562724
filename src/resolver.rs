// --------------------------------------------------
// Locates itinerary files on disk.
//
// Country folders and file names are matched without regard
// to case ("FR", "fr", "Fr" are the same country). All lookups
// are read-only directory listings.
//
// Paths handed back are relative to the server root, in the
// same form clients send them ("data/...").
// -------------------------------------------------

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

use crate::config::COUNTRIES_DIR;
use crate::error::{ApiError, ApiResult};

/// Prefix every writable path must start with.
pub const ALLOWED_PREFIX: &str = "data/";

static LANG_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-([a-z]{2})\.json$").expect("valid language suffix regex"));

/// Reject request paths outside `data/` or containing `..`.
pub fn validate_request_path(path: &str) -> ApiResult<()> {
    if !path.starts_with(ALLOWED_PREFIX) || path.contains("..") {
        return Err(ApiError::Forbidden("Invalid path".to_string()));
    }
    Ok(())
}

/// Language code carried by a file name such as `FR.itins.modules-en.json`.
pub fn language_suffix(file_name: &str) -> Option<String> {
    LANG_SUFFIX
        .captures(file_name)
        .map(|caps| caps[1].to_ascii_lowercase())
}

/// File name of the per-language country file.
pub fn language_file_name(country_code: &str, lang: &str) -> String {
    format!("{country_code}.itins.modules-{lang}.json")
}

/// Name of the folder under the countries directory whose name equals
/// `country_code` ignoring case. `None` when the countries directory
/// itself is missing.
pub fn find_country_dir(root: &Path, country_code: &str) -> io::Result<Option<String>> {
    let countries_dir = root.join(COUNTRIES_DIR);
    if !countries_dir.is_dir() {
        return Ok(None);
    }

    let wanted = country_code.to_uppercase();
    let found = sorted_entries(&countries_dir, EntryKind::Dir)?
        .into_iter()
        .find(|name| name.to_uppercase() == wanted);
    Ok(found)
}

/// Find the existing on-disk file a save request targets.
///
/// Only the language suffix of `requested_path` is used; the file itself
/// is looked up by country code inside the country folder. Returns `None`
/// when nothing matches, in which case the caller writes to the literal
/// requested path.
pub fn resolve(root: &Path, requested_path: &str, country_code: &str) -> io::Result<Option<PathBuf>> {
    let Some(folder) = find_country_dir(root, country_code)? else {
        return Ok(None);
    };

    let requested_name = Path::new(requested_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let candidates = match language_suffix(requested_name) {
        Some(lang) => vec![language_file_name(country_code, &lang)],
        // Files written before per-language splits.
        None => vec![
            format!("{country_code}.itins.modules.json"),
            format!("{country_code}_itins_modules.json"),
        ],
    };

    find_in_country_dir(root, &folder, &candidates)
}

/// Per-language country file inside an already located country folder.
pub fn find_language_file(
    root: &Path,
    folder: &str,
    country_code: &str,
    lang: &str,
) -> io::Result<Option<PathBuf>> {
    find_in_country_dir(root, folder, &[language_file_name(country_code, lang)])
}

fn find_in_country_dir(root: &Path, folder: &str, candidates: &[String]) -> io::Result<Option<PathBuf>> {
    let relative_dir = Path::new(COUNTRIES_DIR).join(folder);
    let candidates: Vec<String> = candidates.iter().map(|c| c.to_lowercase()).collect();

    let found = sorted_entries(&root.join(&relative_dir), EntryKind::File)?
        .into_iter()
        .find(|name| candidates.contains(&name.to_lowercase()));

    Ok(found.map(|name| relative_dir.join(name)))
}

#[derive(Clone, Copy)]
enum EntryKind {
    Dir,
    File,
}

// Entry names of one kind, sorted so lookups are deterministic.
// Names that are not valid UTF-8 cannot match a country code and are skipped.
fn sorted_entries(dir: &Path, kind: EntryKind) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let wanted = match kind {
            EntryKind::Dir => file_type.is_dir(),
            EntryKind::File => file_type.is_file(),
        };
        if !wanted {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
