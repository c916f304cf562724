// --------------------------------------------------
// Handles the two mutating API endpoints over the
// itinerary files.
//
// Responsibilities:
// - Save (insert or update) one itinerary into its file
// - Delete one itinerary from one or more language files
//
// Every write is preceded by a backup of the file it replaces.
// -------------------------------------------------

use std::path::{Path, PathBuf};

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;

use crate::encoding;
use crate::error::{ApiError, ApiResult};
use crate::logic::{self, MergeAction};
use crate::models::{id_label, record_id, steps_count, DeleteRequest, DeleteResponse, SaveRequest, SaveResponse};
use crate::resolver;
use crate::server::AppState;
use crate::store;

// -----------------------------
// POST /api/save-itinerary
// Writes one itinerary into its country file
// -----------------------------
pub async fn save_itinerary(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<SaveResponse>> {
    let req: SaveRequest = serde_json::from_slice(&body)?;
    let root = state.config.root();

    let (Some(requested_path), Some(data)) = (req.path, req.data) else {
        return Err(ApiError::InvalidInput("Missing path or data".to_string()));
    };
    let incoming = match data {
        Value::Object(map) if !map.is_empty() => map,
        Value::Object(_) | Value::Null => {
            return Err(ApiError::InvalidInput("Missing path or data".to_string()));
        }
        _ => return Err(ApiError::InvalidInput("data must be an object".to_string())),
    };
    if requested_path.is_empty() {
        return Err(ApiError::InvalidInput("Missing path or data".to_string()));
    }

    resolver::validate_request_path(&requested_path)?;
    let country_code = req.country.unwrap_or_default().to_uppercase();

    let relative_path = match resolver::resolve(root, &requested_path, &country_code)? {
        Some(found) => {
            tracing::info!(path = %found.display(), "existing file found");
            found
        }
        None => {
            tracing::info!(path = %requested_path, "new file will be created");
            PathBuf::from(&requested_path)
        }
    };
    let file_path = root.join(&relative_path);

    // Backup before parsing so a corrupt file is still kept.
    let backup_path = store::backup(&file_path)?;
    let existing = if file_path.is_file() {
        Some(store::load_document(&file_path)?)
    } else {
        None
    };

    let steps = steps_count(&incoming);
    let itin_id = record_id(&incoming).map(id_label);

    let outcome = logic::merge(existing, incoming);
    match outcome.action {
        MergeAction::Created => tracing::info!(id = ?itin_id, "new wrapped document created"),
        MergeAction::Updated => tracing::info!(id = ?itin_id, index = ?outcome.index, "itinerary updated"),
        MergeAction::Appended => tracing::info!(id = ?itin_id, index = ?outcome.index, "itinerary appended"),
        MergeAction::MergedObject => tracing::info!(id = ?itin_id, "object document merged"),
    }

    let total_itineraries = outcome.document.total_itineraries();
    let final_value = encoding::normalize(outcome.document.encode());
    tracing::debug!("encoding repair applied");

    store::write_document(&file_path, &final_value)?;
    tracing::info!(
        path = %relative_path.display(),
        steps,
        total_itineraries,
        "itinerary saved"
    );

    let label = itin_id.unwrap_or_default();
    Ok(Json(SaveResponse {
        success: true,
        message: format!("Saved: {label} ({steps} days)"),
        path: display_path(&relative_path),
        backup: backup_path.map(|p| display_path(p.strip_prefix(root).unwrap_or(&p))),
        steps_count: steps,
        total_itineraries,
        updated_index: outcome.index,
    }))
}

// -----------------------------
// POST /api/delete-itinerary
// Removes one itinerary from each requested language file
// -----------------------------
pub async fn delete_itinerary(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<DeleteResponse>> {
    let req: DeleteRequest = serde_json::from_slice(&body)?;
    let root = state.config.root();

    let Some(itin_id) = req.id().map(str::to_string) else {
        return Err(ApiError::InvalidInput("Missing itinId".to_string()));
    };

    let country_code = match req.country.as_deref().map(str::to_uppercase) {
        Some(code) if !code.is_empty() => code,
        _ => logic::country_from_id(&itin_id)
            .ok_or_else(|| ApiError::InvalidInput("Missing country code".to_string()))?,
    };

    let Some(folder) = resolver::find_country_dir(root, &country_code)? else {
        return Err(ApiError::NotFound(format!("Country folder not found: {country_code}")));
    };

    let explicit = req.explicit_languages();
    let languages = logic::resolve_languages(explicit.as_deref(), req.all_languages());
    tracing::info!(id = %itin_id, country = %country_code, ?languages, "deleting itinerary");

    let mut deleted_from = Vec::new();
    let mut errors = Vec::new();

    for lang in &languages {
        let Some(relative_path) = resolver::find_language_file(root, &folder, &country_code, lang)? else {
            continue;
        };
        let file_path = root.join(&relative_path);

        match delete_from_file(&file_path, &itin_id) {
            Ok(true) => {
                tracing::info!(path = %relative_path.display(), "itinerary removed");
                deleted_from.push(lang.to_uppercase());
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(lang = %lang, error = %e, "delete failed for language");
                errors.push(format!("{lang}: {e}"));
            }
        }
    }

    if deleted_from.is_empty() {
        return Err(ApiError::ItineraryNotFound { id: itin_id, errors });
    }

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Itinerary '{itin_id}' deleted"),
        languages: deleted_from.clone(),
        deleted_from,
        warnings: errors,
    }))
}

fn delete_from_file(path: &Path, itin_id: &str) -> ApiResult<bool> {
    store::backup(path)?;
    let mut document = store::load_document(path)?;
    if !logic::remove(&mut document, itin_id) {
        return Ok(false);
    }
    store::write_document(path, &document.encode())?;
    Ok(true)
}

// Paths are reported in the same slash-separated form clients send.
fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
