//! End-to-end tests for POST /api/delete-itinerary.

use std::fs;

use axum::http::StatusCode;
use serde_json::json;
use tempfile::TempDir;

mod common;

fn two_itineraries() -> serde_json::Value {
    json!({
        "version": "v1",
        "country": "FR",
        "itineraries": [{"id": "FR::a::x"}, {"id": "FR::a::y"}]
    })
}

#[tokio::test]
async fn test_delete_default_language() {
    let (tmp, dir) = common::root_with_country("FR");
    let fr = dir.join("FR.itins.modules-fr.json");
    let en = dir.join("FR.itins.modules-en.json");
    common::write_json(&fr, &two_itineraries());
    common::write_json(&en, &two_itineraries());
    let before = fs::read_to_string(&fr).unwrap();

    let resp = common::post_json(
        tmp.path(),
        "/api/delete-itinerary",
        json!({"itinId": "FR::a::x", "country": "FR"}),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], json!(true));
    assert_eq!(resp.body["deletedFrom"], json!(["FR"]));
    assert_eq!(resp.body["languages"], json!(["FR"]));
    assert!(resp.body.get("warnings").is_none());

    assert_eq!(common::read_json(&fr)["itineraries"], json!([{"id": "FR::a::y"}]));
    // Only French is touched by default.
    assert_eq!(common::read_json(&en), two_itineraries());

    let backups = common::backups_of(&fr);
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), before);
}

#[tokio::test]
async fn test_country_derived_from_id_and_folder_case() {
    let (tmp, dir) = common::root_with_country("fr");
    let fr = dir.join("fr.itins.modules-fr.json");
    common::write_json(&fr, &json!([{"itin_id": "fr::a::x"}, {"itin_id": "fr::a::y"}]));

    let resp = common::post_json(
        tmp.path(),
        "/api/delete-itinerary",
        json!({"itin_id": "fr::a::x"}),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(common::read_json(&fr), json!([{"itin_id": "fr::a::y"}]));
}

#[tokio::test]
async fn test_all_languages_collects_warnings() {
    let (tmp, dir) = common::root_with_country("FR");
    let fr = dir.join("FR.itins.modules-fr.json");
    let it = dir.join("FR.itins.modules-it.json");
    let en = dir.join("FR.itins.modules-en.json");
    common::write_json(&fr, &two_itineraries());
    common::write_json(&it, &two_itineraries());
    fs::write(&en, "not json").unwrap();

    let resp = common::post_json(
        tmp.path(),
        "/api/delete-itinerary",
        json!({"itinId": "FR::a::x", "allLanguages": true}),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["deletedFrom"], json!(["FR", "IT"]));
    let warnings = resp.body["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().starts_with("en: "));

    // The unreadable file is still backed up and left as is.
    assert_eq!(common::backups_of(&en).len(), 1);
    assert_eq!(fs::read_to_string(&en).unwrap(), "not json");
}

#[tokio::test]
async fn test_explicit_languages_win_over_all_languages() {
    let (tmp, dir) = common::root_with_country("FR");
    let fr = dir.join("FR.itins.modules-fr.json");
    let es = dir.join("FR.itins.modules-es.json");
    common::write_json(&fr, &two_itineraries());
    common::write_json(&es, &two_itineraries());

    let resp = common::post_json(
        tmp.path(),
        "/api/delete-itinerary",
        json!({"itinId": "FR::a::y", "allLanguages": true, "languages": ["ES"]}),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["deletedFrom"], json!(["ES"]));
    assert_eq!(common::read_json(&fr), two_itineraries());
    assert_eq!(common::read_json(&es)["itineraries"], json!([{"id": "FR::a::x"}]));
}

#[tokio::test]
async fn test_unknown_itinerary_is_not_found() {
    let (tmp, dir) = common::root_with_country("FR");
    let fr = dir.join("FR.itins.modules-fr.json");
    common::write_json(&fr, &two_itineraries());

    let resp = common::post_json(
        tmp.path(),
        "/api/delete-itinerary",
        json!({"itinId": "FR::a::zzz"}),
    )
    .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["success"], json!(false));
    assert!(resp.body["error"].as_str().unwrap().contains("FR::a::zzz"));
    assert_eq!(common::read_json(&fr), two_itineraries());
}

#[tokio::test]
async fn test_not_found_reports_language_errors() {
    let (tmp, dir) = common::root_with_country("FR");
    fs::write(dir.join("FR.itins.modules-fr.json"), "[").unwrap();

    let resp = common::post_json(
        tmp.path(),
        "/api/delete-itinerary",
        json!({"itinId": "FR::a::x"}),
    )
    .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    let errors = resp.body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().starts_with("fr: Invalid JSON"));
}

#[tokio::test]
async fn test_missing_country_folder() {
    let tmp = TempDir::new().unwrap();

    let resp = common::post_json(
        tmp.path(),
        "/api/delete-itinerary",
        json!({"itinId": "IT::a::x"}),
    )
    .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["error"], json!("Country folder not found: IT"));
}

#[tokio::test]
async fn test_bad_requests() {
    let tmp = TempDir::new().unwrap();

    let resp = common::post_json(tmp.path(), "/api/delete-itinerary", json!({"country": "FR"})).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], json!("Missing itinId"));

    let resp = common::post_json(tmp.path(), "/api/delete-itinerary", json!({"itinId": "::a::x"})).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], json!("Missing country code"));
}

#[tokio::test]
async fn test_non_list_languages_falls_back_to_all_languages() {
    let (tmp, dir) = common::root_with_country("FR");
    let fr = dir.join("FR.itins.modules-fr.json");
    let pt = dir.join("FR.itins.modules-pt.json");
    common::write_json(&fr, &two_itineraries());
    common::write_json(&pt, &two_itineraries());

    let resp = common::post_json(
        tmp.path(),
        "/api/delete-itinerary",
        json!({"itinId": "FR::a::x", "languages": "fr", "allLanguages": true}),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["deletedFrom"], json!(["FR", "PT"]));
}
