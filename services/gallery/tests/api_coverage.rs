mod common;

use axum::http::StatusCode;
use common::{TestApp, read_json, test_app, test_app_with};
use gallery::model::GalleryDocument;
use gallery::store::json_file::JsonFileStore;
use gallery::store::memory::InMemoryStore;
use gallery::uploads::UploadLimits;
use http_helpers::{
    empty_request, file_part, json_request, multipart_request, photo, text_part,
};
use std::sync::Arc;
use tower::ServiceExt;

async fn create_album(t: &TestApp, name: &str) -> String {
    let req = json_request(
        "POST",
        "/api/albums",
        serde_json::json!({
            "name": name,
            "eventDate": "2024-01-10",
            "description": "Annual sports day"
        }),
    );
    let response = t.app.clone().oneshot(req).await.expect("album");
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await["id"]
        .as_str()
        .expect("id")
        .to_string()
}

async fn album_json(t: &TestApp, album_id: &str) -> serde_json::Value {
    let response = t
        .app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/albums/{album_id}")))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await
}

fn small_limits(max_files: usize, max_file_bytes: u64) -> UploadLimits {
    UploadLimits {
        max_files,
        max_file_bytes,
        ..UploadLimits::default()
    }
}

#[tokio::test]
async fn visitor_mutations_are_forbidden_and_store_unchanged() {
    let t = test_app(false);

    let req = json_request(
        "POST",
        "/api/albums",
        serde_json::json!({
            "name": "Sports Day",
            "eventDate": "2024-01-10",
            "description": "Annual sports day"
        }),
    );
    let response = t.app.clone().oneshot(req).await.expect("create");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(read_json(response).await["code"], "forbidden");

    // Forbidden wins over a malformed body.
    let req = json_request("POST", "/api/albums", serde_json::json!({}));
    let response = t.app.clone().oneshot(req).await.expect("create");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let upload = multipart_request("/api/albums/anything/photos", &[photo("a.png")]);
    let response = t.app.clone().oneshot(upload).await.expect("upload");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(t.uploaded_files().is_empty());

    let response = t
        .app
        .clone()
        .oneshot(empty_request("DELETE", "/api/photos/anything"))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_eq!(t.store.load().await.expect("load"), GalleryDocument::default());
}

#[tokio::test]
async fn missing_album_is_not_found() {
    let t = test_app(true);
    let response = t
        .app
        .clone()
        .oneshot(empty_request("GET", "/api/albums/does-not-exist"))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], "album not found");
}

#[tokio::test]
async fn create_album_validation_errors_are_bad_requests() {
    let t = test_app(true);

    let missing_date = json_request(
        "POST",
        "/api/albums",
        serde_json::json!({ "name": "Sports Day" }),
    );
    let response = t.app.clone().oneshot(missing_date).await.expect("create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "validation_error");

    let malformed = axum::http::Request::builder()
        .method("POST")
        .uri("/api/albums")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{ nope"))
        .expect("request");
    let response = t.app.clone().oneshot(malformed).await.expect("create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let blank = json_request(
        "POST",
        "/api/albums",
        serde_json::json!({ "name": "<p></p>", "eventDate": "2024-01-10", "description": "" }),
    );
    let response = t.app.clone().oneshot(blank).await.expect("create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(t.store.load().await.expect("load").albums.is_empty());
}

#[tokio::test]
async fn create_album_strips_markup() {
    let t = test_app(true);
    let req = json_request(
        "POST",
        "/api/albums",
        serde_json::json!({
            "name": "<script>alert(1)</script>Science Fair",
            "eventDate": "2024-03-01",
            "description": "Posters & <em>projects</em>"
        }),
    );
    let response = t.app.clone().oneshot(req).await.expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let album = read_json(response).await;
    assert_eq!(album["name"], "Science Fair");
    assert_eq!(album["description"], "Posters &amp; projects");
}

#[tokio::test]
async fn newest_album_is_listed_first() {
    let t = test_app(true);
    create_album(&t, "Older").await;
    let newer = create_album(&t, "Newer").await;

    let response = t
        .app
        .clone()
        .oneshot(empty_request("GET", "/api/albums"))
        .await
        .expect("list");
    let albums = read_json(response).await;
    assert_eq!(albums.as_array().expect("albums").len(), 2);
    assert_eq!(albums[0]["id"], newer.as_str());
    assert!(albums[0].get("photos").is_none());
}

#[tokio::test]
async fn upload_to_missing_album_leaves_nothing_behind() {
    let t = test_app(true);
    let upload = multipart_request(
        "/api/albums/does-not-exist/photos",
        &[photo("a.png"), photo("b.png")],
    );
    let response = t.app.clone().oneshot(upload).await.expect("upload");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(t.uploaded_files().is_empty());
    assert_eq!(t.store.load().await.expect("load"), GalleryDocument::default());
}

#[tokio::test]
async fn upload_rejects_invalid_type_and_removes_earlier_files() {
    let t = test_app(true);
    let album_id = create_album(&t, "Sports Day").await;
    let upload = multipart_request(
        &format!("/api/albums/{album_id}/photos"),
        &[
            photo("good.png"),
            file_part("photos", "notes.html", "text/html", b"<script></script>"),
        ],
    );
    let response = t.app.clone().oneshot(upload).await.expect("upload");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("invalid file type"));
    assert!(t.uploaded_files().is_empty());
    assert!(album_json(&t, &album_id).await["photos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn upload_enforces_count_and_size_limits() {
    let t = test_app_with(true, small_limits(2, 8), Arc::new(InMemoryStore::new()));
    let album_id = create_album(&t, "Sports Day").await;
    let uri = format!("/api/albums/{album_id}/photos");

    let too_many = multipart_request(
        &uri,
        &[
            file_part("photos", "1.png", "image/png", b"1"),
            file_part("photos", "2.png", "image/png", b"2"),
            file_part("photos", "3.png", "image/png", b"3"),
        ],
    );
    let response = t.app.clone().oneshot(too_many).await.expect("upload");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(t.uploaded_files().is_empty());

    let too_big = multipart_request(
        &uri,
        &[file_part("photos", "big.gif", "image/gif", b"123456789")],
    );
    let response = t.app.clone().oneshot(too_big).await.expect("upload");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(t.uploaded_files().is_empty());

    let at_limit = multipart_request(
        &uri,
        &[
            file_part("photos[]", "1.jpg", "image/jpeg", b"12345678"),
            file_part("photos[]", "2.jpg", "image/jpeg", b"1"),
        ],
    );
    let response = t.app.clone().oneshot(at_limit).await.expect("upload");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(t.uploaded_files().len(), 2);
}

#[tokio::test]
async fn upload_requires_files_in_the_photos_field() {
    let t = test_app(true);
    let album_id = create_album(&t, "Sports Day").await;
    let uri = format!("/api/albums/{album_id}/photos");

    let caption_only = multipart_request(&uri, &[text_part("caption", "Relay")]);
    let response = t.app.clone().oneshot(caption_only).await.expect("upload");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await["message"],
        "no files were uploaded"
    );

    let wrong_field = multipart_request(
        &uri,
        &[photo("a.png"), file_part("avatar", "b.png", "image/png", b"x")],
    );
    let response = t.app.clone().oneshot(wrong_field).await.expect("upload");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(t.uploaded_files().is_empty());

    let not_multipart = json_request("POST", &uri, serde_json::json!({}));
    let response = t.app.clone().oneshot(not_multipart).await.expect("upload");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_caption_is_sanitized_and_shared() {
    let t = test_app(true);
    let album_id = create_album(&t, "Sports Day").await;
    let upload = multipart_request(
        &format!("/api/albums/{album_id}/photos"),
        &[
            photo("a.png"),
            text_part("caption", "<b>Relay</b> race"),
            photo("b.png"),
        ],
    );
    let response = t.app.clone().oneshot(upload).await.expect("upload");
    assert_eq!(response.status(), StatusCode::CREATED);

    let album = album_json(&t, &album_id).await;
    let photos = album["photos"].as_array().expect("photos");
    assert_eq!(photos.len(), 2);
    assert!(photos.iter().all(|photo| photo["caption"] == "Relay race"));
}

#[tokio::test]
async fn later_uploads_come_first() {
    let t = test_app(true);
    let album_id = create_album(&t, "Sports Day").await;
    let uri = format!("/api/albums/{album_id}/photos");

    let first = multipart_request(&uri, &[photo("first.png")]);
    assert_eq!(
        t.app.clone().oneshot(first).await.expect("upload").status(),
        StatusCode::CREATED
    );
    let second = multipart_request(&uri, &[photo("second.png"), photo("third.png")]);
    assert_eq!(
        t.app.clone().oneshot(second).await.expect("upload").status(),
        StatusCode::CREATED
    );

    let album = album_json(&t, &album_id).await;
    let captions: Vec<&str> = album["photos"]
        .as_array()
        .expect("photos")
        .iter()
        .map(|photo| photo["caption"].as_str().unwrap())
        .collect();
    assert_eq!(captions, vec!["second.png", "third.png", "first.png"]);

    let response = t
        .app
        .clone()
        .oneshot(empty_request("GET", "/api/albums"))
        .await
        .expect("list");
    let albums = read_json(response).await;
    assert_eq!(albums[0]["coverImage"], album["photos"][0]["src"]);
}

#[tokio::test]
async fn deleting_unknown_photo_is_not_found() {
    let t = test_app(true);
    let album_id = create_album(&t, "Sports Day").await;
    let upload = multipart_request(&format!("/api/albums/{album_id}/photos"), &[photo("a.png")]);
    t.app.clone().oneshot(upload).await.expect("upload");
    let before = t.store.load().await.expect("load");

    let response = t
        .app
        .clone()
        .oneshot(empty_request("DELETE", "/api/photos/1704844800000"))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["message"], "photo not found");
    assert_eq!(t.store.load().await.expect("load"), before);
    assert_eq!(t.uploaded_files().len(), 1);
}

#[tokio::test]
async fn featured_photos_are_capped_and_newest_first() {
    let t = test_app(true);
    let older = create_album(&t, "Older").await;
    let newer = create_album(&t, "Newer").await;

    let batch = |names: &[&str]| names.iter().map(|name| photo(name)).collect::<Vec<_>>();
    let upload = multipart_request(
        &format!("/api/albums/{older}/photos"),
        &batch(&["o1.png", "o2.png", "o3.png"]),
    );
    t.app.clone().oneshot(upload).await.expect("upload");
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let upload = multipart_request(
        &format!("/api/albums/{newer}/photos"),
        &batch(&["n1.png", "n2.png", "n3.png", "n4.png"]),
    );
    t.app.clone().oneshot(upload).await.expect("upload");

    let response = t
        .app
        .clone()
        .oneshot(empty_request("GET", "/api/featured-photos"))
        .await
        .expect("featured");
    assert_eq!(response.status(), StatusCode::OK);
    let featured = read_json(response).await;
    let captions: Vec<&str> = featured
        .as_array()
        .expect("featured")
        .iter()
        .map(|photo| photo["caption"].as_str().unwrap())
        .collect();
    assert_eq!(captions, vec!["n1.png", "n2.png", "n3.png", "n4.png", "o1.png"]);
}

#[tokio::test]
async fn json_file_store_persists_across_restarts() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let data_file = tmp.path().join("gallery-data.json");

    let first = test_app_with(
        true,
        UploadLimits::default(),
        Arc::new(JsonFileStore::new(&data_file)),
    );
    let album_id = create_album(&first, "Sports Day").await;
    drop(first);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&data_file).expect("read")).expect("json");
    assert_eq!(raw["albums"][0]["eventDate"], "2024-01-10");

    let second = test_app_with(
        false,
        UploadLimits::default(),
        Arc::new(JsonFileStore::new(&data_file)),
    );
    let album = album_json(&second, &album_id).await;
    assert_eq!(album["name"], "Sports Day");
}

#[tokio::test]
async fn health_reports_unreadable_store() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let data_file = tmp.path().join("gallery-data.json");
    std::fs::write(&data_file, b"{ not json").expect("write");
    let t = test_app_with(
        false,
        UploadLimits::default(),
        Arc::new(JsonFileStore::new(&data_file)),
    );

    let response = t
        .app
        .clone()
        .oneshot(empty_request("GET", "/api/health"))
        .await
        .expect("health");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["code"], "internal");
    assert_eq!(body["message"], "storage unavailable");
}
