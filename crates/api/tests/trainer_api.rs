//! HTTP-level integration tests for `/api/formateurs`.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_multipart, put_multipart, FilePart};
use sqlx::PgPool;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_then_get_trainer(pool: PgPool) {
    let response = post_multipart(
        common::build_test_app(pool.clone()),
        "/api/formateurs",
        &[
            ("first_name", " Grace "),
            ("last_name", "Hopper"),
            ("specialty", "Compilers"),
            ("email", "Grace.Hopper@Campus.test"),
            ("phone", "+1 (555) 010-0199"),
            ("bio", "Invented the first compiler."),
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["first_name"], "Grace");
    assert_eq!(created["email"], "grace.hopper@campus.test");
    assert!(created["photo"].is_null());

    let response = get(common::build_test_app(pool), &format!("/api/formateurs/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched, created);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_trainer_reports_every_invalid_field(pool: PgPool) {
    let response = post_multipart(
        common::build_test_app(pool),
        "/api/formateurs",
        &[
            ("first_name", "Grace"),
            ("email", "not-an-email"),
            ("phone", "call me"),
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["last_name", "specialty", "email", "phone"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_photo_upload_is_stored_and_served(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let photo = FilePart {
        field: "photo",
        file_name: "portrait.PNG",
        content_type: "image/png",
        data: PNG_BYTES,
    };

    let response = post_multipart(
        common::build_test_app_with_uploads(pool.clone(), uploads.path()),
        "/api/formateurs",
        &[
            ("first_name", "Margaret"),
            ("last_name", "Hamilton"),
            ("specialty", "Flight software"),
            ("email", "hamilton@campus.test"),
            ("phone", "0612345678"),
        ],
        Some(&photo),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let stored = json["photo"].as_str().unwrap().to_string();
    assert!(stored.ends_with(".png"));
    assert_eq!(std::fs::read(uploads.path().join(&stored)).unwrap(), PNG_BYTES);

    let response = get(
        common::build_test_app_with_uploads(pool, uploads.path()),
        &format!("/uploads/{stored}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rejected_photo_type_stores_nothing(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let gif = FilePart {
        field: "photo",
        file_name: "anim.gif",
        content_type: "image/gif",
        data: b"GIF89a",
    };

    let response = post_multipart(
        common::build_test_app_with_uploads(pool, uploads.path()),
        "/api/formateurs",
        &[
            ("first_name", "Margaret"),
            ("last_name", "Hamilton"),
            ("specialty", "Flight software"),
            ("email", "hamilton@campus.test"),
            ("phone", "0612345678"),
        ],
        Some(&gif),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "photo");
    assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_oversized_photos_get_json_errors(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let max = common::test_config(uploads.path()).max_upload_bytes;
    let fields = [
        ("first_name", "Margaret"),
        ("last_name", "Hamilton"),
        ("specialty", "Flight software"),
        ("email", "hamilton@campus.test"),
        ("phone", "0612345678"),
    ];

    // Over the photo cap but inside the request limit: a field error.
    let data = vec![0u8; max + 1];
    let photo = FilePart {
        field: "photo",
        file_name: "big.png",
        content_type: "image/png",
        data: &data,
    };
    let response = post_multipart(
        common::build_test_app_with_uploads(pool.clone(), uploads.path()),
        "/api/formateurs",
        &fields,
        Some(&photo),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["fields"][0]["field"], "photo");

    // Past the request limit: the body is cut off.
    let data = vec![0u8; 3 * max];
    let photo = FilePart {
        data: &data,
        ..photo
    };
    let response = post_multipart(
        common::build_test_app_with_uploads(pool, uploads.path()),
        "/api/formateurs",
        &fields,
        Some(&photo),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_multipart_body_is_a_json_error(pool: PgPool) {
    let response = common::post_json(
        common::build_test_app(pool),
        "/api/formateurs",
        serde_json::json!({"first_name": "Margaret"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replacing_photo_removes_previous_file(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let id = common::create_trainer(&pool, "Hopper").await;
    let photo = FilePart {
        field: "photo",
        file_name: "a.jpg",
        content_type: "image/jpeg",
        data: b"first",
    };

    let response = put_multipart(
        common::build_test_app_with_uploads(pool.clone(), uploads.path()),
        &format!("/api/formateurs/{id}"),
        &[],
        Some(&photo),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await["photo"].as_str().unwrap().to_string();

    let photo = FilePart {
        data: b"second",
        ..photo
    };
    let response = put_multipart(
        common::build_test_app_with_uploads(pool, uploads.path()),
        &format!("/api/formateurs/{id}"),
        &[("specialty", "COBOL")],
        Some(&photo),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let second = json["photo"].as_str().unwrap();
    assert_eq!(json["specialty"], "COBOL");
    assert_eq!(json["last_name"], "Hopper");

    assert_ne!(first, second);
    assert!(!uploads.path().join(&first).exists());
    assert!(uploads.path().join(second).exists());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_trainers_with_search(pool: PgPool) {
    common::create_trainer(&pool, "Hopper").await;
    common::create_trainer(&pool, "Liskov").await;
    common::create_trainer(&pool, "Knuth").await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/formateurs?search=LIS",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["last_name"], "Liskov");

    let response = get(
        common::build_test_app(pool),
        "/api/formateurs?limit=2&offset=2",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["limit"], 2);
    assert_eq!(json["offset"], 2);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_trainer_with_courses_conflicts(pool: PgPool) {
    let trainer_id = common::create_trainer(&pool, "Hopper").await;
    common::create_course(&pool, trainer_id, "COBOL 101", 10).await;

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/formateurs/{trainer_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/formateurs/{trainer_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_trainer(pool: PgPool) {
    let id = common::create_trainer(&pool, "Knuth").await;

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/formateurs/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(pool.clone()), &format!("/api/formateurs/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(common::build_test_app(pool), &format!("/api/formateurs/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
