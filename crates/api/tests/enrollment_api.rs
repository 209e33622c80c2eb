//! HTTP-level integration tests for `/api/inscriptions`.
//!
//! Covers the enrollment preconditions: duplicate enrollments, course
//! capacity, inactive trainees and missing references.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use sqlx::PgPool;

/// Enroll via `POST /api/inscriptions`, returning the raw response.
async fn enroll(pool: &PgPool, trainee_id: i64, course_id: i64) -> axum::response::Response {
    post_json(
        common::build_test_app(pool.clone()),
        "/api/inscriptions",
        serde_json::json!({"trainee_id": trainee_id, "course_id": course_id}),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_then_get_enrollment(pool: PgPool) {
    let trainer_id = common::create_trainer(&pool, "Hopper").await;
    let course_id = common::create_course(&pool, trainer_id, "COBOL 101", 3).await;
    let trainee_id = common::create_trainee(&pool, "ada@campus.test").await;

    let response = enroll(&pool, trainee_id, course_id).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["status"], "enrolled");
    assert_eq!(created["payment_status"], "unpaid");

    let response = get(common::build_test_app(pool), &format!("/api/inscriptions/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["trainee_name"], "Ada Lovelace");
    assert_eq!(json["trainee_email"], "ada@campus.test");
    assert_eq!(json["course_title"], "COBOL 101");
    assert_eq!(json["course_start_date"], "2025-03-03");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_enrollment_is_rejected(pool: PgPool) {
    let trainer_id = common::create_trainer(&pool, "Hopper").await;
    let course_id = common::create_course(&pool, trainer_id, "COBOL 101", 3).await;
    let trainee_id = common::create_trainee(&pool, "ada@campus.test").await;

    assert_eq!(enroll(&pool, trainee_id, course_id).await.status(), StatusCode::CREATED);

    let response = enroll(&pool, trainee_id, course_id).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Trainee is already enrolled in this course");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_enrollment_beyond_capacity_is_rejected(pool: PgPool) {
    let trainer_id = common::create_trainer(&pool, "Hopper").await;
    let course_id = common::create_course(&pool, trainer_id, "Tiny seminar", 1).await;
    let first = common::create_trainee(&pool, "first@campus.test").await;
    let second = common::create_trainee(&pool, "second@campus.test").await;

    assert_eq!(enroll(&pool, first, course_id).await.status(), StatusCode::CREATED);

    let response = enroll(&pool, second, course_id).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert!(json["error"].as_str().unwrap().contains("full"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancelled_enrollment_frees_its_seat(pool: PgPool) {
    let trainer_id = common::create_trainer(&pool, "Hopper").await;
    let course_id = common::create_course(&pool, trainer_id, "Tiny seminar", 1).await;
    let first = common::create_trainee(&pool, "first@campus.test").await;
    let second = common::create_trainee(&pool, "second@campus.test").await;

    let response = enroll(&pool, first, course_id).await;
    let first_enrollment = body_json(response).await["id"].as_i64().unwrap();

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/inscriptions/{first_enrollment}"),
        serde_json::json!({"status": "cancelled"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "cancelled");

    assert_eq!(enroll(&pool, second, course_id).await.status(), StatusCode::CREATED);

    // Reactivating the cancelled enrollment now needs a seat that is taken.
    let response = put_json(
        common::build_test_app(pool),
        &format!("/api/inscriptions/{first_enrollment}"),
        serde_json::json!({"status": "enrolled"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inactive_trainee_cannot_enroll(pool: PgPool) {
    let trainer_id = common::create_trainer(&pool, "Hopper").await;
    let course_id = common::create_course(&pool, trainer_id, "COBOL 101", 3).await;
    let trainee_id = common::create_trainee(&pool, "ada@campus.test").await;
    delete(
        common::build_test_app(pool.clone()),
        &format!("/api/apprenants/{trainee_id}"),
    )
    .await;

    let response = enroll(&pool, trainee_id, course_id).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inactive_trainee_cannot_be_re_enrolled(pool: PgPool) {
    let trainer_id = common::create_trainer(&pool, "Hopper").await;
    let course_id = common::create_course(&pool, trainer_id, "COBOL 101", 3).await;
    let trainee_id = common::create_trainee(&pool, "ada@campus.test").await;

    let response = enroll(&pool, trainee_id, course_id).await;
    let enrollment_id = body_json(response).await["id"].as_i64().unwrap();
    let uri = format!("/api/inscriptions/{enrollment_id}");

    let response = put_json(
        common::build_test_app(pool.clone()),
        &uri,
        serde_json::json!({"status": "cancelled"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/apprenants/{trainee_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        common::build_test_app(pool.clone()),
        &uri,
        serde_json::json!({"status": "enrolled"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let response = get(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(body_json(response).await["status"], "cancelled");

    // Payment changes on the cancelled record are still allowed.
    let response = put_json(
        common::build_test_app(pool),
        &uri,
        serde_json::json!({"payment_status": "paid"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_input_gets_json_errors(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/inscriptions",
        serde_json::json!({"trainee_id": "abc", "course_id": 1}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("trainee_id"));

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/inscriptions?course_id=abc",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = get(common::build_test_app(pool), "/api/inscriptions/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_references_are_field_errors(pool: PgPool) {
    let response = enroll(&pool, 424_242, 515_151).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["trainee_id", "course_id"]);

    let response = post_json(
        common::build_test_app(pool),
        "/api/inscriptions",
        serde_json::json!({"payment_status": "refunded"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_payment_and_filter_list(pool: PgPool) {
    let trainer_id = common::create_trainer(&pool, "Hopper").await;
    let course_id = common::create_course(&pool, trainer_id, "COBOL 101", 5).await;
    let ada = common::create_trainee(&pool, "ada@campus.test").await;
    let alan = common::create_trainee(&pool, "alan@campus.test").await;
    let response = enroll(&pool, ada, course_id).await;
    let ada_enrollment = body_json(response).await["id"].as_i64().unwrap();
    enroll(&pool, alan, course_id).await;

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/inscriptions/{ada_enrollment}"),
        serde_json::json!({"payment_status": "paid", "status": "in_progress"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["payment_status"], "paid");
    assert_eq!(json["status"], "in_progress");

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/inscriptions?payment_status=paid",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["trainee_id"], ada);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/inscriptions/formation/{course_id}"),
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/inscriptions/apprenant/{alan}"),
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = get(common::build_test_app(pool.clone()), "/api/inscriptions/stats/summary").await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);

    let response = put_json(
        common::build_test_app(pool),
        &format!("/api/inscriptions/{ada_enrollment}"),
        serde_json::json!({"status": "graduated"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_enrollment(pool: PgPool) {
    let trainer_id = common::create_trainer(&pool, "Hopper").await;
    let course_id = common::create_course(&pool, trainer_id, "COBOL 101", 3).await;
    let trainee_id = common::create_trainee(&pool, "ada@campus.test").await;
    let response = enroll(&pool, trainee_id, course_id).await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = delete(common::build_test_app(pool.clone()), &format!("/api/inscriptions/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(pool.clone()), &format!("/api/inscriptions/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The seat is free again.
    assert_eq!(enroll(&pool, trainee_id, course_id).await.status(), StatusCode::CREATED);
}
