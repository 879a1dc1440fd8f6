//! HTTP-level integration tests for the `/workflows` endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_approved_workflow, create_workflow, delete, get, post_json,
    put_json, valid_workflow_body,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_workflow_returns_201_with_default_steps(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/workflows",
        valid_workflow_body("Tracker"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["name"], "Tracker");
    assert_eq!(data["status"], "DRAFT");
    assert_eq!(data["category"], "TELEMATICS");
    assert!(data["approved_by"].is_null());

    let steps = data["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 5);
    assert_eq!(steps[0]["step_type"], "VALIDATION");
    assert_eq!(steps[2]["step_name"], "Code Generation");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_workflow_with_custom_steps(pool: PgPool) {
    let mut body = valid_workflow_body("Custom");
    body["steps"] = json!([
        { "step_order": 2, "step_name": "Gen", "step_type": "CODE_GENERATION" },
        { "step_order": 1, "step_name": "Check", "step_type": "VALIDATION" },
    ]);

    let response = post_json(build_test_app(pool), "/api/v1/workflows", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["step_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Check", "Gen"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_duplicate_name_returns_409(pool: PgPool) {
    create_workflow(&pool, valid_workflow_body("Twice")).await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/workflows",
        valid_workflow_body("Twice"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_blank_name_and_bad_step_orders(pool: PgPool) {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/workflows",
        valid_workflow_body("   "),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let mut body = valid_workflow_body("Dup Orders");
    body["steps"] = json!([
        { "step_order": 1, "step_name": "A", "step_type": "VALIDATION" },
        { "step_order": 1, "step_name": "B", "step_type": "TESTING" },
    ]);
    let response = post_json(build_test_app(pool), "/api/v1/workflows", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Duplicate step order 1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_unknown_category_is_rejected(pool: PgPool) {
    let mut body = valid_workflow_body("Bad Category");
    body["category"] = json!("SPACESHIP");

    let response = post_json(build_test_app(pool), "/api/v1/workflows", body).await;

    assert!(response.status().is_client_error());
}

// ---------------------------------------------------------------------------
// Read, update, delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_workflow_includes_steps(pool: PgPool) {
    let id = create_workflow(&pool, valid_workflow_body("Fetch")).await;

    let response = get(build_test_app(pool), &format!("/api/v1/workflows/{id}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);
    assert_eq!(json["data"]["steps"].as_array().unwrap().len(), 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_nonexistent_workflow_returns_404(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/workflows/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Workflow with id 999999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_workflow_keeps_status(pool: PgPool) {
    let id = create_workflow(&pool, valid_workflow_body("Editable")).await;

    let response = put_json(
        build_test_app(pool),
        &format!("/api/v1/workflows/{id}"),
        json!({ "description": "Updated", "dependencies": ["DataLogger", "GpsModule"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["description"], "Updated");
    assert_eq!(json["data"]["name"], "Editable");
    assert_eq!(json["data"]["dependencies"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["status_id"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_nonexistent_workflow_returns_404(pool: PgPool) {
    let response = put_json(
        build_test_app(pool),
        "/api/v1/workflows/999999",
        json!({ "description": "nope" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_workflow_returns_204(pool: PgPool) {
    let id = create_workflow(&pool, valid_workflow_body("Delete Me")).await;

    let response = delete(build_test_app(pool.clone()), &format!("/api/v1/workflows/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(pool.clone()), &format!("/api/v1/workflows/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(build_test_app(pool), &format!("/api/v1/workflows/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Listing and reporting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_status_and_category(pool: PgPool) {
    let first = create_workflow(&pool, valid_workflow_body("First")).await;
    create_workflow(&pool, valid_workflow_body("Second")).await;

    let mut diagnostic = valid_workflow_body("Third");
    diagnostic["category"] = json!("DIAGNOSTIC");
    create_workflow(&pool, diagnostic).await;

    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/workflows/{first}/submit"),
        json!({}),
    )
    .await;

    let json = body_json(get(build_test_app(pool.clone()), "/api/v1/workflows").await).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);

    let json = body_json(
        get(build_test_app(pool.clone()), "/api/v1/workflows?category=TELEMATICS").await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json = body_json(
        get(build_test_app(pool.clone()), "/api/v1/workflows/status/pending_approval").await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], first);

    let json = body_json(
        get(build_test_app(pool.clone()), "/api/v1/workflows/pending-approval").await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let json = body_json(
        get(build_test_app(pool.clone()), "/api/v1/workflows/category/DIAGNOSTIC").await,
    )
    .await;
    assert_eq!(json["data"][0]["name"], "Third");

    let json = body_json(get(build_test_app(pool), "/api/v1/workflows?limit=1&offset=1").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["name"], "Second");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_unknown_status_returns_400(pool: PgPool) {
    let response = get(build_test_app(pool.clone()), "/api/v1/workflows/status/ARCHIVED").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(build_test_app(pool), "/api/v1/workflows?category=SPACESHIP").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_statistics_count_every_status(pool: PgPool) {
    let id = create_workflow(&pool, valid_workflow_body("Counted")).await;
    create_workflow(&pool, valid_workflow_body("Also Counted")).await;
    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/workflows/{id}/reject"),
        json!({}),
    )
    .await;

    let json = body_json(get(build_test_app(pool), "/api/v1/workflows/statistics").await).await;

    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["by_status"]["DRAFT"], 1);
    assert_eq!(json["data"]["by_status"]["REJECTED"], 1);
    assert_eq!(json["data"]["by_status"]["COMPLETED"], 0);
    assert_eq!(json["data"]["by_status"].as_object().unwrap().len(), 7);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_summary_counts_steps(pool: PgPool) {
    let id = create_approved_workflow(&pool, valid_workflow_body("Summary")).await;
    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/workflows/{id}/execute"),
        json!({}),
    )
    .await;

    let response = get(build_test_app(pool), &format!("/api/v1/workflows/{id}/status")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "COMPLETED");
    assert_eq!(json["data"]["approved_by"], "bob");
    assert_eq!(json["data"]["total_steps"], 5);
    assert_eq!(json["data"]["completed_steps"], 5);
    assert_eq!(json["data"]["failed_steps"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_validate_reports_all_violations(pool: PgPool) {
    let mut body = valid_workflow_body("Unsafe");
    body["category"] = json!("SAFETY_SYSTEM");
    body["component_name"] = json!("brakeAssist");
    body["dependencies"] = json!(["SensorModule"]);
    body["validation_rules"] = json!(["  "]);
    let id = create_workflow(&pool, body).await;

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/workflows/{id}/validate"),
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], false);
    assert_eq!(
        json["data"]["violations"],
        json!([
            "Invalid component name. Must be PascalCase and start with a letter.",
            "Safety system requires dependency: AlertSystem",
            "Empty validation rule found",
        ])
    );

    // Dry run: nothing changed.
    let json = body_json(get(build_test_app(pool), &format!("/api/v1/workflows/{id}")).await).await;
    assert_eq!(json["data"]["status"], "DRAFT");
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_approve_execute_happy_path(pool: PgPool) {
    let id = create_workflow(&pool, valid_workflow_body("Lifecycle")).await;

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/workflows/{id}/submit"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/workflows/{id}/approve"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["approved_by"], "system");
    assert!(json["data"]["approved_at"].is_string());

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/workflows/{id}/execute"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["success"], true);
    assert_eq!(json["data"]["message"], "Workflow executed successfully");
    assert!(json["data"]["error"].is_null());
    assert_eq!(json["data"]["workflow_id"], id);

    let json = body_json(
        get(build_test_app(pool), &format!("/api/v1/components/workflow/{id}")).await,
    )
    .await;
    assert_eq!(json["data"][0]["name"], "GpsTracker");
    assert_eq!(json["data"][0]["selector"], "app-gps-tracker");
    assert_eq!(json["data"][0]["created_by"], "alice");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_draft_returns_409(pool: PgPool) {
    let id = create_workflow(&pool, valid_workflow_body("Too Early")).await;

    let response = post_json(
        build_test_app(pool),
        &format!("/api/v1/workflows/{id}/approve"),
        json!({ "approved_by": "bob" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ILLEGAL_STATE");
    assert_eq!(
        json["error"],
        "Workflow must be pending approval to approve (current status: DRAFT)"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_unapproved_returns_409_and_keeps_status(pool: PgPool) {
    let id = create_workflow(&pool, valid_workflow_body("Not Approved")).await;

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/workflows/{id}/execute"),
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(get(build_test_app(pool), &format!("/api/v1/workflows/{id}")).await).await;
    assert_eq!(json["data"]["status"], "DRAFT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_unknown_workflow_returns_404(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/workflows/999999/execute",
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_uses_defaults_and_works_from_any_state(pool: PgPool) {
    let id = create_approved_workflow(&pool, valid_workflow_body("Rejected Late")).await;

    let response = post_json(
        build_test_app(pool),
        &format!("/api/v1/workflows/{id}/reject"),
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status_id"], 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_with_failing_validation_reports_failure(pool: PgPool) {
    let mut body = valid_workflow_body("Diag");
    body["category"] = json!("DIAGNOSTIC");
    body["component_name"] = json!("DtcReader");
    body["dependencies"] = json!([]);
    let id = create_approved_workflow(&pool, body).await;

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/workflows/{id}/execute"),
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["success"], false);
    assert_eq!(
        json["data"]["message"],
        "Workflow execution failed: Step execution failed: Validation"
    );
    assert_eq!(json["data"]["error"], json["data"]["message"]);

    let json = body_json(get(build_test_app(pool), &format!("/api/v1/workflows/{id}")).await).await;
    assert_eq!(json["data"]["status"], "FAILED");
    let steps = json["data"]["steps"].as_array().unwrap();
    assert_eq!(steps[0]["status_id"], 4);
    assert_eq!(
        steps[0]["error_message"],
        "Workflow validation failed: Diagnostic components require DataLogger dependency"
    );
    assert!(steps[1..].iter().all(|s| s["status_id"] == 1));
}
