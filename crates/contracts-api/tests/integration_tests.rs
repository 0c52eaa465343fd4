//! # Integration Tests for contracts-api
//!
//! Drives the assembled router in-process: health probe, validation
//! outcomes, unknown schemas, malformed bodies, and the OpenAPI document.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use contracts_api::AppState;
use contracts_schema::SchemaRegistry;

/// Helper: build the app over a temporary schema directory.
fn test_app(schemas: &[(&str, Value)]) -> (TempDir, axum::Router) {
    let dir = TempDir::new().unwrap();
    for (file_name, schema) in schemas {
        std::fs::write(dir.path().join(file_name), schema.to_string()).unwrap();
    }
    let registry = SchemaRegistry::load(dir.path()).unwrap();
    (dir, contracts_api::app(AppState::new(registry)))
}

/// Helper: the `thing` schema used throughout.
fn thing_app() -> (TempDir, axum::Router) {
    test_app(&[(
        "thing.schema.json",
        json!({"type": "object", "required": ["id"]}),
    )])
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn post_validate(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/validate")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

// -- Health Probe -------------------------------------------------------------

#[tokio::test]
async fn test_health_probe() {
    let (_dir, app) = thing_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_health_with_empty_registry() {
    let (_dir, app) = test_app(&[]);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Validate -----------------------------------------------------------------

#[tokio::test]
async fn test_validate_missing_required_property() {
    let (_dir, app) = thing_app();
    let response = app
        .oneshot(post_validate(
            json!({"schema": "thing", "data": {}}).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "ok": false,
            "errors": [{
                "message": "'id' is a required property",
                "path": [],
                "validator": "required",
                "validator_value": ["id"]
            }]
        })
    );
}

#[tokio::test]
async fn test_validate_satisfying_document() {
    let (_dir, app) = thing_app();
    let response = app
        .oneshot(post_validate(
            json!({"schema": "thing", "data": {"id": 1}}).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"ok": true}));
}

#[tokio::test]
async fn test_validate_unknown_schema_is_400() {
    let (_dir, app) = thing_app();
    let response = app
        .oneshot(post_validate(
            json!({"schema": "nope", "data": {"id": 1}}).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response).await;
    assert!(body.contains("unknown schema 'nope'"), "body: {body}");
    assert!(body.contains("UNKNOWN_SCHEMA"), "body: {body}");
}

#[tokio::test]
async fn test_validate_unknown_schema_regardless_of_document() {
    let documents = [
        json!({}),
        json!([]),
        json!(null),
        json!("text"),
        json!({"deeply": {"nested": [1, {"x": true}]}}),
    ];
    for data in documents {
        let (_dir, app) = thing_app();
        let response = app
            .oneshot(post_validate(
                json!({"schema": "nope", "data": data}).to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNKNOWN_SCHEMA");
        assert_eq!(body["error"]["details"], json!({"schema": "nope"}));
    }
}

#[tokio::test]
async fn test_validate_non_object_data_is_400() {
    for data in [json!([1, 2]), json!("text"), json!(3), json!(null)] {
        let (_dir, app) = thing_app();
        let response = app
            .oneshot(post_validate(
                json!({"schema": "thing", "data": data}).to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_validate_errors_sorted_by_path() {
    let (_dir, app) = test_app(&[(
        "order.schema.json",
        json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "lines": {"type": "array", "items": {"type": "integer"}},
                "customer": {"type": "string"}
            }
        }),
    )]);
    let response = app
        .oneshot(post_validate(
            json!({
                "schema": "order",
                "data": {"lines": [1, "two", 3, "four"], "customer": 9}
            })
            .to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    let paths: Vec<&Value> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| &e["path"])
        .collect();
    assert_eq!(
        paths,
        vec![
            &json!([]),
            &json!(["customer"]),
            &json!(["lines", 1]),
            &json!(["lines", 3]),
        ]
    );
}

#[tokio::test]
async fn test_validate_malformed_json_is_400() {
    let (_dir, app) = thing_app();
    let response = app
        .oneshot(post_validate("{not json".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_validate_missing_fields_is_400() {
    let (_dir, app) = thing_app();
    let response = app
        .oneshot(post_validate(json!({"schema": "thing"}).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validate_without_content_type_is_400() {
    let (_dir, app) = thing_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/validate")
                .body(Body::from(json!({"schema": "thing", "data": {}}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validate_get_not_allowed() {
    let (_dir, app) = thing_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/validate")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_spec_served() {
    let (_dir, app) = thing_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert!(spec["paths"]["/validate"]["post"].is_object());
    assert!(spec["paths"]["/health"]["get"].is_object());
}
