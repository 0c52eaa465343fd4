//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the sidecar.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Contracts Sidecar",
        version = "0.1.0",
        description = "Validates JSON documents against registered JSON Schema contracts.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::health::health,
        crate::routes::validate::validate_document,
    ),
    components(schemas(
        crate::routes::health::HealthResponse,
        crate::routes::validate::ValidateRequest,
        crate::routes::validate::ValidateResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "validation", description = "Schema validation"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_both_routes() {
        let spec = ApiDoc::openapi();
        assert!(spec.paths.paths.contains_key("/health"));
        assert!(spec.paths.paths.contains_key("/validate"));
    }
}
