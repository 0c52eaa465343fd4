//! # Document Validation
//!
//! Routes:
//! - POST /validate — Validate `data` against the registered schema `schema`
//!
//! An unknown schema name is a client error (400), checked before the
//! document. `data` must be a JSON object; any other value is a 400
//! `BAD_REQUEST`. A document that fails its schema is a normal 200 response
//! with `ok: false` and the sorted violation list.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use contracts_schema::{ValidationOutcome, Violation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Request body for `POST /validate`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateRequest {
    /// Registry name of the schema, e.g. `context` for `context.pack.schema.json`.
    pub schema: String,
    /// Document to validate. Must be a JSON object.
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

/// Response body for `POST /validate`.
///
/// `errors` is present only when `ok` is false.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateResponse {
    /// True when the document satisfies the schema.
    pub ok: bool,
    /// Violations sorted by document path. Each carries `message`, `path`,
    /// `validator` and `validator_value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub errors: Option<Vec<Violation>>,
}

impl From<ValidationOutcome> for ValidateResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::Valid => Self {
                ok: true,
                errors: None,
            },
            ValidationOutcome::Invalid(violations) => Self {
                ok: false,
                errors: Some(violations),
            },
        }
    }
}

/// Build the validation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/validate", post(validate_document))
}

/// POST /validate — Validate a document against a registered schema.
#[utoipa::path(
    post,
    path = "/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Validation ran; see `ok`", body = ValidateResponse),
        (
            status = 400,
            description = "Unknown schema, malformed body or non-object data",
            body = crate::error::ErrorBody
        ),
    ),
    tag = "validation"
)]
pub async fn validate_document(
    State(state): State<AppState>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, AppError> {
    let req = extract_json(body)?;

    let schema = state
        .registry
        .lookup(&req.schema)
        .ok_or_else(|| AppError::UnknownSchema(req.schema.clone()))?;

    if !req.data.is_object() {
        return Err(AppError::BadRequest("`data` must be a JSON object".to_string()));
    }

    let outcome = schema.validate(&req.data);
    tracing::debug!(
        schema = %req.schema,
        ok = outcome.is_valid(),
        violations = outcome.violations().len(),
        "validated document"
    );

    Ok(Json(ValidateResponse::from(outcome)))
}
