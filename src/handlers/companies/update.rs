use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::CompanyPatch;
use crate::state::AppState;
use crate::validation::SchemaKind;

use super::{json_body, validated};

/// PATCH /companies/:handle - Partial update
///
/// Body: any subset of `{ name, description, numEmployees, logoUrl }`.
/// `handle` itself can never be changed and is rejected by the schema.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(handle): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let body = json_body(payload)?;
    let patch: CompanyPatch = validated(&state, SchemaKind::CompanyUpdate, body)?;

    let company = state.companies.update(&handle, patch).await?;
    tracing::info!(handle = %company.handle, user = %user.username, admin = user.is_admin, "Company updated");

    Ok(ApiResponse::success(json!({ "company": company })))
}
