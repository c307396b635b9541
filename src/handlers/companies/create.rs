use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::NewCompany;
use crate::state::AppState;
use crate::validation::SchemaKind;

use super::{json_body, validated};

/// POST /companies - Create a company
///
/// Body: `{ handle, name, description?, numEmployees?, logoUrl? }`
/// Returns 201 `{ company }`; 409 when the handle or name is taken.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let body = json_body(payload)?;
    let new_company: NewCompany = validated(&state, SchemaKind::CompanyNew, body)?;

    let company = state.companies.create(new_company).await?;
    tracing::info!(handle = %company.handle, user = %user.username, admin = user.is_admin, "Company created");

    Ok(ApiResponse::created(json!({ "company": company })))
}
