use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /companies/:handle - One company with its jobs
pub async fn show(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    let company = state.companies.get(&handle).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}
