use axum::extract::{Extension, Path, State};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// DELETE /companies/:handle - Returns `{ deleted: handle }`
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(handle): Path<String>,
) -> ApiResult<Value> {
    state.companies.remove(&handle).await?;
    tracing::info!(handle = %handle, user = %user.username, admin = user.is_admin, "Company deleted");

    Ok(ApiResponse::success(json!({ "deleted": handle })))
}
