use axum::extract::{Query, State};
use serde_json::{json, Map, Number, Value};
use std::collections::HashMap;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::CompanySearchFilters;
use crate::state::AppState;
use crate::validation::SchemaKind;

use super::{validated, whole_number};

/// Query keys whose raw text must be turned into numbers before schema validation
const NUMERIC_KEYS: [&str; 2] = ["minEmployees", "maxEmployees"];

/// GET /companies - List companies, optionally filtered
///
/// Query: `nameLike` (case-insensitive substring), `minEmployees`, `maxEmployees`.
/// Returns 200 `{ companies: [...] }` ordered by name.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Value> {
    let query = coerce_query(params)?;
    let filters: CompanySearchFilters = validated(&state, SchemaKind::CompanySearch, query)?;

    if filters.has_inverted_bounds() {
        return Err(ApiError::bad_request(
            "minEmployees cannot be greater than maxEmployees.",
        ));
    }

    let companies = state.companies.find_all(&filters).await?;
    tracing::debug!(count = companies.len(), filtered = !filters.is_empty(), "Listed companies");

    Ok(ApiResponse::success(json!({ "companies": companies })))
}

/// Convert the raw query map into a JSON object, parsing the employee bounds.
///
/// Whole numbers (`2`, `2.0`, `1e3`) become JSON integers. Other finite numbers are
/// kept as floats so the schema reports them per field. Anything else fails here.
fn coerce_query(mut params: HashMap<String, String>) -> Result<Value, ApiError> {
    let mut query = Map::new();

    // minEmployees is checked before maxEmployees
    for key in NUMERIC_KEYS {
        if let Some(raw) = params.remove(key) {
            let number = parse_number(&raw)
                .ok_or_else(|| ApiError::bad_request(format!("{} must be a number.", key)))?;
            query.insert(key.to_string(), Value::Number(number));
        }
    }

    for (key, raw) in params {
        query.insert(key, Value::String(raw));
    }

    Ok(Value::Object(query))
}

fn parse_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Number::from(i));
    }
    let f = trimmed.parse::<f64>().ok().filter(|f| f.is_finite())?;
    match whole_number(f) {
        Some(i) => Some(Number::from(i)),
        None => Number::from_f64(f),
    }
}
