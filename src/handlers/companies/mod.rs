// handlers/companies - /companies resource
//
// POST   /companies          create   (auth)
// GET    /companies          list     (public)
// GET    /companies/:handle  show     (public)
// PATCH  /companies/:handle  update   (auth)
// DELETE /companies/:handle  delete   (auth)

use axum::{extract::rejection::JsonRejection, Json};
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::SchemaKind;

pub mod create;
pub mod delete;
pub mod list;
pub mod show;
pub mod update;

pub use create::create;
pub use delete::delete;
pub use list::list;
pub use show::show;
pub use update::update;

/// Unwrap a JSON body, turning axum's rejection into our error shape
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))
}

/// Check `value` against `kind`, then decode it into the typed request.
///
/// The schema counts `10.0` as an integer, so whole floats are rewritten as
/// integers before decoding.
fn validated<T: DeserializeOwned>(state: &AppState, kind: SchemaKind, mut value: Value) -> Result<T, ApiError> {
    state.schemas.validate(kind, &value)?;
    normalize_whole_numbers(&mut value);

    serde_json::from_value(value.clone()).map_err(|e| {
        let detail = match undecodable_field::<T>(&value) {
            Some(field) => format!("{}: {}", field, e),
            None => e.to_string(),
        };
        tracing::warn!(schema = kind.name(), "Schema-valid request failed to decode: {}", detail);
        ApiError::validation_error(format!("Request does not match the {} schema", kind.name()), vec![detail])
    })
}

/// `f` as an i64 when it has no fractional part and fits
fn whole_number(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict bound
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then(|| f as i64)
}

fn normalize_whole_numbers(value: &mut Value) {
    if let Value::Object(fields) = value {
        for field in fields.values_mut() {
            let whole = match field {
                Value::Number(n) if !n.is_i64() && !n.is_u64() => n.as_f64().and_then(whole_number),
                _ => None,
            };
            if let Some(i) = whole {
                *field = Value::Number(Number::from(i));
            }
        }
    }
}

/// First top-level field that fails to decode into `T` on its own
fn undecodable_field<T: DeserializeOwned>(value: &Value) -> Option<&str> {
    value.as_object()?.iter().find_map(|(key, field)| {
        let single = Value::Object(Map::from_iter([(key.clone(), field.clone())]));
        match serde_json::from_value::<T>(single) {
            // Other required fields are absent on purpose
            Err(e) if !e.to_string().starts_with("missing field") => Some(key.as_str()),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyPatch, NewCompany};
    use serde_json::json;

    #[test]
    fn whole_floats_become_integers() {
        let mut value = json!({ "numEmployees": 10.0, "name": "Acme", "other": 1.5 });
        normalize_whole_numbers(&mut value);
        assert_eq!(value, json!({ "numEmployees": 10, "name": "Acme", "other": 1.5 }));
        assert!(value["numEmployees"].is_i64());
    }

    #[test]
    fn whole_number_bounds() {
        assert_eq!(whole_number(2.0), Some(2));
        assert_eq!(whole_number(-3.0), Some(-3));
        assert_eq!(whole_number(1.5), None);
        assert_eq!(whole_number(1e20), None);
        assert_eq!(whole_number(f64::NAN), None);
    }

    #[test]
    fn names_the_field_that_does_not_decode() {
        let value = json!({ "name": "Acme", "numEmployees": 1.5 });
        assert_eq!(undecodable_field::<CompanyPatch>(&value), Some("numEmployees"));

        let value = json!({ "handle": "acme", "name": "Acme", "numEmployees": 3000000000u64 });
        assert_eq!(undecodable_field::<NewCompany>(&value), Some("numEmployees"));
    }

    #[test]
    fn decodable_fields_are_not_blamed() {
        let value = json!({ "handle": "acme", "name": "Acme" });
        assert_eq!(undecodable_field::<NewCompany>(&value), None);
    }
}
