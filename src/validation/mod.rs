//! Declarative request-shape validation.
//!
//! Request bodies and coerced query strings are checked against JSON Schema
//! documents bundled from `schemas/`. Schemas are compiled once when the
//! registry is loaded; every failure reports all violations in validator order.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use thiserror::Error;

const COMPANY_NEW: &str = include_str!("../../schemas/company_new.json");
const COMPANY_UPDATE: &str = include_str!("../../schemas/company_update.json");
const COMPANY_SEARCH: &str = include_str!("../../schemas/company_search.json");

/// The request shapes known to the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    CompanyNew,
    CompanyUpdate,
    CompanySearch,
}

impl SchemaKind {
    pub fn name(&self) -> &'static str {
        match self {
            SchemaKind::CompanyNew => "companyNew",
            SchemaKind::CompanyUpdate => "companyUpdate",
            SchemaKind::CompanySearch => "companySearch",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            SchemaKind::CompanyNew => COMPANY_NEW,
            SchemaKind::CompanyUpdate => COMPANY_UPDATE,
            SchemaKind::CompanySearch => COMPANY_SEARCH,
        }
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Schema '{schema}' is not valid JSON: {source}")]
    Parse {
        schema: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema '{schema}' failed to compile: {reason}")]
    Compile { schema: &'static str, reason: String },
}

/// A value failed validation; `errors` keeps the validator's ordering.
#[derive(Debug, Clone, Error)]
#[error("{schema} validation failed: {}", errors.join("; "))]
pub struct SchemaViolation {
    pub schema: &'static str,
    pub errors: Vec<String>,
}

pub struct SchemaRegistry {
    company_new: JSONSchema,
    company_update: JSONSchema,
    company_search: JSONSchema,
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry").finish_non_exhaustive()
    }
}

impl SchemaRegistry {
    /// Parse and compile every bundled schema.
    pub fn load() -> Result<Self, SchemaError> {
        Ok(Self {
            company_new: Self::compile(SchemaKind::CompanyNew)?,
            company_update: Self::compile(SchemaKind::CompanyUpdate)?,
            company_search: Self::compile(SchemaKind::CompanySearch)?,
        })
    }

    fn compile(kind: SchemaKind) -> Result<JSONSchema, SchemaError> {
        let document: Value = serde_json::from_str(kind.source()).map_err(|source| SchemaError::Parse {
            schema: kind.name(),
            source,
        })?;

        JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&document)
            .map_err(|e| SchemaError::Compile {
                schema: kind.name(),
                reason: e.to_string(),
            })
    }

    fn schema(&self, kind: SchemaKind) -> &JSONSchema {
        match kind {
            SchemaKind::CompanyNew => &self.company_new,
            SchemaKind::CompanyUpdate => &self.company_update,
            SchemaKind::CompanySearch => &self.company_search,
        }
    }

    pub fn validate(&self, kind: SchemaKind, instance: &Value) -> Result<(), SchemaViolation> {
        match self.schema(kind).validate(instance) {
            Ok(()) => Ok(()),
            Err(errors) => {
                let errors = errors
                    .map(|e| {
                        let path = e.instance_path.to_string();
                        let message = e.to_string().replace('\n', " ");
                        match path.trim_start_matches('/') {
                            "" => message,
                            field => format!("{}: {}", field, message),
                        }
                    })
                    .collect();

                Err(SchemaViolation {
                    schema: kind.name(),
                    errors,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::load().expect("bundled schemas compile")
    }

    #[test]
    fn accepts_minimal_new_company() {
        let body = json!({ "handle": "acme", "name": "Acme" });
        assert!(registry().validate(SchemaKind::CompanyNew, &body).is_ok());
    }

    #[test]
    fn new_company_requires_handle_and_name() {
        let err = registry()
            .validate(SchemaKind::CompanyNew, &json!({ "description": "x" }))
            .unwrap_err();
        assert_eq!(err.schema, "companyNew");
        assert_eq!(err.errors.len(), 2);
        assert!(err.errors.iter().any(|e| e.contains("handle")));
        assert!(err.errors.iter().any(|e| e.contains("name")));
    }

    #[test]
    fn reports_every_violation_with_field_prefix() {
        let body = json!({ "handle": "acme", "name": "", "numEmployees": "ten" });
        let err = registry().validate(SchemaKind::CompanyNew, &body).unwrap_err();
        assert_eq!(err.errors.len(), 2, "{:?}", err.errors);
        assert!(err.errors.iter().any(|e| e.starts_with("name: ")));
        assert!(err.errors.iter().any(|e| e.starts_with("numEmployees: ")));
    }

    #[test]
    fn update_rejects_handle() {
        let err = registry()
            .validate(SchemaKind::CompanyUpdate, &json!({ "handle": "other" }))
            .unwrap_err();
        assert!(err.errors.iter().any(|e| e.contains("handle")), "{:?}", err.errors);
    }

    #[test]
    fn update_accepts_empty_patch() {
        assert!(registry().validate(SchemaKind::CompanyUpdate, &json!({})).is_ok());
    }

    #[test]
    fn search_rejects_unknown_keys_and_negative_bounds() {
        let registry = registry();
        assert!(registry
            .validate(SchemaKind::CompanySearch, &json!({ "color": "red" }))
            .is_err());
        assert!(registry
            .validate(SchemaKind::CompanySearch, &json!({ "minEmployees": -1 }))
            .is_err());
        assert!(registry
            .validate(SchemaKind::CompanySearch, &json!({ "minEmployees": 1.5 }))
            .is_err());
        assert!(registry
            .validate(
                SchemaKind::CompanySearch,
                &json!({ "nameLike": "net", "minEmployees": 1, "maxEmployees": 5 })
            )
            .is_ok());
    }
}
