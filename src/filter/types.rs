use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
    ILike,
}

impl FilterOp {
    pub fn parse(op_key: &str) -> Option<Self> {
        Some(match op_key {
            "$eq" => FilterOp::Eq,
            "$gte" => FilterOp::Gte,
            "$lte" => FilterOp::Lte,
            "$ilike" => FilterOp::ILike,
            _ => return None,
        })
    }
}

/// Declarative query description: `where_clause` uses the `{ column: { $op: value } }` form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterData {
    pub select: Option<Vec<String>>,
    pub where_clause: Option<Value>,
    pub order: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// A positional bind value. Only text and integers reach the database.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
}

impl TryFrom<Value> for SqlParam {
    type Error = FilterError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(SqlParam::Text(s)),
            Value::Number(n) => n
                .as_i64()
                .map(SqlParam::Integer)
                .ok_or_else(|| FilterError::InvalidOperatorData(format!("expected an integer, got {}", n))),
            other => Err(FilterError::InvalidOperatorData(format!(
                "expected a string or number, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
