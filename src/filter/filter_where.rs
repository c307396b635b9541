use serde_json::Value;

use super::error::FilterError;
use super::filter::Filter;
use super::types::{FilterOp, FilterWhereInfo, SqlParam};

/// Renders a `{ column: { $op: value } }` document into a parameterized WHERE clause.
/// Conditions are ANDed in document order.
pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(where_data: &Value, starting_param_index: usize) -> Result<(String, Vec<SqlParam>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        let clause = filter_where.build_clause(where_data)?;
        Ok((clause, filter_where.param_values))
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn build_clause(&mut self, where_data: &Value) -> Result<String, FilterError> {
        let Value::Object(obj) = where_data else {
            return Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string()));
        };

        let mut sql_conditions = vec![];
        for (key, value) in obj {
            for condition in Self::parse_field_condition(key, value)? {
                sql_conditions.push(self.build_sql_condition(condition)?);
            }
        }

        if sql_conditions.is_empty() {
            Ok("1=1".to_string())
        } else {
            Ok(sql_conditions.join(" AND "))
        }
    }

    fn parse_field_condition(field: &str, value: &Value) -> Result<Vec<FilterWhereInfo>, FilterError> {
        if field.starts_with('$') {
            return Err(FilterError::UnsupportedOperator(field.to_string()));
        }
        Filter::validate_identifier(field)?;

        match value {
            Value::Object(obj) => obj
                .iter()
                .map(|(op_key, op_val)| {
                    let operator = FilterOp::parse(op_key)
                        .ok_or_else(|| FilterError::UnsupportedOperator(op_key.clone()))?;
                    Ok(FilterWhereInfo {
                        column: field.to_string(),
                        operator,
                        data: op_val.clone(),
                    })
                })
                .collect(),
            // Implicit equality: { field: value }
            _ => Ok(vec![FilterWhereInfo {
                column: field.to_string(),
                operator: FilterOp::Eq,
                data: value.clone(),
            }]),
        }
    }

    fn build_sql_condition(&mut self, condition: FilterWhereInfo) -> Result<String, FilterError> {
        let quoted_column = format!("\"{}\"", condition.column);
        let placeholder = self.param(condition.data)?;

        let sql_op = match condition.operator {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
            FilterOp::ILike => "ILIKE",
        };
        Ok(format!("{} {} {}", quoted_column, sql_op, placeholder))
    }

    fn param(&mut self, value: Value) -> Result<String, FilterError> {
        self.param_values.push(SqlParam::try_from(value)?);
        self.param_index += 1;
        Ok(format!("${}", self.param_index))
    }
}
